// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Collaborators that record how they were called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reviewverso_api::{AuthError, AuthResult, IdentityResolver, Principal};

// =============================================================================
// MockIdentityResolver
// =============================================================================

/// Resolves a single fixed principal for any identifier with the right
/// secret, and records every identifier it sees.
#[derive(Debug)]
pub struct MockIdentityResolver {
    principal: Principal,
    secret: String,
    calls: AtomicUsize,
    identifiers: Mutex<Vec<String>>,
}

impl MockIdentityResolver {
    /// Creates a resolver that accepts `secret`.
    pub fn new(principal: Principal, secret: impl Into<String>) -> Self {
        Self {
            principal,
            secret: secret.into(),
            calls: AtomicUsize::new(0),
            identifiers: Mutex::new(Vec::new()),
        }
    }

    /// Number of resolve calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identifiers seen, in call order.
    pub fn identifiers(&self) -> Vec<String> {
        self.identifiers
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve(&self, identifier: &str, secret: &str) -> AuthResult<Principal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut ids) = self.identifiers.lock() {
            ids.push(identifier.to_string());
        }

        if secret == self.secret {
            Ok(self.principal.clone())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
