// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity resolution for login.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, AuthResult, Principal};

// =============================================================================
// IdentityResolver
// =============================================================================

/// Turns login credentials into a [`Principal`].
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves `identifier` (username or email) and `secret` to a principal.
    ///
    /// Unknown identifiers and wrong secrets both fail with
    /// [`AuthError::InvalidCredentials`].
    async fn resolve(&self, identifier: &str, secret: &str) -> AuthResult<Principal>;
}

// =============================================================================
// UserRecord
// =============================================================================

/// A user account known to the in-memory resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Numeric user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Unique username.
    pub username: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserRecord {
    /// Creates a record with no roles.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            password: password.into(),
            roles: Vec::new(),
        }
    }

    /// Sets the numeric user id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Adds a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

// =============================================================================
// InMemoryIdentityResolver
// =============================================================================

/// Resolver backed by a fixed set of users loaded at startup.
#[derive(Debug, Default)]
pub struct InMemoryIdentityResolver {
    users: Vec<UserRecord>,
    by_username: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

impl InMemoryIdentityResolver {
    /// Creates a resolver over `users`.
    ///
    /// Later records with a duplicate username or email shadow earlier ones.
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users: Vec<UserRecord> = users.into_iter().collect();
        let mut by_username = HashMap::with_capacity(users.len());
        let mut by_email = HashMap::new();

        for (index, user) in users.iter().enumerate() {
            by_username.insert(user.username.clone(), index);
            if let Some(email) = user.email.as_ref().filter(|e| !e.is_empty()) {
                by_email.insert(email.clone(), index);
            }
        }

        Self {
            users,
            by_username,
            by_email,
        }
    }

    /// Returns the number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are known.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find(&self, identifier: &str) -> Option<&UserRecord> {
        self.by_email
            .get(identifier)
            .or_else(|| self.by_username.get(identifier))
            .and_then(|&index| self.users.get(index))
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn resolve(&self, identifier: &str, secret: &str) -> AuthResult<Principal> {
        match self.find(identifier) {
            Some(user) if constant_time_eq(user.password.as_bytes(), secret.as_bytes()) => {
                Ok(user.principal())
            }
            Some(user) => {
                tracing::debug!(username = %user.username, "Password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                tracing::debug!("Unknown identifier");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// =============================================================================
// Tests
// =============================================================================
