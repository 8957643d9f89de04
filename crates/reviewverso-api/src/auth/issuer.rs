// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Claims, ClaimsCodec, Principal};
use crate::error::ApiResult;

/// Prefix some identity stores put in front of role names.
const LEGACY_ROLE_PREFIX: &str = "ROLE_";

/// Mints signed tokens for authenticated principals.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<ClaimsCodec>,
}

impl TokenIssuer {
    /// Creates a new issuer signing with the given codec.
    pub fn new(codec: Arc<ClaimsCodec>) -> Self {
        Self { codec }
    }

    /// Issues a token valid for one hour from now.
    pub fn issue(&self, principal: &Principal) -> ApiResult<String> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as if at `now`.
    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> ApiResult<String> {
        let claims = self.claims_for(principal, now);
        let token = self.codec.sign(&claims)?;

        tracing::info!(
            subject = %claims.sub,
            scope = %claims.scope,
            expires_at = claims.exp,
            "Token issued"
        );

        Ok(token)
    }

    /// Builds the claims a token for `principal` issued at `now` would carry.
    pub fn claims_for(&self, principal: &Principal, now: DateTime<Utc>) -> Claims {
        Claims::builder(principal.username.as_str())
            .roles(principal.roles.iter().map(|r| normalize_role(r)))
            .issued_at(now)
            .token_id(Uuid::now_v7().to_string())
            .user_id(principal.id)
            .email(principal.email.as_deref())
            .build()
    }
}

/// Strips a single leading `ROLE_` from a role name.
pub fn normalize_role(role: &str) -> &str {
    role.strip_prefix(LEGACY_ROLE_PREFIX).unwrap_or(role)
}

// =============================================================================
// Tests
// =============================================================================
