// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issuer written into every token.
pub const TOKEN_ISSUER: &str = "self";

/// Fixed token lifetime in seconds (1 hour).
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// JWT claims for authentication.
///
/// Claims are built once at issuance and never mutated. The role set travels
/// as a single space-separated `scope` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Standard JWT Claims (RFC 7519)
    // =========================================================================
    /// Issuer.
    pub iss: String,

    /// Subject - the username.
    pub sub: String,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp, exclusive).
    pub exp: i64,

    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // =========================================================================
    // Custom Claims
    // =========================================================================
    /// Space-separated role names.
    #[serde(default)]
    pub scope: String,

    /// Numeric user id.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// User's email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    /// Creates a builder for constructing claims.
    pub fn builder(subject: impl Into<String>) -> ClaimsBuilder {
        ClaimsBuilder::new(subject)
    }

    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Iterates over the role names in the scope.
    ///
    /// An empty scope yields no roles.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Returns the roles as owned strings.
    pub fn role_list(&self) -> Vec<String> {
        self.roles().map(str::to_string).collect()
    }

    /// Returns `true` if the scope contains the given role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|r| r == role)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns `true` if the token is expired at `now`.
    ///
    /// The expiry instant itself is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

// =============================================================================
// Claims Builder
// =============================================================================

/// Builder for constructing JWT claims.
#[derive(Debug)]
pub struct ClaimsBuilder {
    subject: String,
    roles: Vec<String>,
    issued_at: DateTime<Utc>,
    lifetime_secs: i64,
    token_id: Option<String>,
    user_id: Option<i64>,
    email: Option<String>,
}

impl ClaimsBuilder {
    /// Creates a new builder issued now with the fixed lifetime.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            roles: Vec::new(),
            issued_at: Utc::now(),
            lifetime_secs: TOKEN_LIFETIME_SECS,
            token_id: None,
            user_id: None,
            email: None,
        }
    }

    /// Sets the roles.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the issue instant.
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Overrides the lifetime in seconds.
    pub fn lifetime_secs(mut self, seconds: i64) -> Self {
        self.lifetime_secs = seconds;
        self
    }

    /// Sets the JWT ID.
    pub fn token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    /// Sets the numeric user id.
    pub fn user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the email. Empty strings are dropped.
    pub fn email(mut self, email: Option<impl Into<String>>) -> Self {
        self.email = email.map(Into::into).filter(|e: &String| !e.is_empty());
        self
    }

    /// Builds the claims.
    pub fn build(self) -> Claims {
        let iat = self.issued_at.timestamp();

        Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: self.subject,
            iat,
            exp: iat + self.lifetime_secs,
            jti: self.token_id,
            scope: self.roles.join(" "),
            user_id: self.user_id,
            email: self.email,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
