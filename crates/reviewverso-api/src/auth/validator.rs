// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token validation.
//!
//! The codec answers "was this signed by us"; the validator adds the
//! time and identity checks on top.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{AuthError, AuthResult, Claims, ClaimsCodec};

/// Answers whether a presented token is still good.
///
/// All predicates are total: a malformed token is simply not valid.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: Arc<ClaimsCodec>,
}

impl TokenValidator {
    /// Creates a new validator verifying with the given codec.
    pub fn new(codec: Arc<ClaimsCodec>) -> Self {
        Self { codec }
    }

    /// Decodes an authentic token without checking expiry.
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        self.codec.verify(token)
    }

    /// Returns the token subject.
    pub fn subject(&self, token: &str) -> AuthResult<String> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Returns the expiry instant of an authentic token, expired or not.
    pub fn expires_at(&self, token: &str) -> AuthResult<DateTime<Utc>> {
        let claims = self.decode(token)?;
        claims.expires_at().ok_or(AuthError::Malformed)
    }

    /// Decodes and checks expiry.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Decodes and checks expiry as of `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let claims = self.decode(token)?;
        if claims.is_expired_at(now) {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, "Token expired");
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    /// Decodes, checks expiry, and checks the subject matches `username`.
    pub fn validate_for(&self, token: &str, username: &str) -> AuthResult<Claims> {
        self.validate_for_at(token, username, Utc::now())
    }

    /// Like [`validate_for`](Self::validate_for) as of `now`.
    pub fn validate_for_at(
        &self,
        token: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Claims> {
        let claims = self.validate_at(token, now)?;
        if claims.sub != username {
            return Err(AuthError::SubjectMismatch);
        }
        Ok(claims)
    }

    /// Returns `true` if the token is authentic and unexpired.
    pub fn is_valid(&self, token: &str) -> bool {
        self.validate(token).is_ok()
    }

    /// Returns `true` if the token is authentic and unexpired at `now`.
    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.validate_at(token, now).is_ok()
    }

    /// Returns `true` if the token is valid and names `username`.
    pub fn is_valid_for(&self, token: &str, username: &str) -> bool {
        self.validate_for(token, username).is_ok()
    }

    /// Returns `true` if the token is valid at `now` and names `username`.
    pub fn is_valid_for_at(&self, token: &str, username: &str, now: DateTime<Utc>) -> bool {
        self.validate_for_at(token, username, now).is_ok()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, Principal, TokenIssuer};
    use chrono::Duration;

    fn setup() -> (TokenIssuer, TokenValidator) {
        let codec = Arc::new(
            ClaimsCodec::new(&JwtConfig::new(
                "validator-test-secret-that-is-long-enough-for-hs512-signing-keys!",
            ))
            .unwrap(),
        );
        (TokenIssuer::new(codec.clone()), TokenValidator::new(codec))
    }

    fn alice() -> Principal {
        Principal::new("alice").with_role("USER")
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let (issuer, validator) = setup();
        let token = issuer.issue(&alice()).unwrap();

        assert!(validator.is_valid(&token));
        assert!(validator.is_valid_for(&token, "alice"));
        assert_eq!(validator.subject(&token).unwrap(), "alice");
    }

    #[test]
    fn test_subject_mismatch() {
        let (issuer, validator) = setup();
        let token = issuer.issue(&alice()).unwrap();

        assert!(!validator.is_valid_for(&token, "bob"));
        assert_eq!(
            validator.validate_for(&token, "bob").unwrap_err(),
            AuthError::SubjectMismatch
        );
    }

    #[test]
    fn test_expiry_boundaries() {
        let (issuer, validator) = setup();
        let t0 = Utc::now();
        let token = issuer.issue_at(&alice(), t0).unwrap();

        assert!(validator.is_valid_at(&token, t0 + Duration::minutes(59)));
        assert!(!validator.is_valid_at(&token, t0 + Duration::seconds(3600)));
        assert!(!validator.is_valid_at(&token, t0 + Duration::minutes(61)));
        assert_eq!(
            validator
                .validate_at(&token, t0 + Duration::minutes(61))
                .unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let (issuer, validator) = setup();
        let t0 = Utc::now() - Duration::hours(2);
        let token = issuer.issue_at(&alice(), t0).unwrap();

        assert!(!validator.is_valid(&token));
        let expires_at = validator.expires_at(&token).unwrap();
        assert_eq!(expires_at.timestamp(), t0.timestamp() + 3600);
    }

    #[test]
    fn test_garbage_is_not_valid() {
        let (_, validator) = setup();

        assert!(!validator.is_valid("garbage"));
        assert!(!validator.is_valid_for("garbage", "alice"));
        assert_eq!(validator.expires_at("garbage").unwrap_err(), AuthError::Malformed);
    }
}
