// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Token Core Integration Tests
//!
//! Issuer, validator, revocation store and policy wired together the way the
//! server wires them, without HTTP.
//!
//! ## Test Categories
//!
//! - `test_issue_*`: Issuance and decoding
//! - `test_expiry_*`: Validity window
//! - `test_revocation_*`: Revocation store behavior
//! - `test_policy_*`: Authorization decisions for issued tokens

use std::sync::Arc;

use axum::http::Method;
use chrono::{Duration, TimeZone, Utc};
use reviewverso_api::{
    auth::{AuthContext, AuthError, AuthorizationPolicy, ClaimsCodec, TokenIssuer, TokenValidator},
    JwtConfig, RevocationStore,
};
use reviewverso_tests::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

struct Core {
    issuer: TokenIssuer,
    validator: TokenValidator,
}

fn core() -> Core {
    init_test_logging();
    let codec = Arc::new(ClaimsCodec::new(&JwtConfig::new(TEST_SECRET)).expect("codec"));
    Core {
        issuer: TokenIssuer::new(codec.clone()),
        validator: TokenValidator::new(codec),
    }
}

// =============================================================================
// Issuance
// =============================================================================

#[test]
fn test_issue_and_validate() {
    let core = core();
    let token = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    assert!(core.validator.is_valid(&token));

    let claims = core.validator.decode(&token).unwrap();
    assert_eq!(claims.sub, ALICE);
    assert_eq!(claims.scope, "USER");
    assert_eq!(claims.user_id, Some(ALICE_ID));
    assert_eq!(claims.email.as_deref(), Some(ALICE_EMAIL));
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_issue_multiple_roles_joined_by_space() {
    let core = core();
    let principal = PrincipalFixtures::bare("editor").with_roles(["USER", "ROLE_ADMIN"]);
    let token = core.issuer.issue(&principal).unwrap();

    let claims = core.validator.decode(&token).unwrap();
    assert_eq!(claims.scope, "USER ADMIN");
    assert!(claims.user_id.is_none());
    assert!(claims.email.is_none());
}

#[test]
fn test_issue_empty_email_omitted() {
    let core = core();
    let principal = PrincipalFixtures::bare("nomail").with_email("");
    let claims = core
        .validator
        .decode(&core.issuer.issue(&principal).unwrap())
        .unwrap();

    assert!(claims.email.is_none());
}

#[test]
fn test_issue_tokens_are_distinct() {
    let core = core();
    let a = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();
    let b = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    // Distinct token ids keep revocation per-token.
    assert_ne!(a, b);
}

#[test]
fn test_issue_wrong_subject() {
    let core = core();
    let token = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    assert!(core.validator.is_valid_for(&token, ALICE));
    assert!(!core.validator.is_valid_for(&token, "bob"));
    assert!(!core.validator.is_valid_for(&token, "Alice"));
    assert!(matches!(
        core.validator.validate_for(&token, "bob"),
        Err(AuthError::SubjectMismatch)
    ));
}

#[test]
fn test_issue_other_secret_rejected() {
    let core = core();
    let token = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    let other = ClaimsCodec::new(&JwtConfig::new("another-secret-".repeat(5))).unwrap();
    let other = TokenValidator::new(Arc::new(other));

    assert!(!other.is_valid(&token));
    assert!(matches!(other.decode(&token), Err(AuthError::InvalidSignature)));
    assert!(matches!(core.validator.decode("garbage"), Err(AuthError::Malformed)));
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_expiry_window() {
    let core = core();
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let token = core.issuer.issue_at(&PrincipalFixtures::alice(), t0).unwrap();

    assert!(core.validator.is_valid_at(&token, t0 + Duration::minutes(59)));
    assert!(!core.validator.is_valid_at(&token, t0 + Duration::hours(1)));
    assert!(!core.validator.is_valid_at(&token, t0 + Duration::minutes(61)));
    assert!(matches!(
        core.validator.validate_at(&token, t0 + Duration::minutes(61)),
        Err(AuthError::Expired)
    ));
}

#[test]
fn test_expiry_readable_after_expiry() {
    let core = core();
    let t0 = Utc::now() - Duration::hours(3);
    let token = core.issuer.issue_at(&PrincipalFixtures::alice(), t0).unwrap();

    assert!(!core.validator.is_valid(&token));
    let expires_at = core.validator.expires_at(&token).unwrap();
    assert_eq!(expires_at.timestamp(), t0.timestamp() + 3600);
}

// =============================================================================
// Revocation
// =============================================================================

#[test]
fn test_revocation_does_not_touch_signature_validity() {
    let core = core();
    let store = RevocationStore::new();
    let token = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    store.invalidate(&token, core.validator.expires_at(&token).unwrap());

    assert!(store.is_revoked(&token));
    assert!(core.validator.is_valid(&token));
}

#[test]
fn test_revocation_idempotent() {
    let core = core();
    let store = RevocationStore::new();
    let token = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();
    let expires_at = core.validator.expires_at(&token).unwrap();

    store.invalidate(&token, expires_at);
    assert!(store.is_revoked(&token));
    store.invalidate(&token, expires_at);
    assert!(store.is_revoked(&token));
    assert_eq!(store.size(), 1);
}

#[test]
fn test_revocation_converges_with_expiry() {
    let core = core();
    let store = RevocationStore::new();
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let token = core.issuer.issue_at(&PrincipalFixtures::alice(), t0).unwrap();
    let expires_at = core.validator.expires_at(&token).unwrap();

    store.invalidate_at(&token, expires_at, t0 + Duration::minutes(5));
    assert!(store.is_revoked_at(&token, t0 + Duration::minutes(30)));

    assert!(!store.is_revoked_at(&token, expires_at));
    assert_eq!(store.size_at(expires_at), 0);
    assert!(!core.validator.is_valid_at(&token, expires_at));
}

#[test]
fn test_revocation_is_per_token() {
    let core = core();
    let store = RevocationStore::new();
    let first = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();
    let second = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();

    store.invalidate(&first, core.validator.expires_at(&first).unwrap());

    assert!(store.is_revoked(&first));
    assert!(!store.is_revoked(&second));
}

// =============================================================================
// Policy
// =============================================================================

#[test]
fn test_policy_empty_roles() {
    let core = core();
    let token = core.issuer.issue(&PrincipalFixtures::bare(GUEST)).unwrap();
    let claims = core.validator.validate(&token).unwrap();
    assert_eq!(claims.scope, "");

    let ctx = AuthContext::from_claims(&claims);
    let policy = AuthorizationPolicy::reviewverso(PREFIX);

    assert!(matches!(
        policy.authorize(&Method::POST, "/api/v1/reviews", ctx.role_set()),
        Err(AuthError::Forbidden)
    ));
    assert!(matches!(
        policy.authorize(&Method::GET, "/api/v1/users", ctx.role_set()),
        Err(AuthError::Forbidden)
    ));
    // Authenticated-only routes still admit the caller.
    assert!(policy
        .authorize(&Method::GET, "/api/v1/auth/profile", ctx.role_set())
        .is_ok());
}

#[test]
fn test_policy_roles_from_token() {
    let core = core();
    let policy = AuthorizationPolicy::reviewverso(PREFIX);

    let user = core.issuer.issue(&PrincipalFixtures::alice()).unwrap();
    let admin = core
        .issuer
        .issue(&PrincipalFixtures::bare(ROOT).with_role("ROLE_ADMIN"))
        .unwrap();

    let user_ctx = AuthContext::from_claims(&core.validator.validate(&user).unwrap());
    let admin_ctx = AuthContext::from_claims(&core.validator.validate(&admin).unwrap());

    assert!(policy
        .authorize(&Method::PUT, "/api/v1/reviews/9", user_ctx.role_set())
        .is_ok());
    assert!(matches!(
        policy.authorize(&Method::DELETE, "/api/v1/users/9", user_ctx.role_set()),
        Err(AuthError::Forbidden)
    ));
    assert!(policy
        .authorize(&Method::DELETE, "/api/v1/users/9", admin_ctx.role_set())
        .is_ok());
    assert!(matches!(
        policy.authorize(&Method::POST, "/api/v1/reviews", None),
        Err(AuthError::Unauthenticated)
    ));
}
