// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # HTTP Integration Tests
//!
//! Requests through the full router and middleware stack.
//!
//! ## Test Categories
//!
//! - `test_login_*`: Credential exchange
//! - `test_logout_*`: Revocation through the logout endpoint
//! - `test_access_*`: Gate, authentication and policy ordering

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use reviewverso_tests::prelude::*;
use serde_json::json;

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_by_username_and_email() {
    let app = TestApp::new();

    let by_name = app.login(ALICE, ALICE_PASSWORD).await;
    by_name.assert_ok();
    assert_eq!(by_name.token().split('.').count(), 3);

    let by_email = app.login(ALICE_EMAIL, ALICE_PASSWORD).await;
    by_email.assert_ok();

    let claims = app.state().validator().decode(by_email.token()).unwrap();
    assert_eq!(claims.sub, ALICE);
    assert_eq!(claims.scope, "USER");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();

    app.login(ALICE, "not-the-password")
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
    app.login("mallory", ALICE_PASSWORD)
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_empty_fields() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/v1/auth/login", json!({ "identifier": "", "password": "" }), None)
        .await;
    response.assert_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_token_via_basic() {
    let app = TestApp::new();

    let response = app.token_basic(ROOT, ROOT_PASSWORD).await;
    response.assert_ok();
    let claims = app.state().validator().decode(response.token()).unwrap();
    assert_eq!(claims.scope, "ADMIN");

    app.token_basic(ROOT, "wrong")
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_uses_identity_resolver() {
    let resolver = Arc::new(MockIdentityResolver::new(
        PrincipalFixtures::alice(),
        "s3cret",
    ));
    let app = TestApp::with_identity(ConfigFixtures::api(), resolver.clone());

    app.login("whoever@example.com", "s3cret").await.assert_ok();
    app.login("whoever@example.com", "nope")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(resolver.call_count(), 2);
    assert_eq!(resolver.identifiers()[0], "whoever@example.com");
}

#[tokio::test]
async fn test_login_profile_round_trip() {
    let app = TestApp::new();
    let token = app.login_token(ALICE, ALICE_PASSWORD).await;

    let profile = app.profile(Some(&token)).await;
    profile.assert_ok();
    assert_eq!(profile.body["username"], ALICE);
    assert_eq!(profile.body["id"], ALICE_ID);
    assert_eq!(profile.body["email"], ALICE_EMAIL);
    assert_eq!(profile.body["roles"], json!(["USER"]));
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_then_reuse() {
    let app = TestApp::new();
    let token = app.login_token(ALICE, ALICE_PASSWORD).await;

    app.profile(Some(&token)).await.assert_ok();
    app.logout(Some(&token)).await.assert_logged_out();

    app.profile(Some(&token))
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "TOKEN_REVOKED");
    // Public routes are gated too.
    app.get("/health", Some(&token))
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "TOKEN_REVOKED");

    // The signature alone still checks out.
    assert!(app.state().validator().is_valid(&token));
    assert!(app.state().revocations().is_revoked(&token));
}

#[tokio::test]
async fn test_logout_only_revokes_presented_token() {
    let app = TestApp::new();
    let first = app.login_token(ALICE, ALICE_PASSWORD).await;
    let second = app.login_token(ALICE, ALICE_PASSWORD).await;

    app.logout(Some(&first)).await.assert_logged_out();

    app.profile(Some(&second)).await.assert_ok();
    assert_eq!(app.state().revocations().size(), 1);
}

#[tokio::test]
async fn test_logout_without_usable_token() {
    let app = TestApp::new();

    app.logout(None).await.assert_logged_out();
    app.logout(Some("not.a.token")).await.assert_logged_out();

    assert_eq!(app.state().revocations().size(), 0);
}

#[tokio::test]
async fn test_logout_expired_token_leaves_store_empty() {
    let app = TestApp::new();
    let stale = app
        .state()
        .issuer()
        .issue_at(&PrincipalFixtures::alice(), Utc::now() - Duration::hours(2))
        .unwrap();

    app.logout(Some(&stale)).await.assert_logged_out();

    // Already past its expiry, so the sweep drops it at once.
    assert_eq!(app.state().revocations().size(), 0);
}

// =============================================================================
// Access Control
// =============================================================================

#[tokio::test]
async fn test_access_profile_requires_token() {
    let app = TestApp::new();

    app.profile(None)
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    app.profile(Some("garbage"))
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_access_expired_token() {
    let app = TestApp::new();
    let stale = app
        .state()
        .issuer()
        .issue_at(&PrincipalFixtures::alice(), Utc::now() - Duration::hours(2))
        .unwrap();

    app.profile(Some(&stale))
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED");
    // Public routes ignore an unusable token.
    app.get("/health", Some(&stale)).await.assert_ok();
}

#[tokio::test]
async fn test_access_empty_roles_forbidden() {
    let app = TestApp::new();
    let token = app.login_token(GUEST, GUEST_PASSWORD).await;

    app.call(Method::POST, "/api/v1/reviews", Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN");
    // Authenticated-only routes still work.
    app.profile(Some(&token)).await.assert_ok();
}

#[tokio::test]
async fn test_access_admin_only_routes() {
    let app = TestApp::new();
    let user = app.login_token(ALICE, ALICE_PASSWORD).await;
    let admin = app.login_token(ROOT, ROOT_PASSWORD).await;

    app.get("/api/v1/users", Some(&user))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN");
    app.get("/api/v1/users", None)
        .await
        .assert_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    // Allowed, but not served by this router.
    app.get("/api/v1/users", Some(&admin))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_access_outside_prefix_denied() {
    let app = TestApp::new();
    let admin = app.login_token(ROOT, ROOT_PASSWORD).await;

    app.get("/metrics", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.get("/metrics", Some(&admin))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_access_custom_prefix() {
    let app = TestApp::with_config(ConfigFixtures::api_with_prefix("/v2"));
    let token = app.login_token(ALICE, ALICE_PASSWORD).await;

    app.get("/v2/auth/profile", Some(&token)).await.assert_ok();
    app.get("/api/v1/auth/profile", Some(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
