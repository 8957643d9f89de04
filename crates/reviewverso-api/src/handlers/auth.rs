// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::{ApiResult, ValidationErrors};
use crate::extractors::{Auth, BasicCredentials, BearerToken, ClientIp, ValidatedJson};
use crate::response::{MessageResponse, ProfileResponse, TokenResponse};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(default, alias = "username", alias = "email")]
    pub identifier: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> ApiResult<()> {
        let mut errors = ValidationErrors::new();
        if self.identifier.trim().is_empty() {
            errors.add("identifier", "must not be empty");
        }
        if self.password.is_empty() {
            errors.add("password", "must not be empty");
        }
        errors.into_result(())
    }
}

/// POST {prefix}/auth/login
///
/// Resolves the credentials and returns a signed token.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    request.validate()?;
    issue_for(&state, request.identifier.trim(), &request.password, client_ip).await
}

// =============================================================================
// Token (HTTP Basic)
// =============================================================================

/// POST {prefix}/auth/token
///
/// Same as login, with credentials in an `Authorization: Basic` header.
pub async fn token(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    credentials: BasicCredentials,
) -> ApiResult<TokenResponse> {
    issue_for(&state, &credentials.identifier, &credentials.secret, client_ip).await
}

async fn issue_for(
    state: &AppState,
    identifier: &str,
    secret: &str,
    client_ip: Option<std::net::IpAddr>,
) -> ApiResult<TokenResponse> {
    let principal = match state.identity.resolve(identifier, secret).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::info!(client_ip = ?client_ip, "Login failed");
            return Err(e.into());
        }
    };

    let token = state.issuer().issue(&principal)?;

    tracing::info!(
        username = %principal.username,
        client_ip = ?client_ip,
        "User logged in"
    );

    Ok(TokenResponse::new(token))
}

// =============================================================================
// Logout
// =============================================================================

/// POST {prefix}/auth/logout
///
/// Revokes the presented token until its natural expiry. Always succeeds:
/// a missing or unusable token leaves the store untouched.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> impl IntoResponse {
    if let Some(token) = token {
        match state.validator().expires_at(&token) {
            Ok(expires_at) => {
                state.revocations().invalidate(&token, expires_at);
                tracing::info!(expires_at = %expires_at, "Token revoked");
            }
            Err(e) => tracing::debug!(error = %e, "Logout with unusable token"),
        }
    }

    MessageResponse::success("Logged out successfully")
}

// =============================================================================
// Profile
// =============================================================================

/// GET {prefix}/auth/profile
///
/// Returns the identity carried by the caller's token.
pub async fn profile(Auth(auth_ctx): Auth) -> impl IntoResponse {
    Json(ProfileResponse::from(&auth_ctx))
}

// =============================================================================
// Tests
// =============================================================================
