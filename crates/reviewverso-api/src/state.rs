// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{AuthorizationPolicy, ClaimsCodec, RevocationStore, TokenIssuer, TokenValidator};
use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::identity::{IdentityResolver, InMemoryIdentityResolver};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers and middleware.
///
/// Every component is constructed once and shared by `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token issuer.
    pub issuer: Arc<TokenIssuer>,
    /// Token validator.
    pub validator: Arc<TokenValidator>,
    /// Revoked-token store.
    pub revocations: Arc<RevocationStore>,
    /// Route authorization policy.
    pub policy: Arc<AuthorizationPolicy>,
    /// Login identity resolver.
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token issuer.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Returns the token validator.
    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Returns the revoked-token store.
    pub fn revocations(&self) -> &RevocationStore {
        &self.revocations
    }

    /// Returns the authorization policy.
    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_path", &self.config.base_path)
            .field("revocations", &self.revocations.size())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    revocations: Option<Arc<RevocationStore>>,
    policy: Option<Arc<AuthorizationPolicy>>,
    identity: Option<Arc<dyn IdentityResolver>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing revoked-token store.
    pub fn revocations(mut self, store: Arc<RevocationStore>) -> Self {
        self.revocations = Some(store);
        self
    }

    /// Overrides the authorization policy.
    pub fn policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Sets the identity resolver.
    pub fn identity(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(resolver);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails if the configuration is invalid. Without an explicit policy the
    /// default route table under `config.base_path` is used; without a
    /// resolver no login succeeds.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let codec = Arc::new(ClaimsCodec::new(&config.jwt)?);
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(AuthorizationPolicy::reviewverso(&config.base_path)));
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(InMemoryIdentityResolver::default()));

        Ok(AppState {
            issuer: Arc::new(TokenIssuer::new(codec.clone())),
            validator: Arc::new(TokenValidator::new(codec)),
            revocations: self.revocations.unwrap_or_default(),
            policy,
            identity,
            config: Arc::new(config),
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<TokenValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.validator.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<RevocationStore> {
    fn from_ref(state: &AppState) -> Self {
        state.revocations.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, Principal};

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_jwt(JwtConfig::new(
            "state-test-secret-key-that-is-long-enough-for-hs512-signing-keys",
        ))
    }

    #[test]
    fn test_app_state_builder() {
        let state = AppState::builder().config(test_config()).build().unwrap();

        let token = state.issuer().issue(&Principal::new("alice")).unwrap();
        assert!(state.validator().is_valid_for(&token, "alice"));
        assert_eq!(state.revocations().size(), 0);
        assert_eq!(state.policy().prefix(), "/api/v1");
    }

    #[test]
    fn test_shared_revocation_store() {
        let store = Arc::new(RevocationStore::new());
        let state = AppState::builder()
            .config(test_config())
            .revocations(store.clone())
            .build()
            .unwrap();

        store.invalidate("t", chrono::Utc::now() + chrono::Duration::minutes(1));
        assert!(state.revocations().is_revoked("t"));
    }

    #[test]
    fn test_missing_secret_fails() {
        assert!(AppState::builder().build().is_err());
    }
}
