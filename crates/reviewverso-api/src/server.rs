// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{AuthorizationPolicy, RevocationStore};
use crate::config::{ApiConfig, CorsConfig};
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::identity::IdentityResolver;
use crate::middleware::{AuthLayer, PolicyLayer, RevocationLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Layers, outermost first: trace, CORS, timeout, revocation gate,
    /// authentication, authorization policy.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(RevocationLayer::new(self.state.revocations.clone()))
            .layer(AuthLayer::new(
                self.state.validator.clone(),
                self.state.policy.clone(),
            ))
            .layer(PolicyLayer::new(self.state.policy.clone()));

        let api = Router::new()
            .route("/auth/login", post(handlers::login))
            .route("/auth/token", post(handlers::token))
            .route("/auth/logout", post(handlers::logout))
            .route("/auth/profile", get(handlers::profile));

        Router::new()
            .route("/health", get(handlers::health))
            .nest(&self.config.base_path, api)
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        info!(
            addr = %addr,
            base_path = %self.config.base_path,
            "API server listening"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    let wildcard_origin = cors.allows_any_origin();
    layer = if wildcard_origin {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    let wildcard_headers = cors.allowed_headers.iter().any(|h| h == "*");
    layer = if wildcard_headers {
        layer.allow_headers(Any)
    } else {
        let headers: Vec<HeaderName> = cors
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer.allow_headers(AllowHeaders::list(headers))
    };

    // Credentials cannot be combined with wildcards.
    if cors.allow_credentials {
        if wildcard_origin || wildcard_headers {
            tracing::warn!("CORS credentials ignored with wildcard origins or headers");
        } else {
            layer = layer.allow_credentials(true);
        }
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the identity resolver.
    pub fn identity(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.state_builder = self.state_builder.identity(resolver);
        self
    }

    /// Shares an existing revoked-token store.
    pub fn revocations(mut self, store: Arc<RevocationStore>) -> Self {
        self.state_builder = self.state_builder.revocations(store);
        self
    }

    /// Overrides the authorization policy.
    pub fn policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.state_builder = self.state_builder.policy(policy);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================
