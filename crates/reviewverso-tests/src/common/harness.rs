// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`, so
//! every request passes through the same middleware stack as production.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use reviewverso_api::{
    ApiConfig, ApiServer, ApiServerBuilder, AppState, IdentityResolver, InMemoryIdentityResolver,
};
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::{ConfigFixtures, UserFixtures};
use super::init_test_logging;

// =============================================================================
// TestApp
// =============================================================================

/// A fully wired application for request-level tests.
pub struct TestApp {
    server: ApiServer,
    router: Router,
}

impl TestApp {
    /// Default configuration with the seed users.
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::api())
    }

    /// Custom configuration with the seed users.
    pub fn with_config(config: ApiConfig) -> Self {
        Self::with_identity(
            config,
            Arc::new(InMemoryIdentityResolver::new(UserFixtures::all())),
        )
    }

    /// Custom configuration and identity resolver.
    pub fn with_identity(config: ApiConfig, identity: Arc<dyn IdentityResolver>) -> Self {
        init_test_logging();

        let server = ApiServerBuilder::new()
            .config(config)
            .identity(identity)
            .build()
            .expect("test server should build");
        let router = server.router();

        Self { server, router }
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        self.server.state()
    }

    /// Configured API prefix.
    pub fn prefix(&self) -> &str {
        self.state().policy().prefix()
    }

    /// Sends a request through the full stack.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET uri` with an optional bearer token.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, Body::empty())).await
    }

    /// Bodiless request with an optional bearer token.
    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(method, uri, token, Body::empty())).await
    }

    /// `POST uri` with a JSON body and an optional bearer token.
    pub async fn post_json(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut req = request(Method::POST, uri, token, Body::from(body.to_string()));
        req.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        self.send(req).await
    }

    /// `POST {prefix}/auth/login`.
    pub async fn login(&self, identifier: &str, password: &str) -> TestResponse {
        let uri = format!("{}/auth/login", self.prefix());
        self.post_json(
            &uri,
            serde_json::json!({ "identifier": identifier, "password": password }),
            None,
        )
        .await
    }

    /// Logs in and returns the token, panicking on failure.
    pub async fn login_token(&self, identifier: &str, password: &str) -> String {
        let response = self.login(identifier, password).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.token().to_string()
    }

    /// `POST {prefix}/auth/token` with HTTP Basic credentials.
    pub async fn token_basic(&self, identifier: &str, password: &str) -> TestResponse {
        let uri = format!("{}/auth/token", self.prefix());
        let encoded = STANDARD.encode(format!("{}:{}", identifier, password));
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Basic {}", encoded))
            .body(Body::empty())
            .expect("valid request");
        self.send(req).await
    }

    /// `POST {prefix}/auth/logout` with an optional bearer token.
    pub async fn logout(&self, token: Option<&str>) -> TestResponse {
        let uri = format!("{}/auth/logout", self.prefix());
        self.call(Method::POST, &uri, token).await
    }

    /// `GET {prefix}/auth/profile`.
    pub async fn profile(&self, token: Option<&str>) -> TestResponse {
        let uri = format!("{}/auth/profile", self.prefix());
        self.get(&uri, token).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(body).expect("valid request")
}

// =============================================================================
// TestResponse
// =============================================================================

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body, or `Null` when empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// The `token` field of a token response.
    pub fn token(&self) -> &str {
        self.body["token"]
            .as_str()
            .unwrap_or_else(|| panic!("no token in body: {}", self.body))
    }

    /// The `error.code` field of an error response.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}
