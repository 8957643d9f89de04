// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AuthContext, AuthorizationPolicy, TokenValidator};
use crate::extractors::{bearer_token, client_ip};

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// Validates the `Authorization: Bearer` token and attaches an
/// [`AuthContext`] to the request. An invalid or expired token is rejected
/// with 401 unless the route is public, in which case the request proceeds
/// as anonymous. Requests without a token always proceed as anonymous; the
/// policy layer decides whether that is enough.
#[derive(Clone)]
pub struct AuthLayer {
    validator: Arc<TokenValidator>,
    policy: Arc<AuthorizationPolicy>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(validator: Arc<TokenValidator>, policy: Arc<AuthorizationPolicy>) -> Self {
        Self { validator, policy }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            validator: self.validator.clone(),
            policy: self.policy.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    validator: Arc<TokenValidator>,
    policy: Arc<AuthorizationPolicy>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let (mut parts, body) = req.into_parts();
        let ip = client_ip(&parts);

        let auth_ctx = match bearer_token(&parts.headers) {
            None => AuthContext::anonymous(),
            Some(token) => match self.validator.validate(token) {
                Ok(claims) => AuthContext::from_claims(&claims),
                Err(e) if self.policy.is_public(&parts.method, parts.uri.path()) => {
                    tracing::debug!(
                        error = %e,
                        path = %parts.uri.path(),
                        "Ignoring unusable token on public route"
                    );
                    AuthContext::anonymous()
                }
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        method = %parts.method,
                        path = %parts.uri.path(),
                        "Token rejected"
                    );
                    return Box::pin(async move { Ok(e.into_response()) });
                }
            },
        }
        .with_client_ip(ip);

        if auth_ctx.authenticated {
            tracing::debug!(
                username = %auth_ctx.username,
                request_id = %auth_ctx.request_id,
                "Request authenticated"
            );
        }

        parts.extensions.insert(auth_ctx);
        let req = Request::from_parts(parts, body);
        let mut inner = self.inner.clone();

        Box::pin(async move { inner.call(req).await })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ClaimsCodec, JwtConfig, Principal, TokenIssuer};
    use axum::http::{header, Method, StatusCode};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn setup() -> (TokenIssuer, AuthLayer) {
        let codec = Arc::new(
            ClaimsCodec::new(&JwtConfig::new(
                "auth-middleware-secret-key-that-is-long-enough-for-hs512-signing",
            ))
            .unwrap(),
        );
        let layer = AuthLayer::new(
            Arc::new(TokenValidator::new(codec.clone())),
            Arc::new(AuthorizationPolicy::reviewverso("/api/v1")),
        );
        (TokenIssuer::new(codec), layer)
    }

    /// Echoes the attached context back as JSON.
    fn echo(
        layer: &AuthLayer,
    ) -> impl Service<Request<Body>, Response = Response, Error = std::convert::Infallible> {
        layer.layer(tower::service_fn(|req: Request<Body>| async move {
            let ctx = req.extensions().get::<AuthContext>().cloned();
            let body = serde_json::to_vec(&ctx).unwrap();
            Ok::<_, std::convert::Infallible>(Response::new(Body::from(body)))
        }))
    }

    fn request(method: Method, path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn context_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_attaches_context() {
        let (issuer, layer) = setup();
        let token = issuer
            .issue(&Principal::new("alice").with_id(5).with_role("USER"))
            .unwrap();

        let response = echo(&layer)
            .oneshot(request(Method::GET, "/api/v1/auth/profile", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let ctx = context_of(response).await;
        assert_eq!(ctx["authenticated"], true);
        assert_eq!(ctx["username"], "alice");
        assert_eq!(ctx["user_id"], 5);
        assert_eq!(ctx["roles"], serde_json::json!(["USER"]));
    }

    #[tokio::test]
    async fn test_missing_token_is_anonymous() {
        let (_, layer) = setup();

        let response = echo(&layer)
            .oneshot(request(Method::GET, "/api/v1/auth/profile", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(context_of(response).await["authenticated"], false);
    }

    #[tokio::test]
    async fn test_invalid_token_on_protected_route() {
        let (_, layer) = setup();

        let response = echo(&layer)
            .oneshot(request(Method::GET, "/api/v1/auth/profile", Some("garbage")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_expired_token_on_protected_route() {
        let (issuer, layer) = setup();
        let token = issuer
            .issue_at(&Principal::new("alice"), Utc::now() - Duration::hours(2))
            .unwrap();

        let response = echo(&layer)
            .oneshot(request(Method::POST, "/api/v1/reviews", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_invalid_token_on_public_route_is_anonymous() {
        let (_, layer) = setup();

        let response = echo(&layer)
            .oneshot(request(Method::GET, "/api/v1/reviews", Some("garbage")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(context_of(response).await["authenticated"], false);
    }
}
