// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Revoked-token gate.

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

use crate::auth::{AuthError, RevocationStore};
use crate::extractors::bearer_token;

// =============================================================================
// RevocationLayer
// =============================================================================

/// Layer that rejects requests carrying a revoked bearer token.
///
/// Install it outside [`AuthLayer`](super::AuthLayer) so revoked tokens never
/// reach signature verification.
#[derive(Clone)]
pub struct RevocationLayer {
    store: Arc<RevocationStore>,
}

impl RevocationLayer {
    /// Creates a new gate layer over `store`.
    pub fn new(store: Arc<RevocationStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for RevocationLayer {
    type Service = RevocationGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RevocationGate {
            inner,
            store: self.store.clone(),
        }
    }
}

// =============================================================================
// RevocationGate
// =============================================================================

/// Middleware answering `401 TOKEN_REVOKED` for revoked tokens.
///
/// Requests without a bearer token pass through untouched.
#[derive(Clone)]
pub struct RevocationGate<S> {
    inner: S,
    store: Arc<RevocationStore>,
}

impl<S> Service<Request<Body>> for RevocationGate<S>
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
        let revoked = bearer_token(req.headers()).is_some_and(|token| self.store.is_revoked(token));

        if revoked {
            tracing::info!(
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected revoked token"
            );
            return Box::pin(async { Ok(AuthError::Revoked.into_response()) });
        }

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
    use axum::http::{header, StatusCode};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn gate(
        store: Arc<RevocationStore>,
        calls: Arc<AtomicUsize>,
    ) -> impl Service<Request<Body>, Response = Response, Error = std::convert::Infallible> {
        RevocationLayer::new(store).layer(tower::service_fn(move |_req: Request<Body>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::convert::Infallible>(Response::new(Body::from("inner")))
            }
        }))
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/v1/reviews");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let store = Arc::new(RevocationStore::new());
        store.invalidate("revoked.token.value", Utc::now() + Duration::hours(1));
        let calls = Arc::new(AtomicUsize::new(0));

        let response = gate(store, calls.clone())
            .oneshot(request(Some("Bearer revoked.token.value")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "TOKEN_REVOKED");
        assert_eq!(body["error"]["message"], "Token has been revoked");
    }

    #[tokio::test]
    async fn test_other_requests_pass_through() {
        let store = Arc::new(RevocationStore::new());
        store.invalidate("revoked", Utc::now() + Duration::hours(1));
        let calls = Arc::new(AtomicUsize::new(0));

        for auth in [None, Some("Bearer live"), Some("Basic cmV2b2tlZDp4")] {
            let response = gate(store.clone(), calls.clone())
                .oneshot(request(auth))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_expired_revocation_passes() {
        let store = Arc::new(RevocationStore::new());
        store.invalidate("old", Utc::now() - Duration::seconds(1));
        let calls = Arc::new(AtomicUsize::new(0));

        let response = gate(store, calls)
            .oneshot(request(Some("Bearer old")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
