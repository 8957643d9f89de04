// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route authorization middleware.

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

use crate::auth::{AuthContext, AuthError, AuthorizationPolicy};

// =============================================================================
// PolicyLayer
// =============================================================================

/// Layer enforcing the [`AuthorizationPolicy`].
///
/// Must run inside [`AuthLayer`](super::AuthLayer); a request without an
/// attached context is treated as anonymous.
#[derive(Clone)]
pub struct PolicyLayer {
    policy: Arc<AuthorizationPolicy>,
}

impl PolicyLayer {
    /// Creates a new policy layer.
    pub fn new(policy: Arc<AuthorizationPolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for PolicyLayer {
    type Service = PolicyMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PolicyMiddleware {
            inner,
            policy: self.policy.clone(),
        }
    }
}

// =============================================================================
// PolicyMiddleware
// =============================================================================

/// Middleware answering 401 or 403 for requests the policy denies.
#[derive(Clone)]
pub struct PolicyMiddleware<S> {
    inner: S,
    policy: Arc<AuthorizationPolicy>,
}

impl<S> Service<Request<Body>> for PolicyMiddleware<S>
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
        let decision = {
            let roles = req
                .extensions()
                .get::<AuthContext>()
                .and_then(AuthContext::role_set);
            self.policy.authorize(req.method(), req.uri().path(), roles)
        };

        if let Err(e) = decision {
            match e {
                AuthError::Forbidden => {
                    let username = req
                        .extensions()
                        .get::<AuthContext>()
                        .map(|ctx| ctx.username.as_str())
                        .unwrap_or("anonymous");
                    tracing::warn!(
                        username = %username,
                        method = %req.method(),
                        path = %req.uri().path(),
                        "Access denied"
                    );
                }
                _ => tracing::debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "Authentication required"
                ),
            }
            return Box::pin(async move { Ok(e.into_response()) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

// =============================================================================
// Tests
// =============================================================================
