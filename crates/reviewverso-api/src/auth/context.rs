// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Claims;

/// Authentication context for a request.
///
/// Attached to request extensions by the authentication layer. Requests
/// without a usable credential carry an anonymous context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Whether a valid credential was presented.
    pub authenticated: bool,
    /// Username (token subject), or `anonymous`.
    pub username: String,
    /// Numeric user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// User's email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Roles from the token scope.
    pub roles: Vec<String>,
    /// Token id (`jti`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates an authenticated context from validated claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            authenticated: true,
            username: claims.sub.clone(),
            user_id: claims.user_id,
            email: claims.email.clone(),
            roles: claims.role_list(),
            token_id: claims.jti.clone(),
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Creates an anonymous context.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            username: "anonymous".to_string(),
            user_id: None,
            email: None,
            roles: Vec::new(),
            token_id: None,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.client_ip = ip;
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the caller's roles, or `None` for an anonymous caller.
    pub fn role_set(&self) -> Option<&[String]> {
        self.authenticated.then_some(self.roles.as_slice())
    }

    /// Returns `true` if the context has the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Returns `true` if the context has any of the given roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Returns `true` if this is an anonymous context.
    pub fn is_anonymous(&self) -> bool {
        !self.authenticated
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::builder("alice")
            .roles(["USER", "ADMIN"])
            .user_id(Some(3))
            .token_id("jti-1")
            .build();

        let ctx = AuthContext::from_claims(&claims);

        assert!(ctx.authenticated);
        assert_eq!(ctx.username, "alice");
        assert_eq!(ctx.user_id, Some(3));
        assert_eq!(ctx.token_id.as_deref(), Some("jti-1"));
        assert!(ctx.has_role("ADMIN"));
        assert!(ctx.has_any_role(&["AUDITOR", "USER"]));
        assert!(!ctx.has_any_role(&["AUDITOR"]));
    }

    #[test]
    fn test_anonymous_context() {
        let ctx = AuthContext::anonymous();

        assert!(ctx.is_anonymous());
        assert!(ctx.roles.is_empty());
        assert!(ctx.role_set().is_none());
    }

    #[test]
    fn test_empty_scope_is_still_authenticated() {
        let ctx = AuthContext::from_claims(&Claims::builder("nobody").build());

        assert!(!ctx.is_anonymous());
        assert_eq!(ctx.role_set(), Some(&[][..]));
    }
}
