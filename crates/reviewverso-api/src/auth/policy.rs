// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route authorization policy.
//!
//! A static table mapping `(method, path pattern)` to the access a caller
//! needs. Decisions are made in four tiers:
//!
//! 1. public rules allow everyone;
//! 2. role rules, first match in declaration order, need one of the listed roles;
//! 3. any other path under the API prefix needs an authenticated caller;
//! 4. everything else is denied.

use axum::http::Method;

use super::{AuthError, AuthResult};

/// Role granted to ordinary accounts.
pub const ROLE_USER: &str = "USER";

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Access
// =============================================================================

/// What a caller needs to reach a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Anyone, with or without a credential.
    Public,
    /// Any authenticated caller.
    Authenticated,
    /// An authenticated caller holding at least one of these roles.
    AnyRole(Vec<String>),
}

impl Access {
    /// Creates an [`Access::AnyRole`] requirement.
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Access::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    fn check(&self, roles: Option<&[String]>) -> AuthResult<()> {
        match (self, roles) {
            (Access::Public, _) => Ok(()),
            (_, None) => Err(AuthError::Unauthenticated),
            (Access::Authenticated, Some(_)) => Ok(()),
            (Access::AnyRole(required), Some(held)) => {
                if required.iter().any(|r| held.contains(r)) {
                    Ok(())
                } else {
                    Err(AuthError::Forbidden)
                }
            }
        }
    }
}

// =============================================================================
// PathPattern
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    Rest,
}

/// A route pattern: literal segments, `{name}` single-segment parameters and
/// an optional trailing `**` that matches any remainder, including none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern such as `/api/v1/reviews/{id}/like`.
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                if segment == "**" {
                    Segment::Rest
                } else if segment.starts_with('{') && segment.ends_with('}') {
                    Segment::Param
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();

        Self { segments }
    }

    /// Returns `true` if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(path);

        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if parts.next() != Some(literal.as_str()) {
                        return false;
                    }
                }
            }
        }

        parts.next().is_none()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

// =============================================================================
// Rule
// =============================================================================

/// One entry of the policy table.
#[derive(Debug, Clone)]
pub struct Rule {
    method: Option<Method>,
    pattern: PathPattern,
    access: Access,
}

impl Rule {
    /// Creates a rule for a single method.
    pub fn new(method: Method, pattern: &str, access: Access) -> Self {
        Self {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            access,
        }
    }

    /// Creates a rule matching every method.
    pub fn any_method(pattern: &str, access: Access) -> Self {
        Self {
            method: None,
            pattern: PathPattern::parse(pattern),
            access,
        }
    }

    /// Returns the required access.
    pub fn access(&self) -> &Access {
        &self.access
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

// =============================================================================
// AuthorizationPolicy
// =============================================================================

/// The route authorization table.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    prefix: String,
    public: Vec<Rule>,
    restricted: Vec<Rule>,
}

impl AuthorizationPolicy {
    /// Creates an empty builder for routes under `prefix`.
    pub fn builder(prefix: impl Into<String>) -> AuthorizationPolicyBuilder {
        AuthorizationPolicyBuilder::new(prefix)
    }

    /// Returns the route table of the review service under `prefix`.
    pub fn reviewverso(prefix: &str) -> Self {
        let p = prefix;
        let user_or_admin = || Access::any_role([ROLE_USER, ROLE_ADMIN]);
        let admin = || Access::any_role([ROLE_ADMIN]);

        Self::builder(prefix)
            // Public
            .public(Method::GET, "/health")
            .public(Method::POST, &format!("{p}/register"))
            .public(Method::POST, &format!("{p}/auth/login"))
            .public(Method::POST, &format!("{p}/auth/logout"))
            .public(Method::POST, &format!("{p}/auth/token"))
            .public(Method::GET, &format!("{p}/files/**"))
            .public(Method::GET, &format!("{p}/reviews"))
            .public(Method::GET, &format!("{p}/reviews/{{id}}"))
            .public(Method::GET, &format!("{p}/reviews/user/{{userId}}"))
            .public(Method::GET, &format!("{p}/reviews/content"))
            .public(Method::GET, &format!("{p}/reviews/content/stats"))
            .public(Method::GET, &format!("{p}/lists"))
            .public(Method::GET, &format!("{p}/lists/{{id}}"))
            .public(Method::GET, &format!("{p}/lists/user/{{userId}}"))
            // Users
            .rule(Rule::new(Method::GET, &format!("{p}/users/me"), user_or_admin()))
            .rule(Rule::new(Method::GET, &format!("{p}/users"), admin()))
            .rule(Rule::new(Method::GET, &format!("{p}/users/{{id}}"), admin()))
            .rule(Rule::new(Method::DELETE, &format!("{p}/users/{{id}}"), admin()))
            .rule(Rule::new(Method::PUT, &format!("{p}/users/{{id}}"), user_or_admin()))
            // Reviews
            .rule(Rule::new(Method::POST, &format!("{p}/reviews"), user_or_admin()))
            .rule(Rule::new(Method::PUT, &format!("{p}/reviews/{{id}}"), user_or_admin()))
            .rule(Rule::new(Method::DELETE, &format!("{p}/reviews/{{id}}"), user_or_admin()))
            .rule(Rule::new(Method::POST, &format!("{p}/reviews/{{id}}/like"), user_or_admin()))
            .rule(Rule::new(Method::DELETE, &format!("{p}/reviews/{{id}}/like"), user_or_admin()))
            // Lists
            .rule(Rule::new(Method::POST, &format!("{p}/lists"), user_or_admin()))
            .rule(Rule::new(Method::PUT, &format!("{p}/lists/{{id}}"), user_or_admin()))
            .rule(Rule::new(Method::DELETE, &format!("{p}/lists/{{id}}"), user_or_admin()))
            // Files
            .rule(Rule::new(
                Method::PUT,
                &format!("{p}/files/images/{{fileName}}"),
                user_or_admin(),
            ))
            .build()
    }

    /// Returns the API prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` if the route needs no credential.
    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.public.iter().any(|rule| rule.matches(method, path))
    }

    /// Returns the access the route requires, or `None` if it is denied to all.
    pub fn required_access(&self, method: &Method, path: &str) -> Option<Access> {
        if self.is_public(method, path) {
            return Some(Access::Public);
        }
        if let Some(rule) = self.restricted.iter().find(|rule| rule.matches(method, path)) {
            return Some(rule.access.clone());
        }
        if self.is_under_prefix(path) {
            return Some(Access::Authenticated);
        }
        None
    }

    /// Decides whether a caller holding `roles` may reach the route.
    ///
    /// `roles` is `None` for an anonymous caller. An authenticated caller with
    /// an empty role set is still authenticated.
    pub fn authorize(&self, method: &Method, path: &str, roles: Option<&[String]>) -> AuthResult<()> {
        match self.required_access(method, path) {
            Some(access) => access.check(roles),
            None if roles.is_some() => Err(AuthError::Forbidden),
            None => Err(AuthError::Unauthenticated),
        }
    }

    fn is_under_prefix(&self, path: &str) -> bool {
        path.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`AuthorizationPolicy`].
#[derive(Debug)]
pub struct AuthorizationPolicyBuilder {
    prefix: String,
    public: Vec<Rule>,
    restricted: Vec<Rule>,
}

impl AuthorizationPolicyBuilder {
    /// Creates a new builder.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            public: Vec::new(),
            restricted: Vec::new(),
        }
    }

    /// Adds a public route.
    pub fn public(self, method: Method, pattern: &str) -> Self {
        self.rule(Rule::new(method, pattern, Access::Public))
    }

    /// Adds a route requiring any of `roles`.
    pub fn require_any<I, S>(self, method: Method, pattern: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(Rule::new(method, pattern, Access::any_role(roles)))
    }

    /// Adds a rule. Public rules always win over restricted ones.
    pub fn rule(mut self, rule: Rule) -> Self {
        match rule.access {
            Access::Public => self.public.push(rule),
            _ => self.restricted.push(rule),
        }
        self
    }

    /// Builds the policy.
    pub fn build(self) -> AuthorizationPolicy {
        AuthorizationPolicy {
            prefix: self.prefix,
            public: self.public,
            restricted: self.restricted,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
