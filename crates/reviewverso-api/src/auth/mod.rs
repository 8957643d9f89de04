// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Signed token encoding and verification
//! - Token issuance and validation
//! - The revoked-token store
//! - The route authorization policy
//! - Authentication context

mod claims;
mod codec;
mod context;
mod error;
mod issuer;
pub mod policy;
mod principal;
mod revocation;
mod validator;

pub use claims::{Claims, ClaimsBuilder, TOKEN_ISSUER, TOKEN_LIFETIME_SECS};
pub use codec::{ClaimsCodec, JwtConfig, SIGNING_ALGORITHM};
pub use context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use issuer::{normalize_role, TokenIssuer};
pub use policy::{Access, AuthorizationPolicy, PathPattern, Rule, ROLE_ADMIN, ROLE_USER};
pub use principal::Principal;
pub use revocation::RevocationStore;
pub use validator::TokenValidator;
