// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! The security stack, outermost first:
//!
//! - [`RevocationGate`]: rejects revoked bearer tokens
//! - [`AuthMiddleware`]: bearer token authentication
//! - [`PolicyMiddleware`]: route authorization

mod auth;
mod policy;
mod revocation;

pub use auth::{AuthLayer, AuthMiddleware};
pub use policy::{PolicyLayer, PolicyMiddleware};
pub use revocation::{RevocationGate, RevocationLayer};
