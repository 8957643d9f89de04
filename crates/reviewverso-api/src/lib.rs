// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # reviewverso-api
//!
//! Bearer-token security for the Reviewverso HTTP API.
//!
//! This crate provides HS512 token issuance and validation, a revoked-token
//! store with inline expiry, the route authorization policy, and the axum
//! server that wires them into a tower middleware stack.
//!
//! ```rust,ignore
//! let server = ApiServerBuilder::new()
//!     .config(config)
//!     .identity(Arc::new(InMemoryIdentityResolver::new(users)))
//!     .build()?;
//! server.run_with_shutdown(shutdown_signal()).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AuthContext, AuthError, AuthResult, AuthorizationPolicy, Claims, ClaimsCodec, JwtConfig,
    Principal, RevocationStore, TokenIssuer, TokenValidator,
};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use identity::{IdentityResolver, InMemoryIdentityResolver, UserRecord};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
