// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Reviewverso Integration Tests
//!
//! End-to-end tests for the token security stack and the shared helpers they
//! use.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Seed users, principals and configurations
//!   - `harness`: In-process HTTP client over the full router
//!   - `assertions`: Response assertion helpers
//!   - `mocks`: Recording identity resolver
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p reviewverso-tests
//! cargo test -p reviewverso-tests --test integration_auth
//! cargo test -p reviewverso-tests --test integration_http
//! cargo test -p reviewverso-tests --test integration_config
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use reviewverso_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.login_token(ALICE, ALICE_PASSWORD).await;
//!     app.get("/api/v1/auth/profile", Some(&token)).await.assert_ok();
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}
