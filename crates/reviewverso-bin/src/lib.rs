// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # reviewverso-bin
//!
//! CLI binary for the Reviewverso API server.
//!
//! ```text
//!   main.rs ──► cli.rs ──► commands ──► runtime ──► reviewverso-api
//!                             │            │
//!                          config       shutdown
//!                          logging
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! reviewverso -c /etc/reviewverso/config.yaml
//!
//! # Validate configuration
//! reviewverso validate --show-config
//!
//! # Generate a signing secret
//! reviewverso gen-secret
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use config::{AppConfig, ConfigError, ConfigLoader};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{RuntimeBuilder, ServerRuntime};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
