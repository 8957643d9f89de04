// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Turns an [`AppConfig`] into a running [`ApiServer`]: seeds the identity
//! resolver, builds the middleware stack and serves until a shutdown signal
//! arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reviewverso_api::{ApiServer, ApiServerBuilder, InMemoryIdentityResolver};
use tracing::info;

use crate::config::{AppConfig, ConfigLoader};
use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServerRuntime
// =============================================================================

/// Owns the configuration and shutdown coordination for one server run.
pub struct ServerRuntime {
    config: AppConfig,
    shutdown: ShutdownCoordinator,
}

impl ServerRuntime {
    /// Creates a new runtime.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Builds the API server from the configuration.
    pub fn build_server(&self) -> BinResult<ApiServer> {
        let identity = InMemoryIdentityResolver::new(self.config.users.iter().cloned());

        let server = ApiServerBuilder::new()
            .config(self.config.api.clone())
            .identity(Arc::new(identity))
            .build()
            .map_err(|e| BinError::from(e).with_context("Failed to build API server"))?;

        Ok(server)
    }

    /// Runs the server until SIGINT/SIGTERM or a manual shutdown request.
    pub async fn run(self) -> BinResult<()> {
        info!(version = crate::VERSION, "Starting Reviewverso API server");

        let server = self.build_server()?;
        info!(
            addr = %server.addr(),
            users = self.config.users.len(),
            "Components initialized"
        );

        let signal = self.shutdown.shutdown_signal();
        let watcher = self.shutdown.clone();
        let signal_task = tokio::spawn(async move { watcher.wait_for_os_signal().await });

        let result = server.run_with_shutdown(signal.wait()).await;
        signal_task.abort();

        result?;
        info!("Reviewverso API server stopped");
        Ok(())
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<AppConfig>,
    loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the loader used for `config_path`.
    pub fn loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServerRuntime> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::init("No configuration provided"))?;
                self.loader.load(&path)?
            }
        };

        Ok(ServerRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reviewverso_api::{JwtConfig, UserRecord};
    use std::time::Duration;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.api.jwt = JwtConfig::new("runtime-test-secret-that-is-long-enough-for-hs512-signing-xx");
        config.api.host = "127.0.0.1".parse().unwrap();
        config.api.port = 0;
        config.users = vec![UserRecord::new("alice", "wonderland").with_role("USER")];
        config
    }

    #[test]
    fn test_runtime_builder_requires_config() {
        assert!(RuntimeBuilder::new().build().is_err());
    }

    #[test]
    fn test_runtime_builder_validates_config() {
        let mut config = test_config();
        config.api.jwt = JwtConfig::default();
        let err = RuntimeBuilder::new().config(config).build().err().unwrap();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_build_server() {
        let runtime = RuntimeBuilder::new().config(test_config()).build().unwrap();
        let server = runtime.build_server().unwrap();
        assert_eq!(server.addr().port(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_manual_shutdown() {
        let runtime = RuntimeBuilder::new().config(test_config()).build().unwrap();
        let shutdown = runtime.shutdown().clone();

        let handle = tokio::spawn(runtime.run());
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.initiate_shutdown();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop")
            .expect("task should not panic");
        assert!(result.is_ok());
    }
}
