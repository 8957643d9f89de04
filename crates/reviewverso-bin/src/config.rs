// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration file loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw content
//! 3. Parse into [`AppConfig`]
//! 4. Apply `REVIEWVERSO_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! REVIEWVERSO_JWT_SECRET=...
//! REVIEWVERSO_API_PORT=9090
//! REVIEWVERSO_API_PREFIX=/api/v2
//! REVIEWVERSO_LOG_LEVEL=debug
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use reviewverso_api::{ApiConfig, UserRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cli::LogFormat;

/// Prefix of override environment variables.
pub const ENV_PREFIX: &str = "REVIEWVERSO";

// =============================================================================
// ConfigError
// =============================================================================

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// File I/O error.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Invalid environment variable value.
    #[error("Invalid environment variable value for '{name}': {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Unsupported file extension.
    #[error("Unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The extension found.
        format: String,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP API and token settings.
    pub api: ApiConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Accounts for the in-memory identity resolver.
    pub users: Vec<UserRecord>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api
            .validate()
            .map_err(|e| ConfigError::validation("api", e.to_string()))?;

        if parse_log_level(&self.logging.level).is_none() {
            return Err(ConfigError::validation(
                "logging.level",
                format!("unknown level '{}'", self.logging.level),
            ));
        }

        let mut usernames = HashSet::new();
        for (i, user) in self.users.iter().enumerate() {
            if user.username.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("users[{}].username", i),
                    "must not be empty",
                ));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(ConfigError::validation(
                    format!("users[{}].username", i),
                    format!("duplicate username '{}'", user.username),
                ));
            }
            if user.password.is_empty() {
                return Err(ConfigError::validation(
                    format!("users[{}].password", i),
                    "must not be empty",
                ));
            }
        }

        if self.users.is_empty() {
            warn!("No users configured; every login will fail");
        }

        Ok(())
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat { format: ext }),
        }
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Where environment lookups come from.
#[derive(Debug, Clone, Default)]
enum EnvSource {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    env: EnvSource,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader that sees only `vars` as its environment.
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: EnvSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the extension: `.yaml`/`.yml`, `.toml` or
    /// `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<AppConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = self.load_from_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        debug!(
            users = config.users.len(),
            base_path = %config.api.base_path,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<AppConfig> {
        let content = self.resolve_env_placeholders(content);
        let mut config = parse_str(&content, format)?;
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// Unset variables without a default are left as written.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return result;
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            match (self.env.get(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!(variable = name, "Environment variable not set");
                    result.push_str(&rest[start..start + 2 + end + 1]);
                }
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        result
    }

    /// Applies `REVIEWVERSO_*` overrides.
    fn apply_env_overrides(&self, config: &mut AppConfig) -> ConfigResult<()> {
        if let Some(value) = self.env.get(&format!("{}_JWT_SECRET", ENV_PREFIX)) {
            config.api.jwt.secret = value;
        }

        let port_var = format!("{}_API_PORT", ENV_PREFIX);
        if let Some(value) = self.env.get(&port_var) {
            config.api.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&port_var, "expected valid port number"))?;
        }

        if let Some(value) = self.env.get(&format!("{}_API_PREFIX", ENV_PREFIX)) {
            config.api.base_path = value;
        }

        let level_var = format!("{}_LOG_LEVEL", ENV_PREFIX);
        if let Some(value) = self.env.get(&level_var) {
            if parse_log_level(&value).is_none() {
                return Err(ConfigError::invalid_env_var(&level_var, "unknown log level"));
            }
            config.logging.level = value.to_lowercase();
        }

        Ok(())
    }
}

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<AppConfig> {
    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Normalizes a log level name, or returns `None` if it is unknown.
pub fn parse_log_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
