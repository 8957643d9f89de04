// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate configuration file
//! - `version`: Show version information
//! - `gen-secret`: Generate a token signing secret

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Reviewverso API server
///
/// Issues, validates and revokes bearer tokens, and enforces the route
/// authorization policy in front of the Reviewverso API.
#[derive(Parser, Debug)]
#[command(
    name = "reviewverso",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "Reviewverso API server",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "reviewverso.yaml",
        env = "REVIEWVERSO_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REVIEWVERSO_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, env = "REVIEWVERSO_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    Run,

    /// Validate the configuration file
    ///
    /// Loads and validates the configuration without starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Generate a token signing secret
    ///
    /// Prints a random base64 secret suitable for `api.jwt.secret`.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `gen-secret` command.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Number of random bytes (at least 32)
    #[arg(short, long, default_value_t = 64, value_parser = clap::value_parser!(u16).range(32..=1024))]
    pub bytes: u16,
}

impl Default for GenSecretArgs {
    fn default() -> Self {
        Self { bytes: 64 }
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
    /// YAML format
    Yaml,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Get the effective log level.
    ///
    /// `--quiet` and `--verbose` win over `--log-level`, which wins over
    /// the configuration file.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Get the effective log format.
    pub fn effective_log_format(&self, configured: LogFormat) -> LogFormat {
        self.log_format.unwrap_or(configured)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["reviewverso"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["reviewverso", "validate", "--show-config", "-f", "json"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["reviewverso", "-c", "/etc/reviewverso/config.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/reviewverso/config.toml"));
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["reviewverso", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "trace");

        let cli = Cli::parse_from(["reviewverso", "-l", "trace", "-q"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["reviewverso", "-v"]);
        assert_eq!(cli.effective_log_level("info"), "debug");
    }

    #[test]
    fn test_log_format_override() {
        let cli = Cli::parse_from(["reviewverso", "--log-format", "json"]);
        assert_eq!(cli.effective_log_format(LogFormat::Text), LogFormat::Json);
    }

    #[test]
    fn test_gen_secret_command() {
        let cli = Cli::parse_from(["reviewverso", "gen-secret", "--bytes", "48"]);
        if let Some(Commands::GenSecret(args)) = cli.command {
            assert_eq!(args.bytes, 48);
        } else {
            panic!("Expected GenSecret command");
        }
    }

    #[test]
    fn test_gen_secret_rejects_short_secrets() {
        assert!(Cli::try_parse_from(["reviewverso", "gen-secret", "--bytes", "8"]).is_err());
    }
}
