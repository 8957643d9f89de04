// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::config::{AppConfig, ConfigError, ConfigLoader};
use crate::error::BinResult;

/// Secrets shorter than this trigger a warning.
const RECOMMENDED_SECRET_LEN: usize = 64;

/// Result of a successful validation.
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    /// Always true; failures are reported as errors.
    pub valid: bool,
    /// Path of the validated file.
    pub config_path: String,
    /// Key settings.
    pub summary: Summary<'a>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// The parsed configuration, secrets omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a AppConfig>,
}

/// Key settings shown by `validate`.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    /// Listen address.
    pub listen: String,
    /// API route prefix.
    pub base_path: &'a str,
    /// Configured user count.
    pub users: usize,
    /// Log level.
    pub log_level: &'a str,
}

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = ConfigLoader::new().load(&cli.config)?;
    let report = build_report(&cli.config.display().to_string(), &config, args.show_config);

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|e| ConfigError::serialization(e.to_string()))?
        ),
        OutputFormat::Yaml => print!(
            "{}",
            serde_yaml::to_string(&report).map_err(|e| ConfigError::serialization(e.to_string()))?
        ),
    }

    Ok(())
}

/// Builds the report and collects warnings.
pub fn build_report<'a>(
    path: &str,
    config: &'a AppConfig,
    show_config: bool,
) -> ValidationReport<'a> {
    let mut warnings = Vec::new();

    if config.users.is_empty() {
        warnings.push("No users configured".to_string());
    }
    if config.api.jwt.secret.len() < RECOMMENDED_SECRET_LEN {
        warnings.push(format!(
            "api.jwt.secret is shorter than {} bytes",
            RECOMMENDED_SECRET_LEN
        ));
    }
    for user in config.users.iter().filter(|u| u.roles.is_empty()) {
        warnings.push(format!("User '{}' has no roles", user.username));
    }

    ValidationReport {
        valid: true,
        config_path: path.to_string(),
        summary: Summary {
            listen: config.api.socket_addr().to_string(),
            base_path: &config.api.base_path,
            users: config.users.len(),
            log_level: &config.logging.level,
        },
        warnings,
        config: show_config.then_some(config),
    }
}

fn print_text(report: &ValidationReport<'_>) {
    println!("✓ Configuration is valid: {}", report.config_path);
    println!();
    println!("Summary:");
    println!("  Listen:      {}", report.summary.listen);
    println!("  Base path:   {}", report.summary.base_path);
    println!("  Users:       {}", report.summary.users);
    println!("  Log level:   {}", report.summary.log_level);

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ⚠ {}", warning);
        }
    }

    if let Some(config) = report.config {
        println!();
        println!("Parsed configuration:");
        match serde_yaml::to_string(config) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => println!("  (serialization error: {})", e),
        }
    }
}
