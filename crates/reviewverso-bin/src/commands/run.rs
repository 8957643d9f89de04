// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use crate::cli::Cli;
use crate::config::ConfigLoader;
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::RuntimeBuilder;

/// Loads the configuration, installs logging and serves until shutdown.
pub async fn run(cli: &Cli) -> BinResult<()> {
    let config = ConfigLoader::new().load(&cli.config)?;

    init_logging(
        cli.effective_log_level(&config.logging.level),
        cli.effective_log_format(config.logging.format),
    )?;

    RuntimeBuilder::new().config(config).build()?.run().await
}
