// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for dzmod.

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::server::args::server_configs;

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    if let Some(warning) = config.source_root_mismatch() {
        tracing::warn!("{warning}");
    }
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}

/// List `.cfg` files in the server directory, marking the active one.
///
/// # Errors
///
/// Returns an error if `paths.server` is not configured.
pub async fn run_configs_command(config: &Config) -> Result<()> {
    let server_dir = config
        .paths
        .server_dir()
        .ok_or_else(|| ConfigError::MissingKey {
            section: "paths".to_string(),
            key: "server".to_string(),
        })?;

    let configs = server_configs(server_dir, &config.server.config_file).await;
    if configs.is_empty() {
        println!("No server configs in {}", server_dir.display());
    }
    for cfg in configs {
        let marker = if cfg.active { "*" } else { " " };
        println!("{marker} {}", cfg.name);
    }
    Ok(())
}
