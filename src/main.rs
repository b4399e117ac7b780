// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Scan | Status | Build | Link | Server | Client | Auto | Configs
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use dzmod::cli::global::GlobalOptions;
use dzmod::cli::{self, Command};
use dzmod::cmd::config::{run_configs_command, run_inis_command, run_options_command};
use dzmod::cmd::mods::{
    run_build_command, run_link_command, run_scan_command, run_status_command,
};
use dzmod::cmd::server::{run_auto_command, run_client_command, run_server_command};
use dzmod::config::provider::{ConfigProvider, ReloadingConfig};
use dzmod::config::loader::ConfigLoader;
use dzmod::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use dzmod::logging::init_logging;
use dzmod::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let loaded = build_config_loader(&cli.global)
        .and_then(|loader| loader.build().map(|config| (loader, config)));

    let log_config = build_log_config(&cli.global, loaded.as_ref().ok().map(|(_, c)| c));
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, loaded).await
}

/// Logging follows the loaded `[global]` section, or the CLI flags alone when
/// the configuration could not be loaded.
fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    if let Some(config) = config {
        let log_file = Some(&config.global.log_file)
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.display().to_string());
        return LogConfig::builder()
            .with_console_level(config.global.output_log_level)
            .with_file_level(config.global.file_log_level)
            .maybe_with_log_file(log_file)
            .build();
    }

    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(
    cli: &cli::Cli,
    loaded: dzmod::error::Result<(ConfigLoader, Config)>,
) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
        Some(command) => match loaded {
            Ok((loader, config)) => run_with_config(command, loader, config).await,
            Err(e) => {
                eprintln!("Failed to load config: {e:#}");
                Err(e)
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_with_config(
    command: &Command,
    loader: ConfigLoader,
    config: Config,
) -> dzmod::error::Result<()> {
    match command {
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Inis => {
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Command::Configs => run_configs_command(&config).await,
        command => {
            if let Some(warning) = config.source_root_mismatch() {
                tracing::warn!("{warning}");
            }
            let provider: Arc<dyn ConfigProvider> =
                Arc::new(ReloadingConfig::new(loader, config));
            match command {
                Command::Scan(args) => run_scan_command(args, provider).await,
                Command::Status(args) => run_status_command(args, provider).await,
                Command::Build(args) => run_build_command(args, provider).await,
                Command::Link(args) => run_link_command(args, provider).await,
                Command::Server => run_server_command(provider).await,
                Command::Client(args) => run_client_command(args, provider).await,
                Command::Auto(args) => run_auto_command(args, provider).await,
                Command::Version | Command::Options | Command::Inis | Command::Configs => Ok(()),
            }
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Layering: `dzmod.toml` in the working directory, then `--ini` files, then
/// `DZMOD_*` environment variables, then CLI overrides.
fn build_config_loader(global: &GlobalOptions) -> dzmod::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader
        .with_env_prefix(ENV_PREFIX)
        .with_overrides(&global.to_config_overrides())
}
