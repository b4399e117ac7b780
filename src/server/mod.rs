// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local DayZ server and client.
//!
//! ```text
//! ServerController
//!   handle: Absent --start--> Running(RunningProcess) --exit/stop--> Exited(code)
//!                                  ^                                    |
//!                                  +-------------start------------------+
//!
//! launch_client:
//!   for @mod in server dir: link client/@mod -> realpath(server/@mod)
//!   DayZ_BE.exe -connect -port -profiles -malloc -noborder -mod   (detached)
//! ```
//!
//! There is at most one server per controller. The client is fire-and-forget.

pub mod args;


use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::provider::ConfigProvider;
use crate::core::process::RunningProcess;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{ConfigError, FsError, Result, bail_out};
use crate::links;

use args::{
    CLIENT_EXE, CLIENT_GAME_EXE, client_args, enabled_mods, server_args, server_executable,
};

/// Lifecycle of the server child process.
#[derive(Debug, Default)]
pub enum ServerHandle {
    #[default]
    Absent,
    Running(RunningProcess),
    Exited(i32),
}

impl ServerHandle {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Running(_) => "running",
            Self::Exited(_) => "exited",
        }
    }
}

fn missing_path(key: &str) -> ConfigError {
    ConfigError::MissingKey {
        section: "paths".to_string(),
        key: key.to_string(),
    }
}

/// Starts, watches and stops the dedicated server; launches the client.
pub struct ServerController {
    config: Arc<dyn ConfigProvider>,
    handle: ServerHandle,
}

impl ServerController {
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            config,
            handle: ServerHandle::Absent,
        }
    }

    #[must_use]
    pub const fn handle(&self) -> &ServerHandle {
        &self.handle
    }

    /// Returns true while the server process is alive.
    ///
    /// Moves the handle to `Exited` once the process has gone away.
    pub fn is_running(&mut self) -> bool {
        let ServerHandle::Running(process) = &mut self.handle else {
            return false;
        };
        match process.try_wait() {
            Ok(None) => true,
            Ok(Some(code)) => {
                info!(exit_code = code, "server exited");
                self.handle = ServerHandle::Exited(code);
                false
            }
            Err(e) => {
                warn!(error = %e, "cannot query server status");
                true
            }
        }
    }

    /// Starts the server from the configured directory.
    ///
    /// # Errors
    ///
    /// Fails if a server is already running, the server path is not
    /// configured, the executable is missing or it cannot be spawned.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(bail_out("server is already running").into());
        }

        let config = self.config.snapshot();
        let (exe, dir) = server_executable(&config).ok_or_else(|| missing_path("server"))?;
        match tokio::fs::metadata(&exe).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(FsError::NotFound(exe.display().to_string()).into()),
            Err(e) => return Err(FsError::from_io(&exe, e).into()),
        }

        let config_file = config.server.config_file.as_str();
        let has_config = tokio::fs::metadata(dir.join(config_file))
            .await
            .is_ok_and(|m| m.is_file());
        if !has_config {
            warn!(file = config_file, dir = %dir.display(), "server config not found, using server defaults");
        }

        let mods = enabled_mods(&dir).await;
        if mods.is_empty() {
            info!("no mods enabled in server directory");
        } else {
            info!(mods = %mods.join(";"), "enabled mods");
        }

        let process = ProcessBuilder::new(&exe)
            .name("server")
            .cwd(&dir)
            .args(server_args(has_config.then_some(config_file), &mods))
            .spawn()
            .context("failed to start server")?;
        info!(pid = ?process.id(), exe = %exe.display(), "server started");

        self.handle = ServerHandle::Running(process);
        Ok(())
    }

    /// Stops the server if it is running and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be waited on.
    pub async fn stop(&mut self) -> Result<Option<i32>> {
        match std::mem::take(&mut self.handle) {
            ServerHandle::Running(mut process) => {
                let code = process.terminate().await?;
                info!(exit_code = code, "server stopped");
                self.handle = ServerHandle::Exited(code);
                Ok(Some(code))
            }
            other => {
                debug!(state = other.label(), "server is not running");
                self.handle = other;
                Ok(None)
            }
        }
    }

    /// Waits for the running server to exit on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if no server is running or waiting fails.
    pub async fn wait(&mut self) -> Result<i32> {
        let ServerHandle::Running(process) = &mut self.handle else {
            return Err(bail_out("server is not running").into());
        };
        let code = process.wait().await?;
        info!(exit_code = code, "server exited");
        self.handle = ServerHandle::Exited(code);
        Ok(code)
    }

    /// Mirrors the server's mods into the client directory and launches the
    /// client detached. Returns the mods passed to the client.
    ///
    /// # Errors
    ///
    /// Fails if the client path is not configured, the launcher is missing or
    /// it cannot be spawned. Individual mod links failing is only logged.
    pub async fn launch_client(&self) -> Result<Vec<String>> {
        let config = self.config.snapshot();
        let client_dir = config
            .paths
            .client_dir()
            .ok_or_else(|| missing_path("client"))?
            .to_path_buf();
        let exe = client_dir.join(CLIENT_EXE);
        match tokio::fs::metadata(&exe).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(FsError::NotFound(exe.display().to_string()).into()),
            Err(e) => return Err(FsError::from_io(&exe, e).into()),
        }

        let mut mods = Vec::new();
        if let Some(server_dir) = config.paths.server_dir() {
            for name in enabled_mods(server_dir).await {
                let source = server_dir.join(&name);
                let reports = links::set_enabled(
                    std::slice::from_ref(&client_dir),
                    &source,
                    &name,
                    true,
                )
                .await;
                if reports.iter().any(|r| r.outcome.is_failure()) {
                    warn!(mod_name = %name, "could not mirror mod into client directory");
                    continue;
                }
                mods.push(name);
            }
        }

        let process = ProcessBuilder::new(&exe)
            .name("client")
            .cwd(&client_dir)
            .args(client_args(&config, &mods))
            .flag(ProcessFlags::DETACHED)
            .spawn()
            .context("failed to launch client")?;
        info!(pid = ?process.id(), "client launched");
        Ok(mods)
    }

    /// Force-kills the client launcher and game.
    ///
    /// Returns true if the game process was killed.
    ///
    /// # Errors
    ///
    /// Fails on platforms other than Windows.
    pub async fn kill_client(&self) -> Result<bool> {
        if !cfg!(windows) {
            return Err(bail_out("killing the client is only supported on Windows").into());
        }
        let mut killed = false;
        for image in [CLIENT_EXE, CLIENT_GAME_EXE] {
            let output = ProcessBuilder::new("taskkill")
                .args(["/im", image, "/F"])
                .flag(ProcessFlags::ALLOW_FAILURE)
                .quiet()
                .run()
                .await?;
            debug!(image, exit_code = output.exit_code(), "taskkill");
            killed = image == CLIENT_GAME_EXE && output.success();
        }
        if killed {
            info!("client killed");
        }
        Ok(killed)
    }

    /// Server directory from the current configuration.
    #[must_use]
    pub fn server_dir(&self) -> Option<PathBuf> {
        self.config
            .snapshot()
            .paths
            .server_dir()
            .map(std::path::Path::to_path_buf)
    }
}
