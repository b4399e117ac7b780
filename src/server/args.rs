// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Server directory inspection and launch arguments.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::config::types::has_exe_extension;

/// Dedicated server executable inside the server directory.
pub const SERVER_EXE: &str = "DayZServer_x64.exe";

/// Client launcher inside the client directory.
pub const CLIENT_EXE: &str = "DayZ_BE.exe";

/// Game process started by the launcher.
pub const CLIENT_GAME_EXE: &str = "DayZ_x64.exe";

/// `@` entries in a directory (folders, links and junctions), sorted.
pub async fn enabled_mods(dir: &Path) -> Vec<String> {
    let mut mods = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list mods");
            return mods;
        }
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('@') {
            continue;
        }
        if entry
            .file_type()
            .await
            .is_ok_and(|ft| ft.is_dir() || ft.is_symlink())
        {
            mods.push(name);
        }
    }
    mods.sort();
    mods
}

/// Server executable and working directory for a configuration.
///
/// `paths.server` may name the directory or the executable itself.
#[must_use]
pub fn server_executable(config: &Config) -> Option<(PathBuf, PathBuf)> {
    let configured = config.paths.server_path()?;
    let dir = config.paths.server_dir()?.to_path_buf();
    let exe = if has_exe_extension(configured) {
        configured.to_path_buf()
    } else {
        dir.join(SERVER_EXE)
    };
    Some((exe, dir))
}

/// `-config=<file> -mod=@a;@b -profiles=profiles`, omitting what is absent.
#[must_use]
pub fn server_args(config_file: Option<&str>, mods: &[String]) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(file) = config_file {
        args.push(format!("-config={file}"));
    }
    if !mods.is_empty() {
        args.push(format!("-mod={}", mods.join(";")));
    }
    args.push("-profiles=profiles".to_string());
    args
}

/// Client arguments connecting to the configured server.
#[must_use]
pub fn client_args(config: &Config, mods: &[String]) -> Vec<String> {
    let mut args = vec![
        format!("-connect={}", config.server.ip),
        format!("-port={}", config.server.port),
        "-profiles=Profiles".to_string(),
        "-malloc=system".to_string(),
        "-noborder".to_string(),
    ];
    if !mods.is_empty() {
        args.push(format!("-mod={}", mods.join(";")));
    }
    args
}

/// A `.cfg` file in the server directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfigFile {
    pub name: String,
    pub path: PathBuf,
    pub active: bool,
}

/// Lists `*.cfg` files in `server_dir`, marking `active` (case-insensitive).
pub async fn server_configs(server_dir: &Path, active: &str) -> Vec<ServerConfigFile> {
    let mut configs = Vec::new();
    let mut entries = match tokio::fs::read_dir(server_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %server_dir.display(), error = %e, "cannot list server configs");
            return configs;
        }
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_cfg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cfg"));
        if !is_cfg || !entry.file_type().await.is_ok_and(|ft| ft.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        configs.push(ServerConfigFile {
            active: name.eq_ignore_ascii_case(active),
            name,
            path,
        });
    }
    configs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    configs
}
