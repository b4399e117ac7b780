// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   [global]  log levels, log file
//!   [paths]   source, output, key, server, client, workshop
//!   [build]   mod_folder_name, workspace_{name,file,folders}
//!   [server]  ip, port, config_file, client_delay_secs
//!   [tools]   pbo_project, ds_sign_file
//! ```
//!
//! Empty strings are treated the same as absent values everywhere; use the
//! accessor methods instead of reading the `Option` fields directly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogLevel;

/// Default source root (the DayZ Tools work drive).
pub const DEFAULT_SOURCE_ROOT: &str = "P:/";

/// Default server endpoint.
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 2302;

/// Default server configuration filename.
pub const DEFAULT_SERVER_CONFIG: &str = "serverDZ.cfg";

/// Default delay between server start and client launch in auto mode.
pub const DEFAULT_CLIENT_DELAY_SECS: u64 = 15;

fn non_empty_path(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path)
        .filter(|p| !p.as_os_str().is_empty())
}

fn non_empty_str(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. Empty disables file logging.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::new(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root containing the mod sources (usually the `P:` work drive).
    pub source: PathBuf,
    /// Root that receives `@ModFolder/addons/*.pbo`.
    pub output: Option<PathBuf>,
    /// Private key (`.biprivatekey`) used for signing.
    pub key: Option<PathBuf>,
    /// Dedicated server install directory.
    pub server: Option<PathBuf>,
    /// Game client install directory.
    pub client: Option<PathBuf>,
    /// Steam workshop content directory for DayZ (`.../workshop/content/221100`).
    pub workshop: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_ROOT),
            output: None,
            key: None,
            server: None,
            client: None,
            workshop: None,
        }
    }
}

impl PathsConfig {
    #[must_use]
    pub fn output_root(&self) -> Option<&Path> {
        non_empty_path(self.output.as_ref())
    }

    #[must_use]
    pub fn signing_key(&self) -> Option<&Path> {
        non_empty_path(self.key.as_ref())
    }

    /// Server directory. A path ending in `.exe` resolves to its parent.
    #[must_use]
    pub fn server_dir(&self) -> Option<&Path> {
        let server = non_empty_path(self.server.as_ref())?;
        if has_exe_extension(server) {
            server.parent()
        } else {
            Some(server)
        }
    }

    /// Configured server path as given, possibly pointing at an executable.
    #[must_use]
    pub fn server_path(&self) -> Option<&Path> {
        non_empty_path(self.server.as_ref())
    }

    #[must_use]
    pub fn client_dir(&self) -> Option<&Path> {
        non_empty_path(self.client.as_ref())
    }

    #[must_use]
    pub fn workshop_root(&self) -> Option<&Path> {
        non_empty_path(self.workshop.as_ref())
    }
}

/// Returns true when the path has an `.exe` extension (any case).
#[must_use]
pub fn has_exe_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// Output naming and workspace options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Explicit `@Folder` name for build output.
    pub mod_folder_name: Option<String>,
    /// Display name of the active workspace, e.g. `"MyMods (Workspace)"`.
    pub workspace_name: Option<String>,
    /// Multi-folder workspace file; its directory is the default scan root.
    pub workspace_file: Option<PathBuf>,
    /// Folders of the active workspace, in order.
    pub workspace_folders: Vec<PathBuf>,
}

impl BuildConfig {
    #[must_use]
    pub fn folder_name_override(&self) -> Option<&str> {
        non_empty_str(self.mod_folder_name.as_ref())
    }

    #[must_use]
    pub fn workspace_display_name(&self) -> Option<&str> {
        non_empty_str(self.workspace_name.as_ref())
    }

    #[must_use]
    pub fn workspace_file(&self) -> Option<&Path> {
        non_empty_path(self.workspace_file.as_ref())
    }
}

/// Server endpoint and launch options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Active server configuration filename inside the server directory.
    pub config_file: String,
    /// Seconds to wait between server start and client launch in auto mode.
    pub client_delay_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_SERVER_IP.to_string(),
            port: DEFAULT_SERVER_PORT,
            config_file: DEFAULT_SERVER_CONFIG.to_string(),
            client_delay_secs: DEFAULT_CLIENT_DELAY_SECS,
        }
    }
}

/// Explicit tool paths. Empty means auto-detect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Path to `pboProject.exe`.
    pub pbo_project: Option<PathBuf>,
    /// Path to `DSSignFile.exe`.
    pub ds_sign_file: Option<PathBuf>,
}

impl ToolsConfig {
    #[must_use]
    pub fn pbo_project_override(&self) -> Option<&Path> {
        non_empty_path(self.pbo_project.as_ref())
    }

    #[must_use]
    pub fn ds_sign_file_override(&self) -> Option<&Path> {
        non_empty_path(self.ds_sign_file.as_ref())
    }
}
