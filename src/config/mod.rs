// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for dzmod.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. dzmod.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. DZMOD_* env vars
//! 5. --set section/key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! DZMOD_PATHS__SERVER=D:/DayZServer   → paths.server
//! DZMOD_SERVER__PORT=2402             → server.port
//! DZMOD_BUILD__MOD_FOLDER_NAME=MyPack → build.mod_folder_name
//! ```
//!
//! The core never holds a `Config` across operations: it asks a
//! [`provider::ConfigProvider`] for a fresh snapshot each time.

pub mod loader;
pub mod provider;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BuildConfig, GlobalConfig, PathsConfig, ServerConfig, ToolsConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DZMOD";

/// Config file picked up from the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "dzmod.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub paths: PathsConfig,
    pub build: BuildConfig,
    pub server: ServerConfig,
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dzmod::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("dzmod.toml")
    ///     .with_env_prefix("DZMOD")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty server IP, a zero
    /// port or a server config filename containing path separators.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.server.ip.trim().is_empty() {
            return Err(invalid("server", "ip", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(invalid("server", "port", "must be between 1 and 65535"));
        }
        if self.server.config_file.contains(['/', '\\']) {
            return Err(invalid(
                "server",
                "config_file",
                "must be a file name inside the server directory",
            ));
        }
        Ok(())
    }

    /// Returns a warning when the source root is not on the `P:` work drive.
    ///
    /// pboProject resolves includes relative to `P:`, so sources elsewhere
    /// usually fail to build. This is never an error.
    #[must_use]
    pub fn source_root_mismatch(&self) -> Option<String> {
        let source = self.paths.source.to_string_lossy();
        let on_work_drive = source
            .get(..2)
            .is_some_and(|drive| drive.eq_ignore_ascii_case("p:"));
        (!on_work_drive).then(|| {
            format!("source root '{source}' is not on the P: drive; pboProject may not find includes")
        })
    }

    /// Format configuration options for display.
    ///
    /// The signing key path is hidden. Output is deterministically ordered.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_build_options(&mut options);
        self.format_server_options(&mut options);
        self.format_tools_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: Option<&Path>| p.map_or_else(String::new, |p| p.display().to_string());

        options.insert("paths.source".into(), self.paths.source.display().to_string());
        options.insert("paths.output".into(), fmt(self.paths.output_root()));
        if self.paths.signing_key().is_some() {
            options.insert("paths.key".into(), "[hidden]".into());
        } else {
            options.insert("paths.key".into(), String::new());
        }
        options.insert("paths.server".into(), fmt(self.paths.server_path()));
        options.insert("paths.client".into(), fmt(self.paths.client_dir()));
        options.insert("paths.workshop".into(), fmt(self.paths.workshop_root()));
    }

    fn format_build_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "build.mod_folder_name".into(),
            self.build.folder_name_override().unwrap_or_default().to_string(),
        );
        options.insert(
            "build.workspace_name".into(),
            self.build.workspace_display_name().unwrap_or_default().to_string(),
        );
        options.insert(
            "build.workspace_file".into(),
            self.build
                .workspace_file()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        if !self.build.workspace_folders.is_empty() {
            let folders: Vec<String> = self
                .build
                .workspace_folders
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            options.insert("build.workspace_folders".into(), folders.join(";"));
        }
    }

    fn format_server_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("server.ip".into(), self.server.ip.clone());
        options.insert("server.port".into(), self.server.port.to_string());
        options.insert("server.config_file".into(), self.server.config_file.clone());
        options.insert(
            "server.client_delay_secs".into(),
            self.server.client_delay_secs.to_string(),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: Option<&Path>| p.map_or_else(|| "auto".to_string(), |p| p.display().to_string());
        options.insert(
            "tools.pbo_project".into(),
            fmt(self.tools.pbo_project_override()),
        );
        options.insert(
            "tools.ds_sign_file".into(),
            fmt(self.tools.ds_sign_file_override()),
        );
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
