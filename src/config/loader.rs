// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("dzmod.toml")
//!   .add_toml_file(--ini)
//!   .with_env_prefix("DZMOD")
//!   .with_overrides(--set)
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::path::PathBuf;

use anyhow::Context;

use super::Config;
use crate::error::{ConfigError, Result};

/// Builder for loading configuration from multiple sources.
///
/// Cloneable so a [`super::provider::ReloadingConfig`] can rebuild the same
/// source stack on every read.
#[derive(Clone)]
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `PREFIX_SECTION__KEY` environment variables.
    ///
    /// Sections and keys are separated by a double underscore so keys that
    /// contain underscores (`mod_folder_name`) stay intact.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Applies `section/key=value` (or `section.key=value`) overrides in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for an entry without `=` or without a
    /// section.
    pub fn with_overrides(mut self, overrides: &[String]) -> Result<Self> {
        for entry in overrides {
            let (key, value) = parse_override(entry)?;
            self = self.set(&key, value)?;
        }
        Ok(self)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - A value fails validation.
    pub fn build(&self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.clone().add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder.clone(),
        };
        let cfg = builder.build().context("failed to read configuration sources")?;
        let config: Config = cfg
            .try_deserialize()
            .context("configuration does not match the expected layout")?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `paths/server=D:/Server` into `("paths.server", "D:/Server")`.
pub(crate) fn parse_override(entry: &str) -> std::result::Result<(String, String), ConfigError> {
    let parse_error = |message: &str| ConfigError::ParseError {
        path: "--set".to_string(),
        message: format!("{message}: '{entry}'"),
    };

    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| parse_error("expected section/key=value"))?;
    let key = key.trim().replace('/', ".");
    if key.is_empty() || !key.contains('.') || key.starts_with('.') || key.ends_with('.') {
        return Err(parse_error("option needs a section and a key"));
    }
    Ok((key, value.trim().to_string()))
}
