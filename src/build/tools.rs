// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Locating pboProject and DSSignFile.
//!
//! ```text
//! [tools] override --> registry (reg query, Windows) --> PATH --> common locations
//!                      first existing hit wins
//!
//! pboProject   HKCU\SOFTWARE\Mikero\pboProject              exe   (full exe path)
//! DSSignFile   HKCU\Software\bohemia interactive\Dayz Tools path  + Bin\DsUtils\DSSignFile.exe
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use futures_util::future::BoxFuture;
use regex::Regex;
use tracing::{debug, trace};

use crate::config::Config;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};

const REG_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

static REG_SZ_VALUE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\S+)\s+REG_(?:EXPAND_)?SZ\s+(.*?)\s*$"));

/// Registry value holding a tool location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryLookup {
    pub key: &'static str,
    pub value: &'static str,
    /// Appended to the registry value when it names an install directory.
    pub suffix: Option<&'static str>,
}

/// External tools used by the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    PboProject,
    DsSignFile,
}

impl Tool {
    #[must_use]
    pub const fn exe_name(self) -> &'static str {
        match self {
            Self::PboProject => "pboProject.exe",
            Self::DsSignFile => "DSSignFile.exe",
        }
    }

    /// Name used in messages and logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PboProject => "pboProject",
            Self::DsSignFile => "DSSignFile",
        }
    }

    #[must_use]
    pub fn config_override(self, config: &Config) -> Option<&Path> {
        match self {
            Self::PboProject => config.tools.pbo_project_override(),
            Self::DsSignFile => config.tools.ds_sign_file_override(),
        }
    }

    #[must_use]
    pub const fn registry(self) -> RegistryLookup {
        match self {
            Self::PboProject => RegistryLookup {
                key: r"HKCU\SOFTWARE\Mikero\pboProject",
                value: "exe",
                suffix: None,
            },
            Self::DsSignFile => RegistryLookup {
                key: r"HKCU\Software\bohemia interactive\Dayz Tools",
                value: "path",
                suffix: Some(r"Bin\DsUtils\DSSignFile.exe"),
            },
        }
    }

    #[must_use]
    pub const fn common_locations(self) -> &'static [&'static str] {
        match self {
            Self::PboProject => &[
                r"C:\Program Files\Mikero\DePboTools\bin\pboProject.exe",
                r"C:\Program Files (x86)\Mikero\DePboTools\bin\pboProject.exe",
            ],
            Self::DsSignFile => &[
                r"C:\Program Files (x86)\Steam\steamapps\common\DayZ Tools\Bin\DsUtils\DSSignFile.exe",
                r"C:\Program Files\Steam\steamapps\common\DayZ Tools\Bin\DsUtils\DSSignFile.exe",
            ],
        }
    }
}

/// Extracts a string value from `reg query` output.
///
/// ```text
/// HKEY_CURRENT_USER\SOFTWARE\Mikero\pboProject
///     exe    REG_SZ    C:\Program Files\Mikero\DePboTools\bin\pboProject.exe
/// ```
#[must_use]
pub fn parse_reg_query(output: &str, value: &str) -> Option<String> {
    let regex = REG_SZ_VALUE.as_ref().ok()?;
    regex
        .captures_iter(output)
        .find(|c| c.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case(value)))
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves tool executables.
pub trait ToolResolver: Send + Sync {
    /// Returns the tool path, or `None` if nothing in the chain has it.
    fn resolve<'a>(&'a self, tool: Tool, config: &'a Config) -> BoxFuture<'a, Option<PathBuf>>;
}

/// Resolver that checks config, registry, `PATH` and common locations.
#[derive(Debug, Clone)]
pub struct SystemTools {
    common_locations: Option<Vec<PathBuf>>,
    use_registry: bool,
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTools {
    #[must_use]
    pub fn new() -> Self {
        Self {
            common_locations: None,
            use_registry: cfg!(windows),
        }
    }

    /// Replaces the built-in common install locations.
    #[must_use]
    pub fn with_common_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.common_locations = Some(locations);
        self
    }

    fn locations(&self, tool: Tool) -> Vec<PathBuf> {
        self.common_locations.clone().unwrap_or_else(|| {
            tool.common_locations()
                .iter()
                .map(PathBuf::from)
                .collect()
        })
    }

    async fn from_registry(&self, tool: Tool) -> Option<PathBuf> {
        if !self.use_registry {
            return None;
        }
        let lookup = tool.registry();
        let output = ProcessBuilder::new("reg")
            .args(["query", lookup.key, "/v", lookup.value])
            .flag(ProcessFlags::ALLOW_FAILURE)
            .capture_output()
            .timeout(REG_QUERY_TIMEOUT)
            .run()
            .await;

        let output = match output {
            Ok(output) if output.success() => output,
            Ok(output) => {
                trace!(key = lookup.key, code = output.exit_code(), "registry value absent");
                return None;
            }
            Err(e) => {
                debug!(key = lookup.key, error = %e, "registry query failed");
                return None;
            }
        };

        let value = PathBuf::from(parse_reg_query(output.stdout(), lookup.value)?);
        Some(match lookup.suffix {
            Some(suffix) => value.join(suffix),
            None => value,
        })
    }
}

impl ToolResolver for SystemTools {
    fn resolve<'a>(&'a self, tool: Tool, config: &'a Config) -> BoxFuture<'a, Option<PathBuf>> {
        Box::pin(async move {
            if let Some(path) = tool.config_override(config) {
                if path.is_file() {
                    trace!(tool = tool.display_name(), path = %path.display(), "using configured tool");
                    return Some(path.to_path_buf());
                }
                debug!(
                    tool = tool.display_name(),
                    path = %path.display(),
                    "configured tool path not found, searching"
                );
            }

            if let Some(path) = self.from_registry(tool).await
                && path.is_file()
            {
                debug!(tool = tool.display_name(), path = %path.display(), "found tool via registry");
                return Some(path);
            }

            if let Some(path) = ProcessBuilder::find(tool.exe_name()) {
                debug!(tool = tool.display_name(), path = %path.display(), "found tool in PATH");
                return Some(path);
            }

            let found = self.locations(tool).into_iter().find(|p| p.is_file());
            match &found {
                Some(path) => debug!(tool = tool.display_name(), path = %path.display(), "found tool in common location"),
                None => debug!(tool = tool.display_name(), "tool not found"),
            }
            found
        })
    }
}
