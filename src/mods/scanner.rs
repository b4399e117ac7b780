// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod discovery and staleness.
//!
//! ```text
//! scan(root)
//!   dir has config.cpp / config.bin? --> mod root: emit candidate, stop
//!   else: for child in sorted(children):
//!           skip ".*", node_modules, out, target
//!           scan(child)
//!
//! status:
//!   output missing                    --> Pending
//!   newest source mtime > output mtime --> Modified
//!   otherwise                          --> Ok
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use futures_util::future::BoxFuture;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::Config;
use crate::config::provider::ConfigProvider;
use crate::utility::fs::walk::{WalkOptions, latest_mtime};

use super::descriptor::{is_descriptor_name, read_descriptor_id};
use super::paths::{Workspace, absolutize, resolve_output_path};

/// Staleness verdict of a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModStatus {
    /// No output artifact exists.
    Pending,
    /// Sources changed after the artifact was written.
    Modified,
    /// Artifact is up to date.
    Ok,
}

impl ModStatus {
    /// Classifies a mod from its newest source mtime and the artifact mtime.
    #[must_use]
    pub fn classify(latest_source: SystemTime, output: Option<SystemTime>) -> Self {
        match output {
            None => Self::Pending,
            Some(output) if latest_source > output => Self::Modified,
            Some(_) => Self::Ok,
        }
    }

    #[must_use]
    pub const fn needs_build(self) -> bool {
        matches!(self, Self::Pending | Self::Modified)
    }
}

impl fmt::Display for ModStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Modified => write!(f, "modified"),
            Self::Ok => write!(f, "ok"),
        }
    }
}

/// A mod root found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModCandidate {
    name: String,
    source_path: PathBuf,
    has_descriptor: bool,
    status: ModStatus,
    #[serde(serialize_with = "serialize_unix_secs")]
    latest_source_mtime: SystemTime,
    expected_output_path: PathBuf,
    #[serde(serialize_with = "serialize_opt_unix_secs")]
    output_mtime: Option<SystemTime>,
}

impl ModCandidate {
    /// Mod id: descriptor id, else the folder name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub const fn has_descriptor(&self) -> bool {
        self.has_descriptor
    }

    #[must_use]
    pub const fn status(&self) -> ModStatus {
        self.status
    }

    #[must_use]
    pub const fn needs_build(&self) -> bool {
        self.status.needs_build()
    }

    #[must_use]
    pub const fn latest_source_mtime(&self) -> SystemTime {
        self.latest_source_mtime
    }

    #[must_use]
    pub fn expected_output_path(&self) -> &Path {
        &self.expected_output_path
    }

    #[must_use]
    pub const fn output_mtime(&self) -> Option<SystemTime> {
        self.output_mtime
    }
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn serialize_unix_secs<S: Serializer>(time: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(unix_secs(*time))
}

fn serialize_opt_unix_secs<S: Serializer>(
    time: &Option<SystemTime>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => s.serialize_some(&unix_secs(*time)),
        None => s.serialize_none(),
    }
}

/// Listing of one directory, split into what the scanner cares about.
struct DirListing {
    is_mod_root: bool,
    children: Vec<PathBuf>,
}

/// Walks a tree for mod roots and computes their staleness.
///
/// Holds no configuration of its own: every call takes a fresh snapshot
/// from the provider.
pub struct ModScanner {
    config: Arc<dyn ConfigProvider>,
    workspace: Workspace,
    walk_options: WalkOptions,
}

impl ModScanner {
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>, workspace: Workspace) -> Self {
        Self {
            config,
            workspace,
            walk_options: WalkOptions::for_mod_sources(),
        }
    }

    /// Scanner whose workspace comes from the `[build]` section.
    #[must_use]
    pub fn from_provider(config: Arc<dyn ConfigProvider>) -> Self {
        let workspace = Workspace::from_config(&config.snapshot().build);
        Self::new(config, workspace)
    }

    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Returns every mod root under `root`, depth-first in name order.
    ///
    /// A relative `root` is taken against the working directory. Unreadable
    /// directories are logged and treated as empty.
    pub async fn scan(&self, root: &Path) -> Vec<ModCandidate> {
        let config = self.config.snapshot();
        let root = absolutize(root);
        let mut found = Vec::new();
        self.scan_dir(root.clone(), &config, &mut found).await;
        debug!(root = %root.display(), count = found.len(), "scan finished");
        found
    }

    fn scan_dir<'a>(
        &'a self,
        dir: PathBuf,
        config: &'a Config,
        found: &'a mut Vec<ModCandidate>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let listing = self.list_dir(&dir).await;
            if listing.is_mod_root {
                found.push(self.candidate(&dir, config, true).await);
                return;
            }
            for child in listing.children {
                self.scan_dir(child, config, found).await;
            }
        })
    }

    async fn list_dir(&self, dir: &Path) -> DirListing {
        let mut listing = DirListing {
            is_mod_root: false,
            children: Vec::new(),
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read directory, skipping");
                return listing;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "directory listing interrupted");
                    break;
                }
            };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            // Descriptors may be links; directories are never followed
            if is_descriptor_name(&name)
                && tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file())
            {
                listing.is_mod_root = true;
                continue;
            }
            let Ok(file_type) = entry.file_type().await else {
                debug!(path = %path.display(), "cannot stat entry");
                continue;
            };
            if file_type.is_dir() && !self.walk_options.is_skipped_dir(&name) {
                listing.children.push(path);
            }
        }

        listing.children.sort();
        listing
    }

    async fn candidate(&self, dir: &Path, config: &Config, has_descriptor: bool) -> ModCandidate {
        let name = match read_descriptor_id(dir).await {
            Some(id) => id,
            None => dir
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned()),
        };

        let latest_source_mtime = self.latest_source_mtime(dir).await;
        let expected_output_path = resolve_output_path(config, dir, &name, &self.workspace);

        // An artifact whose mtime cannot be read is treated as ancient.
        let output_mtime = tokio::fs::metadata(&expected_output_path)
            .await
            .ok()
            .map(|m| m.modified().unwrap_or(SystemTime::UNIX_EPOCH));

        let status = ModStatus::classify(latest_source_mtime, output_mtime);
        debug!(mod_name = %name, %status, output = %expected_output_path.display(), "classified mod");

        ModCandidate {
            name,
            source_path: dir.to_path_buf(),
            has_descriptor,
            status,
            latest_source_mtime,
            expected_output_path,
            output_mtime,
        }
    }

    async fn latest_source_mtime(&self, dir: &Path) -> SystemTime {
        let root = dir.to_path_buf();
        let options = self.walk_options.clone();
        let summary = tokio::task::spawn_blocking(move || latest_mtime(&root, &options)).await;

        match summary {
            Ok(Ok(summary)) => summary.latest().unwrap_or(SystemTime::UNIX_EPOCH),
            Ok(Err(e)) => {
                warn!(dir = %dir.display(), error = %e, "cannot read source mtimes");
                SystemTime::UNIX_EPOCH
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "mtime walk task failed");
                SystemTime::UNIX_EPOCH
            }
        }
    }
}
