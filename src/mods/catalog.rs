// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Everything that can be enabled on the server.
//!
//! ```text
//! Dev       mod roots from a scan          link @<id>      buildable
//! Local     @* folders in the output root  link <name>
//! Workshop  <workshop>/<id>/meta.cpp       link @<name>
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::config::types::DEFAULT_SOURCE_ROOT;
use crate::links;

use super::descriptor::{META_FILE, extract_meta_name};
use super::paths::link_name;
use super::scanner::{ModCandidate, ModStatus};

/// Kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    Dev,
    Local,
    Workshop,
}

impl ModKind {
    /// Every kind, in listing order.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Local, Self::Workshop];

    /// Only dev mods have sources; the other kinds are already packed.
    #[must_use]
    pub const fn can_build(self) -> bool {
        match self {
            Self::Dev => true,
            Self::Local | Self::Workshop => false,
        }
    }
}

impl fmt::Display for ModKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => write!(f, "dev"),
            Self::Local => write!(f, "local"),
            Self::Workshop => write!(f, "workshop"),
        }
    }
}

/// Where a mod comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModSource {
    /// Source project found by a scan.
    Dev {
        id: String,
        path: PathBuf,
        status: ModStatus,
    },
    /// Previously built `@Folder` in the output root.
    Local { name: String, path: PathBuf },
    /// Steam workshop download.
    Workshop {
        app_id: String,
        name: String,
        path: PathBuf,
    },
}

impl ModSource {
    /// Name of the link created in the server and client directories.
    #[must_use]
    pub fn link_name(&self) -> String {
        match self {
            Self::Dev { id, .. } => link_name(id),
            Self::Local { name, .. } => name.clone(),
            Self::Workshop { name, .. } => link_name(name),
        }
    }

    /// Directory the link points at.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Dev { path, .. } | Self::Local { path, .. } | Self::Workshop { path, .. } => {
                path
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ModKind {
        match self {
            Self::Dev { .. } => ModKind::Dev,
            Self::Local { .. } => ModKind::Local,
            Self::Workshop { .. } => ModKind::Workshop,
        }
    }
}

impl fmt::Display for ModSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev { id, status, .. } => write!(f, "{id} ({status})"),
            Self::Local { name, .. } => write!(f, "{name}"),
            Self::Workshop { app_id, name, .. } => write!(f, "{name} [{app_id}]"),
        }
    }
}

impl From<&ModCandidate> for ModSource {
    fn from(candidate: &ModCandidate) -> Self {
        Self::Dev {
            id: candidate.name().to_string(),
            path: candidate.source_path().to_path_buf(),
            status: candidate.status(),
        }
    }
}

async fn sorted_subdirs(root: &Path) -> Vec<(String, PathBuf)> {
    let mut dirs = Vec::new();
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %root.display(), error = %e, "catalog root not readable");
            return dirs;
        }
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        // Follows links: built folders are often junctions themselves
        if tokio::fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir()) {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort();
    dirs
}

/// Lists `@*` folders directly under `root`.
pub async fn scan_local(root: &Path) -> Vec<ModSource> {
    sorted_subdirs(root)
        .await
        .into_iter()
        .filter(|(name, _)| name.starts_with('@'))
        .map(|(name, path)| ModSource::Local { name, path })
        .collect()
}

/// Lists workshop items: subfolders of `root` that contain `meta.cpp`.
pub async fn scan_workshop(root: &Path) -> Vec<ModSource> {
    let mut mods = Vec::new();
    for (app_id, path) in sorted_subdirs(root).await {
        let meta = path.join(META_FILE);
        let text = match tokio::fs::read(&meta).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(file = %meta.display(), error = %e, "cannot read workshop metadata");
                String::new()
            }
        };
        let name = extract_meta_name(&text).unwrap_or_else(|| format!("Unknown Mod ({app_id})"));
        mods.push(ModSource::Workshop { app_id, name, path });
    }
    mods
}

/// A catalog entry with its current enabled flag.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub source: ModSource,
    pub enabled: bool,
}

/// Dev, local and workshop mods with their state against the server directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModCatalog {
    /// Collects the catalog for a configuration and a finished scan.
    pub async fn collect(config: &Config, dev: &[ModCandidate]) -> Self {
        let mut sources: Vec<ModSource> = dev.iter().map(ModSource::from).collect();

        let local_root = config
            .paths
            .output_root()
            .map_or_else(|| PathBuf::from(DEFAULT_SOURCE_ROOT), Path::to_path_buf);
        sources.extend(scan_local(&local_root).await);

        if let Some(workshop) = config.paths.workshop_root() {
            sources.extend(scan_workshop(workshop).await);
        }

        let server_dir = config.paths.server_dir();
        let mut entries = Vec::with_capacity(sources.len());
        for source in sources {
            let enabled = match server_dir {
                Some(dir) => links::is_enabled(dir, &source.link_name()).await,
                None => false,
            };
            entries.push(CatalogEntry { source, enabled });
        }
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Finds an entry by link name or display id, case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        let wanted = name.trim_start_matches('@');
        self.entries.iter().find(|e| {
            let link = e.source.link_name();
            let id = match &e.source {
                ModSource::Dev { id, .. } => id.as_str(),
                ModSource::Local { name, .. } => name.as_str(),
                ModSource::Workshop { app_id, .. } => app_id.as_str(),
            };
            link.trim_start_matches('@').eq_ignore_ascii_case(wanted)
                || id.trim_start_matches('@').eq_ignore_ascii_case(wanted)
        })
    }

    /// Entries of one kind.
    pub fn of_kind(&self, kind: ModKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.source.kind() == kind)
    }
}
