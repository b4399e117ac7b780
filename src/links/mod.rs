// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Enabling mods inside server and client directories.
//!
//! ```text
//! set_enabled(dirs, mod_dir, "@Name", enable)
//!   for each dir (independent):
//!     enable:  present? --> AlreadyPresent
//!              junction (Windows) / symlink (Unix) --> Created
//!     disable: absent?  --> AlreadyAbsent
//!              remove_file -> remove_dir -> remove_dir_all --> Removed
//!     error   --> Failed { kind, message }
//!
//! is_enabled(dir, "@Name") = symlink_metadata(dir/@Name).is_ok()
//! ```
//!
//! "Enabled" is never stored; it is whatever the filesystem says right now.
//! A dangling link still counts as present. Between the presence check and
//! the create/remove another process could change the entry; the directories
//! are assumed to be owned by the current user's session.


use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, LinkError};

/// Result of toggling one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LinkOutcome {
    Created,
    AlreadyPresent,
    Removed,
    AlreadyAbsent,
    Failed {
        #[serde(skip)]
        kind: ErrorKind,
        message: String,
    },
}

impl LinkOutcome {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn failed(err: &LinkError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "linked"),
            Self::AlreadyPresent => write!(f, "already linked"),
            Self::Removed => write!(f, "unlinked"),
            Self::AlreadyAbsent => write!(f, "not linked"),
            Self::Failed { message, .. } => write!(f, "failed: {message}"),
        }
    }
}

/// Outcome for one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub dir: PathBuf,
    pub link: PathBuf,
    #[serde(flatten)]
    pub outcome: LinkOutcome,
}

/// Returns true if an entry named `link_name` exists in `target_dir`.
pub async fn is_enabled(target_dir: &Path, link_name: &str) -> bool {
    tokio::fs::symlink_metadata(target_dir.join(link_name))
        .await
        .is_ok()
}

/// Enables or disables a mod in every target directory.
///
/// Each directory is handled independently; a failure in one does not stop
/// the others.
pub async fn set_enabled(
    target_dirs: &[PathBuf],
    mod_source_path: &Path,
    link_name: &str,
    enable: bool,
) -> Vec<LinkReport> {
    let mut reports = Vec::with_capacity(target_dirs.len());
    for dir in target_dirs {
        let link = dir.join(link_name);
        let outcome = if enable {
            enable_in(dir, &link, mod_source_path).await
        } else {
            disable_in(&link).await
        };
        match &outcome {
            LinkOutcome::Failed { message, .. } => {
                warn!(link = %link.display(), error = %message, "link toggle failed");
            }
            other => info!(link = %link.display(), "{other}"),
        }
        reports.push(LinkReport {
            dir: dir.clone(),
            link,
            outcome,
        });
    }
    reports
}

async fn enable_in(dir: &Path, link: &Path, mod_source_path: &Path) -> LinkOutcome {
    if !tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
        return LinkOutcome::failed(&LinkError::MissingDirectory(dir.display().to_string()));
    }
    if tokio::fs::symlink_metadata(link).await.is_ok() {
        return LinkOutcome::AlreadyPresent;
    }

    let target = mod_source_path.to_path_buf();
    let link_path = link.to_path_buf();
    let created = tokio::task::spawn_blocking(move || {
        let target = dunce::canonicalize(&target)?;
        create_link(&target, &link_path).map(|()| target)
    })
    .await
    .unwrap_or_else(|join| Err(std::io::Error::other(join)));

    match created {
        Ok(target) => {
            debug!(link = %link.display(), target = %target.display(), "created link");
            LinkOutcome::Created
        }
        Err(source) => LinkOutcome::failed(&LinkError::Create {
            link: link.display().to_string(),
            target: mod_source_path.display().to_string(),
            source,
        }),
    }
}

async fn disable_in(link: &Path) -> LinkOutcome {
    if tokio::fs::symlink_metadata(link).await.is_err() {
        return LinkOutcome::AlreadyAbsent;
    }
    match remove_entry(link).await {
        Ok(()) => LinkOutcome::Removed,
        Err(source) => LinkOutcome::failed(&LinkError::Remove {
            link: link.display().to_string(),
            source,
        }),
    }
}

/// Removes a link: plain unlink, then directory removal (junctions), then a
/// recursive forced removal as the last resort.
async fn remove_entry(link: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(link).await {
        Ok(()) => return Ok(()),
        Err(e) => debug!(link = %link.display(), error = %e, "remove_file failed, trying remove_dir"),
    }
    match tokio::fs::remove_dir(link).await {
        Ok(()) => return Ok(()),
        Err(e) => debug!(link = %link.display(), error = %e, "remove_dir failed, forcing removal"),
    }
    tokio::fs::remove_dir_all(link).await
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    junction::create(target, link)
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}
