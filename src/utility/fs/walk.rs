// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use ignore::WalkBuilder;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::warn;

/// Directory names never descended into when looking at mod sources.
pub const MOD_SOURCE_SKIP_DIRS: &[&str] = &["node_modules", "out", "target"];

/// Options for directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Skip directories whose name starts with `.`
    #[builder(setters(name = with_skip_dot_dirs), default = true)]
    skip_dot_dirs: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn skip_dot_dirs(&self) -> bool {
        self.skip_dot_dirs
    }

    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options used for mod source trees.
    ///
    /// - Skips dot-directories (`.git`, `.vscode`, ...)
    /// - Skips `node_modules`, `out` and `target`
    /// - Ignores .gitignore: ignored files still end up in the PBO
    #[must_use]
    pub fn for_mod_sources() -> Self {
        Self::builder()
            .with_skip_dirs(
                MOD_SOURCE_SKIP_DIRS
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
            .build()
    }

    /// Returns true if a directory with this name must not be entered.
    #[must_use]
    pub fn is_skipped_dir(&self, name: &str) -> bool {
        (self.skip_dot_dirs && name.starts_with('.')) || self.skip_dirs.iter().any(|s| s == name)
    }
}

/// Result of [`latest_mtime`].
#[derive(Debug, Clone, Copy)]
pub struct MtimeSummary {
    latest: Option<SystemTime>,
    entries: usize,
    error_count: usize,
}

impl MtimeSummary {
    /// Newest modification time seen, including the root itself.
    #[must_use]
    pub const fn latest(&self) -> Option<SystemTime> {
        self.latest
    }

    /// Number of entries whose mtime was read.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Number of entries that could not be read or stat'ed.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

/// Builds a `WalkBuilder` with the given options, using `filter_entry` for directory skipping.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    // Hidden and ignored files still end up in the PBO; links are not followed
    builder.standard_filters(false);
    builder.follow_links(false);

    // filter_entry is evaluated BEFORE descending; the root itself is never skipped
    let options = Arc::new(options.clone());
    builder.filter_entry(move |entry| {
        if entry.depth() > 0
            && entry.file_type().is_some_and(|ft| ft.is_dir())
            && let Some(name) = entry.file_name().to_str()
            && options.is_skipped_dir(name)
        {
            return false;
        }
        true
    });

    builder
}

/// Returns the newest modification time in a tree.
///
/// Walks sequentially (the result is a single maximum, so there is nothing
/// to gain from the parallel walker on small mod trees). Entries that cannot
/// be read are logged and counted, never fatal.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
///
/// # Example
/// ```no_run
/// use dzmod::utility::fs::walk::{latest_mtime, WalkOptions};
///
/// let summary = latest_mtime("P:/MyMod", &WalkOptions::for_mod_sources())?;
/// println!("{} entries, newest {:?}", summary.entries(), summary.latest());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn latest_mtime<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<MtimeSummary> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let mut summary = MtimeSummary {
        latest: None,
        entries: 0,
        error_count: 0,
    };

    for entry_result in build_walker(root, options).build() {
        let modified = entry_result
            .map_err(|e| e.to_string())
            .and_then(|entry| {
                entry
                    .metadata()
                    .map_err(|e| format!("{}: {e}", entry.path().display()))?
                    .modified()
                    .map_err(|e| format!("{}: {e}", entry.path().display()))
            });

        match modified {
            Ok(time) => {
                summary.entries += 1;
                if summary.latest.is_none_or(|latest| time > latest) {
                    summary.latest = Some(time);
                }
            }
            Err(e) => {
                warn!(error = %e, "walk error");
                summary.error_count += 1;
            }
        }
    }

    Ok(summary)
}
