// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output path policy.
//!
//! ```text
//! output root set:
//!   <output>/@<override | workspace name - "(...)" | DayZMod>/addons/<id>.pbo
//! output root unset:
//!   <drive root of source>/@<override | source folder name>/addons/<id>.pbo
//!
//! every folder component and the id: <>:"/\|?* --> _
//! ```
//!
//! The layout mirrors where pboProject puts its output for the same flags.
//! If the tool ever places artifacts elsewhere, staleness verdicts drift
//! (every mod reads as Pending) but nothing breaks.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::config::types::BuildConfig;

/// Folder label used when neither an override nor a workspace name exists.
pub const FALLBACK_FOLDER_NAME: &str = "DayZMod";

/// Name of the directory holding the PBOs inside a mod folder.
pub const ADDONS_DIR: &str = "addons";

const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every character Windows forbids in file names with `_`.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `"Foo (Workspace)"` → `"Foo"`. Names without a trailing `(...)` are returned trimmed.
#[must_use]
pub fn strip_parenthetical(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.ends_with(')')
        && let Some(open) = trimmed.rfind('(')
    {
        let head = trimmed[..open].trim_end();
        if !head.is_empty() {
            return head;
        }
    }
    trimmed
}

/// Link and folder name for a mod id: `@` + sanitized id.
#[must_use]
pub fn link_name(mod_id: &str) -> String {
    at_prefixed(mod_id)
}

fn at_prefixed(name: &str) -> String {
    format!("@{}", sanitize(name.trim_start_matches('@')))
}

/// Returns the drive (or filesystem) root of a path.
///
/// `P:\Mods\X` → `P:\`, `/home/me/x` → `/`. Drive-letter paths are recognised
/// on every platform so configs written on Windows behave the same in tests.
/// A relative path without a drive yields an empty path.
#[must_use]
pub fn drive_root(path: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => root.push(component.as_os_str()),
            _ => break,
        }
    }
    if !root.as_os_str().is_empty() {
        return root;
    }

    drive_letter(path).map_or(root, |drive| PathBuf::from(format!("{drive}/")))
}

/// `"P:"` for a path starting with a drive letter, on any platform.
fn drive_letter(path: &Path) -> Option<String> {
    let text = path.to_string_lossy();
    let bytes = text.as_bytes();
    (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
        .then(|| text[..2].to_string())
}

/// Absolute form of `path` with `.` and `..` folded away.
///
/// Links are not resolved, so a `subst`-ed `P:` stays `P:`. Drive-letter
/// paths are taken as already absolute.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    let absolute = if drive_letter(path).is_some() {
        path.to_path_buf()
    } else {
        std::path::absolute(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "cannot make path absolute");
            path.to_path_buf()
        })
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Active workspace description, used for naming and scan-root defaults.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    name: Option<String>,
    file: Option<PathBuf>,
    folders: Vec<PathBuf>,
}

impl Workspace {
    #[must_use]
    pub fn new(name: Option<String>, file: Option<PathBuf>, folders: Vec<PathBuf>) -> Self {
        Self {
            name,
            file,
            folders,
        }
    }

    #[must_use]
    pub fn from_config(build: &BuildConfig) -> Self {
        Self::new(
            build.workspace_display_name().map(String::from),
            build.workspace_file().map(Path::to_path_buf),
            build.workspace_folders.clone(),
        )
    }

    /// Display name: configured name, else `"<file stem> (Workspace)"`, else
    /// the first folder's name.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name.to_string());
        }
        if let Some(stem) = self.file.as_deref().and_then(Path::file_stem) {
            return Some(format!("{} (Workspace)", stem.to_string_lossy()));
        }
        self.folders
            .first()
            .and_then(|f| f.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Default scan root: directory of the workspace file, else the first folder.
    #[must_use]
    pub fn scan_root(&self) -> Option<PathBuf> {
        if let Some(dir) = self.file.as_deref().and_then(Path::parent) {
            return Some(dir.to_path_buf());
        }
        self.folders.first().cloned()
    }
}

/// Resolves the directory to scan when the caller gave none.
#[must_use]
pub fn resolve_scan_root(explicit: Option<&Path>, workspace: &Workspace, config: &Config) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| workspace.scan_root())
        .unwrap_or_else(|| config.paths.source.clone())
}

/// Where a build lands on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    folder_name: String,
    folder_dir: PathBuf,
    artifact: PathBuf,
    explicit_root: bool,
}

impl OutputLayout {
    /// `@Folder` name.
    #[must_use]
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// `<root>/@Folder`.
    #[must_use]
    pub fn folder_dir(&self) -> &Path {
        &self.folder_dir
    }

    /// `<root>/@Folder/addons/<id>.pbo`.
    #[must_use]
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// True when the output root came from configuration (and `-M=` is passed).
    #[must_use]
    pub const fn explicit_root(&self) -> bool {
        self.explicit_root
    }
}

/// Mod folder name (with `@`) for a given configuration.
#[must_use]
pub fn mod_folder_name(config: &Config, source_path: &Path, workspace: &Workspace) -> String {
    if let Some(name) = config.build.folder_name_override() {
        return at_prefixed(name);
    }
    if config.paths.output_root().is_some() {
        let name = workspace
            .display_name()
            .map(|n| strip_parenthetical(&n).to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_FOLDER_NAME.to_string());
        return at_prefixed(&name);
    }
    let base = source_path
        .file_name()
        .map_or_else(|| FALLBACK_FOLDER_NAME.to_string(), |n| n.to_string_lossy().into_owned());
    at_prefixed(&base)
}

/// Full output layout for a mod.
#[must_use]
pub fn resolve_output_layout(
    config: &Config,
    source_path: &Path,
    mod_id: &str,
    workspace: &Workspace,
) -> OutputLayout {
    let folder_name = mod_folder_name(config, source_path, workspace);
    let (root, explicit_root) = config
        .paths
        .output_root()
        .map_or_else(|| (drive_root(source_path), false), |root| (root.to_path_buf(), true));

    let folder_dir = root.join(&folder_name);
    let artifact = folder_dir
        .join(ADDONS_DIR)
        .join(format!("{}.pbo", sanitize(mod_id)));

    OutputLayout {
        folder_name,
        folder_dir,
        artifact,
        explicit_root,
    }
}

/// Expected `.pbo` location for a mod.
#[must_use]
pub fn resolve_output_path(
    config: &Config,
    source_path: &Path,
    mod_id: &str,
    workspace: &Workspace,
) -> PathBuf {
    resolve_output_layout(config, source_path, mod_id, workspace)
        .artifact
}

/// Returns true if `path` lies under `root`, compared case-insensitively
/// with `/` and `\` treated alike.
#[must_use]
pub fn is_under_root(path: &Path, root: &Path) -> bool {
    let normalize = |p: &Path| {
        p.to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .to_lowercase()
    };
    let path = normalize(path);
    let root = normalize(root);
    root.is_empty() || path == root || path.starts_with(&format!("{root}/"))
}
