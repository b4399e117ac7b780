// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod descriptor parsing.
//!
//! ```text
//! config.cpp
//!   class CfgPatches
//!   {
//!       class MyMod_Scripts   <-- first class inside CfgPatches = mod id
//!       { ... };
//!   };
//!
//! meta.cpp (workshop)
//!   name = "Community Framework";
//! ```
//!
//! No match is never an error; callers fall back to the folder name.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Descriptor file names that mark a mod root (matched case-insensitively).
pub const DESCRIPTOR_FILES: [&str; 2] = ["config.cpp", "config.bin"];

/// Text descriptor that can be parsed for an id.
pub const TEXT_DESCRIPTOR: &str = "config.cpp";

/// Workshop metadata file.
pub const META_FILE: &str = "meta.cpp";

static CFG_PATCHES: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"class\s+CfgPatches\s*\{[\s\S]*?class\s+([A-Za-z0-9_]+)"));

static META_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"name\s*=\s*"([^"]+)""#));

fn first_capture(regex: &LazyLock<Result<Regex, regex::Error>>, text: &str) -> Option<String> {
    let regex = regex.as_ref().ok()?;
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts the first class declared inside `CfgPatches`.
#[must_use]
pub fn extract_id(text: &str) -> Option<String> {
    first_capture(&CFG_PATCHES, text)
}

/// Extracts `name = "..."` from a workshop `meta.cpp`.
#[must_use]
pub fn extract_meta_name(text: &str) -> Option<String> {
    first_capture(&META_NAME, text)
}

/// Returns true if the file name is a mod descriptor.
#[must_use]
pub fn is_descriptor_name(name: &str) -> bool {
    DESCRIPTOR_FILES
        .iter()
        .any(|d| d.eq_ignore_ascii_case(name))
}

/// Reads the descriptor id of a mod root, if any.
///
/// Looks for `config.cpp` in any letter case. `config.bin` is binary and
/// never parsed. Read failures are logged and treated as "no id".
pub async fn read_descriptor_id(mod_dir: &Path) -> Option<String> {
    let mut entries = match tokio::fs::read_dir(mod_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %mod_dir.display(), error = %e, "cannot list mod root");
            return None;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if !name.to_string_lossy().eq_ignore_ascii_case(TEXT_DESCRIPTOR) {
            continue;
        }
        return match tokio::fs::read(entry.path()).await {
            Ok(bytes) => extract_id(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                debug!(file = %entry.path().display(), error = %e, "cannot read descriptor");
                None
            }
        };
    }
    None
}

/// Id for a mod root: descriptor id, else the folder name.
pub async fn resolve_mod_id(mod_dir: &Path) -> String {
    if let Some(id) = read_descriptor_id(mod_dir).await {
        return id;
    }
    mod_dir
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}
