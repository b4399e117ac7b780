// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem traversal.
//!
//! ```text
//! walk:  latest_mtime()   ignore::Walk (sequential), max mtime
//!        WalkOptions      skip dot-dirs, skip_dirs, gitignore
//! ```

pub mod walk;

#[cfg(test)]
mod tests;
