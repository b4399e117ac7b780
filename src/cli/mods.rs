// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod command arguments.
//!
//! ```text
//! scan   [ROOT] [--json]
//! status [ROOT] [--json]
//! build  [PATH|NAME...] [--all] [--root DIR] no PATH: pending mods only
//! link   NAME [--disable] [--root DIR]
//! ```

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `scan` and `status` commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Directory to scan. Defaults to the workspace, then paths.source.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Prints JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Mod directories or dev mod names to build. Without any, builds pending
    /// and modified mods.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Builds every mod found by the scan, even if up to date.
    #[arg(short = 'a', long, conflicts_with = "paths")]
    pub all: bool,

    /// Directory to scan for pending mods and for names given as PATH.
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Arguments for the `link` command.
#[derive(Debug, Clone, Default, Args)]
pub struct LinkArgs {
    /// Mod to toggle: dev id, @folder name or workshop id.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Removes the link instead of creating it.
    #[arg(short = 'd', long)]
    pub disable: bool,

    /// Directory to scan for dev mods.
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}
