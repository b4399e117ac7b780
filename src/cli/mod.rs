// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for dzmod using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! dzmod [global options] <command>
//! version | options | inis
//! scan [ROOT] | status [ROOT]
//! build [PATH...] [--all]
//! link NAME [--disable]
//! server | client [--kill] | auto [--delay N] | configs
//! ```

pub mod global;
pub mod mods;
pub mod server;


use crate::cli::global::GlobalOptions;
use crate::cli::mods::{BuildArgs, LinkArgs, ScanArgs};
use crate::cli::server::{AutoArgs, ClientArgs};
use clap::{Parser, Subcommand};

/// DayZ Mod Workflow Helper
///
/// Finds mod projects, rebuilds the stale ones and runs a local server.
#[derive(Debug, Parser)]
#[command(
    name = "dzmod",
    author,
    version,
    about = "DayZ Mod Workflow Helper",
    long_about = "dzmod Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Finds DayZ mod projects (folders with config.cpp), tells which\n\
                  ones changed since their last PBO build, builds them with\n\
                  pboProject, signs them with DSSignFile and links them into a\n\
                  local server. `dzmod status` shows everything at once.",
    after_help = "CONFIGURATION:\n\n\
                  dzmod reads `dzmod.toml` from the current directory unless\n\
                  --no-default-inis is given, then every --ini file in order, then\n\
                  DZMOD_* environment variables (DZMOD_SERVER__PORT=2402), then\n\
                  --set overrides. `dzmod options` prints the result."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Lists mod projects and whether they need a build.
    Scan(ScanArgs),

    /// Shows dev, local and workshop mods with their enabled state.
    Status(ScanArgs),

    /// Builds mods with pboProject and signs them.
    Build(BuildArgs),

    /// Enables or disables a mod in the server (and client) directory.
    Link(LinkArgs),

    /// Runs the dedicated server until it exits or Ctrl+C.
    Server,

    /// Launches the client connected to the local server.
    Client(ClientArgs),

    /// Starts the server, then the client after a delay.
    Auto(AutoArgs),

    /// Lists server configuration files.
    Configs,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
