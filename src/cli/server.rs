// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Server and client command arguments.

use clap::Args;

/// Arguments for the `client` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ClientArgs {
    /// Kills the running client instead of launching it.
    #[arg(short = 'k', long)]
    pub kill: bool,
}

/// Arguments for the `auto` command.
#[derive(Debug, Clone, Default, Args)]
pub struct AutoArgs {
    /// Seconds between server start and client launch (default: server.client_delay_secs).
    #[arg(long, value_name = "SECS")]
    pub delay: Option<u64>,
}
