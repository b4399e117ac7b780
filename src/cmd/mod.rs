// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis, configs), mods (scan, status, build, link),
//!   server (server, client, auto)
//! ```

pub mod config;
pub mod mods;
pub mod server;
