// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |       mods / server / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              | TOML + env, live provider |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!               mods        build    server
//!           scan/catalog  pboProject  DayZServer
//!                 |        DSSignFile   client
//!                 +-----------+--------+
//!                             v
//!                           links
//!                    junctions / symlinks
//!
//!   +-----------------------------------------+
//!   |  core        process spawn, capture      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod build;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod links;
pub mod logging;
pub mod mods;
pub mod server;
pub mod utility;
