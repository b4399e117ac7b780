// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("pboProject.exe")
//!   .args() .cwd() .forward_and_capture()
//!   .run()    --> ProcessOutput { exit_code, stdout, stderr }
//!   .spawn()  --> RunningProcess (server, detached client)
//!       tokio::process::Command
//!       stream stdout/stderr to tracing
//!       Windows: CTRL_BREAK on terminate
//! ```

pub mod builder;
mod io;
mod runner;
#[cfg(windows)]
mod windows;

pub use runner::RunningProcess;
