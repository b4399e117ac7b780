// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core process management.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!   ProcessBuilder --> run()   --> ProcessOutput
//!                  --> spawn() --> RunningProcess
//! ```

pub mod process;
