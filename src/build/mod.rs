// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! PBO build pipeline.
//!
//! ```text
//! BuildOrchestrator
//!   tools     ToolResolver   (pboProject, DSSignFile lookup)
//!   launcher  Launcher       (runs them, output captured)
//!   reporter  Reporter       (notifications, refresh)
//!   state     BuildMachine   (validated transitions)
//! ```
//!
//! The three seams are traits so batches can be exercised without DayZ Tools
//! installed.

pub mod launcher;
pub mod orchestrator;
pub mod report;
pub mod state;
pub mod tools;

#[cfg(test)]
mod tests;

pub use orchestrator::{BuildOrchestrator, BuildResult};
pub use state::BuildState;
