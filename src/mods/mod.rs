// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod discovery.
//!
//! ```text
//! scanner ---> descriptor (id from config.cpp)
//!    |
//!    +-------> paths (expected output .pbo)
//!    |
//!    v
//! ModCandidate --> catalog (+ local builds, workshop) --> ModSource
//! ```

pub mod catalog;
pub mod descriptor;
pub mod paths;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogEntry, ModCatalog, ModKind, ModSource};
pub use scanner::{ModCandidate, ModScanner, ModStatus};
