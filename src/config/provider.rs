// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration snapshots for long-lived components.
//!
//! ```text
//! ConfigProvider::snapshot() -> Arc<Config>
//!    |                    |
//!    v                    v
//! StaticConfig       ReloadingConfig
//! (fixed)            (rebuild on each call,
//!                     last good on error)
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use super::Config;
use super::loader::ConfigLoader;

/// Source of immutable configuration snapshots.
///
/// Callers take one snapshot per operation and must tolerate values changing
/// between operations.
pub trait ConfigProvider: Send + Sync {
    /// Returns the current configuration.
    fn snapshot(&self) -> Arc<Config>;
}

/// Provider that always returns the same configuration.
#[derive(Debug, Clone)]
pub struct StaticConfig(Arc<Config>);

impl StaticConfig {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self(Arc::new(config))
    }
}

impl ConfigProvider for StaticConfig {
    fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&self.0)
    }
}

/// Provider that re-reads every source on each call.
///
/// Editing `dzmod.toml` while the server runs takes effect at the next
/// operation. A broken edit is logged and the previous snapshot is kept.
pub struct ReloadingConfig {
    loader: ConfigLoader,
    last_good: Mutex<Arc<Config>>,
}

impl ReloadingConfig {
    /// Creates a provider seeded with an already loaded configuration.
    #[must_use]
    pub fn new(loader: ConfigLoader, initial: Config) -> Self {
        Self {
            loader,
            last_good: Mutex::new(Arc::new(initial)),
        }
    }
}

impl ConfigProvider for ReloadingConfig {
    fn snapshot(&self) -> Arc<Config> {
        let mut last_good = self
            .last_good
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match self.loader.build() {
            Ok(config) => {
                *last_good = Arc::new(config);
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config reload failed, keeping previous values");
            }
        }
        Arc::clone(&last_good)
    }
}
