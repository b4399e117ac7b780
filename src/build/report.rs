// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! User-facing notifications from the build pipeline.

use tracing::{error, info, warn};

/// Receives notifications and refresh requests.
///
/// The CLI logs them; a UI could show toasts and repaint its mod list.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Asks the presentation layer to re-read mod state.
    fn refresh(&self) {}
}

/// Reporter that writes everything to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
