// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Running external tools.

use futures_util::future::BoxFuture;

use crate::core::process::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::Result;

/// Runs a configured process to completion.
///
/// Implementations must not fail on a non-zero exit: the exit code is in
/// the returned [`ProcessOutput`] and the caller decides what it means.
/// An `Err` means the process could not be run at all.
pub trait Launcher: Send + Sync {
    fn run<'a>(&'a self, process: ProcessBuilder) -> BoxFuture<'a, Result<ProcessOutput>>;
}

/// Launcher backed by real child processes.
///
/// Output is forwarded to the log line by line and captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn run<'a>(&'a self, process: ProcessBuilder) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(
            process
                .flag(ProcessFlags::ALLOW_FAILURE)
                .forward_and_capture()
                .run(),
        )
    }
}
