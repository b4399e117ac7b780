// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build state machine.
//!
//! ```text
//! Init --> ToolResolved --> Built --> Signed ------+
//!   |           |             +-----> SignSkipped -+--> Done
//!   |           |             +-----> SignFailed --+
//!   +-----------+--> Failed
//! ```
//!
//! `Failed` and `Done` are terminal. A failed build never reaches signing.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Init,
    ToolResolved,
    Built,
    Signed,
    SignSkipped,
    SignFailed,
    Failed,
    Done,
}

impl BuildState {
    /// Returns true if `next` may follow `self`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::ToolResolved | Self::Failed)
                | (Self::ToolResolved, Self::Built | Self::Failed)
                | (Self::Built, Self::Signed | Self::SignSkipped | Self::SignFailed)
                | (Self::Signed | Self::SignSkipped | Self::SignFailed, Self::Done)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Done)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ToolResolved => "tool-resolved",
            Self::Built => "built",
            Self::Signed => "signed",
            Self::SignSkipped => "sign-skipped",
            Self::SignFailed => "sign-failed",
            Self::Failed => "failed",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid build transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: BuildState,
    pub to: BuildState,
}

/// Tracks the current state and every state visited.
#[derive(Debug, Clone)]
pub struct BuildMachine {
    state: BuildState,
    trail: Vec<BuildState>,
}

impl Default for BuildMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: BuildState::Init,
            trail: vec![BuildState::Init],
        }
    }

    #[must_use]
    pub const fn state(&self) -> BuildState {
        self.state
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] and stays put if the move is not allowed.
    pub fn advance(&mut self, next: BuildState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.trail.push(next);
        Ok(())
    }

    #[must_use]
    pub fn trail(&self) -> &[BuildState] {
        &self.trail
    }

    #[must_use]
    pub fn into_trail(self) -> Vec<BuildState> {
        self.trail
    }
}
