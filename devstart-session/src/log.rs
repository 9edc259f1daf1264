//! Advisory session output.
//!
//! Everything the session prints while starting goes through a [`SessionLog`].
//! The silence flag is fixed when the session starts and is carried by value,
//! so silencing one session never touches global output state.

use std::fmt::Display;

use crate::launcher::LaunchSide;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionLog {
    silent: bool,
}

impl SessionLog {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Orchestrator progress line.
    pub fn main(&self, message: impl Display) {
        if !self.silent {
            tracing::info!(source = "main", "{message}");
        }
    }

    /// One line of output from a launched child.
    pub fn child(&self, side: LaunchSide, line: &str) {
        if !self.silent && !line.trim().is_empty() {
            tracing::info!(source = %side, "{line}");
        }
    }

    pub fn warn(&self, message: impl Display) {
        if !self.silent {
            tracing::warn!(source = "main", "{message}");
        }
    }

    /// Sequencing detail, shown with `RUST_LOG=debug`.
    pub fn debug(&self, message: impl Display) {
        if !self.silent {
            tracing::debug!(source = "main", "{message}");
        }
    }
}
