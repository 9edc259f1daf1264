use std::process::ExitStatus;

use devstart_core::{ConfigError, IdentityError};
use devstart_preflight::PreflightError;
use thiserror::Error;

use crate::launcher::LaunchSide;

/// Failure surfaced by a backend or frontend launcher.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{side} launcher is not configured; add a `{side}` command to devstart.yaml")]
    NotConfigured { side: LaunchSide },

    #[error("failed to spawn {side} `{program}`: {source}")]
    Spawn {
        side: LaunchSide,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{side} I/O error: {source}")]
    Io {
        side: LaunchSide,
        #[source]
        source: std::io::Error,
    },

    #[error("{side} exited with {status} before it was ready")]
    ExitedEarly { side: LaunchSide, status: ExitStatus },

    /// Opaque failure from a launcher implementation.
    #[error("{side} failed to start: {message}")]
    Failed { side: LaunchSide, message: String },
}

/// Error surface for a development session. Every variant is fatal.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("session already ran; a sequencer starts at most once")]
    AlreadyStarted,

    #[error("runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Stable classification of a [`SessionError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    IdentityResolution,
    InvalidIdentityName,
    PortInUse(u16),
    PortProbe(u16),
    MissingManifest,
    InvalidManifest,
    MissingScript(String),
    LaunchFailure,
    Runtime,
}

impl SessionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SessionError::Config(_) => FailureKind::Configuration,
            SessionError::Identity(_) => FailureKind::IdentityResolution,
            SessionError::Preflight(err) => match err {
                PreflightError::InvalidIdentityName { .. } => FailureKind::InvalidIdentityName,
                PreflightError::PortInUse { port, .. } => FailureKind::PortInUse(*port),
                PreflightError::PortProbe { port, .. } => FailureKind::PortProbe(*port),
                PreflightError::MissingManifest { .. } => FailureKind::MissingManifest,
                PreflightError::InvalidManifest { .. } => FailureKind::InvalidManifest,
                PreflightError::MissingScript { script, .. } => {
                    FailureKind::MissingScript(script.clone())
                }
            },
            SessionError::Launch(_) => FailureKind::LaunchFailure,
            SessionError::AlreadyStarted | SessionError::Runtime(_) => FailureKind::Runtime,
        }
    }
}
