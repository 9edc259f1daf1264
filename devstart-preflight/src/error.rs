//! Error types for devstart-preflight.

use std::path::PathBuf;

use devstart_core::EnsName;
use thiserror::Error;

use crate::ports::PortRole;

/// Result of a single checker: `Ok(())` is a pass.
pub type ValidationOutcome = Result<(), PreflightError>;

/// Why a preflight check did not pass.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error(
        "Invalid ENS name \"{name}\" found in arapp.json (environments.default.appName). \
         Only ENS names in the form \"<name>.aragonpm.eth\" are supported in development. \
         Please change the value in environments.default.appName, in your project's arapp.json file. \
         Note: Non-development environments are ignored in development and don't have this restriction."
    )]
    InvalidIdentityName { name: EnsName },

    #[error("Cannot {}. Port {port} is in use.", .role.action())]
    PortInUse { port: u16, role: PortRole },

    /// The probe itself failed, so the port state is unknown.
    #[error("cannot probe port {port}: {source}")]
    PortProbe {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read app manifest at {path}: {source}")]
    MissingManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid app manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Missing script \"{script}\" in {}.", .manifest.display())]
    MissingScript { script: String, manifest: PathBuf },
}
