//! Development session runtime: startup state machine, launchers, keep-alive.

mod error;
pub mod launcher;
pub mod log;
mod runtime;
pub mod sequencer;
pub mod state;

pub use error::{FailureKind, LaunchError, SessionError};
pub use launcher::{
    ArappIdentitySource, BackendLauncher, CommandBackendLauncher, CommandFrontendLauncher,
    FrontendLauncher, IdentitySource, LaunchSide,
};
pub use log::SessionLog;
pub use runtime::{check, check_blocking, run, start_blocking, CheckRequest, PreflightReport, StartRequest};
pub use sequencer::{RunningSession, Sequencer, StartOptions};
pub use state::{SessionState, StepOutcome};
