//! Startup sequencer.
//!
//! Drives the [`SessionState`] machine one step at a time. Every step is a
//! single awaited call or pure check, and no two steps are ever in flight
//! together: the frontend needs the backend's handle, and nothing may launch
//! before every check has passed.

use devstart_core::{identity, BackendHandle, DevConfig, ProjectIdentity};
use devstart_preflight::{
    identity::check_identity,
    ports::{check_ports, probe_order},
    scripts::check_scripts,
    PortProbe,
};

use crate::error::SessionError;
use crate::launcher::{BackendLauncher, FrontendLauncher, IdentitySource};
use crate::log::SessionLog;
use crate::state::{SessionState, StepOutcome};

/// Per-run switches forwarded to the launchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOptions {
    pub open_browser: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self { open_browser: true }
    }
}

/// A session that reached [`SessionState::Running`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSession {
    pub identity: ProjectIdentity,
    pub handle: BackendHandle,
}

impl RunningSession {
    /// Never resolves. Holds the process open while the launched children run;
    /// the session ends only by external termination.
    pub async fn keep_alive(&self) {
        std::future::pending::<()>().await;
    }
}

pub struct Sequencer<'a, I, P, B, F> {
    identity: &'a I,
    probe: &'a P,
    backend: &'a B,
    frontend: &'a F,
    log: SessionLog,
    state: SessionState,
    history: Vec<SessionState>,
}

impl<'a, I, P, B, F> Sequencer<'a, I, P, B, F>
where
    I: IdentitySource,
    P: PortProbe,
    B: BackendLauncher,
    F: FrontendLauncher,
{
    pub fn new(identity: &'a I, probe: &'a P, backend: &'a B, frontend: &'a F, log: SessionLog) -> Self {
        Self {
            identity,
            probe,
            backend,
            frontend,
            log,
            state: SessionState::Idle,
            history: vec![SessionState::Idle],
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// The state whose step failed, if the run failed.
    pub fn failed_during(&self) -> Option<SessionState> {
        if self.state != SessionState::Failed {
            return None;
        }
        self.history.iter().rev().nth(1).copied()
    }

    /// Resolve the identity and run every check. On success the sequencer is
    /// in `StartingBackend` and nothing has been launched.
    pub async fn preflight(&mut self, config: &DevConfig) -> Result<ProjectIdentity, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        self.advance(StepOutcome::Passed);

        let resolved = resolve_identity(self.identity).await;
        let identity = self.step(resolved)?;
        self.log.main(format!("App name: {}", identity.name));
        self.log.main(format!("App ens name: {}", identity.ens_like_name));
        self.log.main(format!("App id: {}", identity.id));

        let validated = check_identity(&identity);
        self.step(validated)?;

        for (role, port) in probe_order(config) {
            self.log.debug(format_args!("probing {role} port {port}"));
        }
        let ports = check_ports(self.probe, config).await;
        self.step(ports)?;

        let scripts = check_scripts(&config.app_src_path).await;
        self.step(scripts)?;

        Ok(identity)
    }

    /// Run the whole sequence up to `Running`.
    ///
    /// The backend is started only after every check passed, and the frontend
    /// only with the handle that backend returned.
    pub async fn start(
        &mut self,
        config: &DevConfig,
        options: StartOptions,
    ) -> Result<RunningSession, SessionError> {
        let identity = self.preflight(config).await?;

        self.log.main("Starting backend...");
        let launched = self.backend.start(config, &identity.name, &identity.id).await;
        let handle = self.step(launched)?;
        self.log.main(format!("DAO address: {}", handle.dao_address));
        self.log.main(format!("App address: {}", handle.app_address));

        self.log.main("Starting frontend...");
        let launched = self
            .frontend
            .start(config, &handle.dao_address, &handle.app_address, options.open_browser)
            .await;
        self.step(launched)?;

        Ok(RunningSession { identity, handle })
    }

    fn step<T, E>(&mut self, result: Result<T, E>) -> Result<T, SessionError>
    where
        E: Into<SessionError>,
    {
        match result {
            Ok(value) => {
                self.advance(StepOutcome::Passed);
                Ok(value)
            }
            Err(err) => {
                self.advance(StepOutcome::Failed);
                Err(err.into())
            }
        }
    }

    fn advance(&mut self, outcome: StepOutcome) {
        let next = self.state.next(outcome);
        self.log
            .debug(format_args!("session state {} -> {next}", self.state));
        self.state = next;
        self.history.push(next);
    }
}

async fn resolve_identity(source: &impl IdentitySource) -> Result<ProjectIdentity, SessionError> {
    let ens = source.resolve_ens_like_name().await?;
    let name = source.resolve_app_name().await?;
    Ok(identity::identity_for(name, ens))
}
