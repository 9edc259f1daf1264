//! Collaborators the sequencer drives: identity source and the two launchers.
//!
//! The traits are the seams; the `Arapp*`/`Command*` types are the stock
//! implementations used by the `devstart` binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use devstart_core::{identity, AppId, BackendHandle, DevConfig, EnsName, IdentityError, LaunchCommand};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::error::LaunchError;
use crate::log::SessionLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSide {
    Backend,
    Frontend,
}

impl fmt::Display for LaunchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchSide::Backend => write!(f, "backend"),
            LaunchSide::Frontend => write!(f, "frontend"),
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Where the app's names come from.
#[allow(async_fn_in_trait)]
pub trait IdentitySource {
    /// Dotted development name, e.g. `myapp.aragonpm.eth`.
    async fn resolve_ens_like_name(&self) -> Result<EnsName, IdentityError>;
    /// Short app name, e.g. `myapp`.
    async fn resolve_app_name(&self) -> Result<String, IdentityError>;
}

/// Starts the local execution environment and reports where the app lives.
#[allow(async_fn_in_trait)]
pub trait BackendLauncher {
    async fn start(
        &self,
        env: &DevConfig,
        app_name: &str,
        app_id: &AppId,
    ) -> Result<BackendHandle, LaunchError>;
}

/// Starts the browser client against a running backend.
#[allow(async_fn_in_trait)]
pub trait FrontendLauncher {
    async fn start(
        &self,
        env: &DevConfig,
        dao_address: &str,
        app_address: &str,
        open_browser: bool,
    ) -> Result<(), LaunchError>;
}

// ---------------------------------------------------------------------------
// arapp.json identity
// ---------------------------------------------------------------------------

/// Reads `environments.default.appName` from `<project>/arapp.json`.
#[derive(Debug, Clone)]
pub struct ArappIdentitySource {
    project_root: PathBuf,
}

impl ArappIdentitySource {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl IdentitySource for ArappIdentitySource {
    async fn resolve_ens_like_name(&self) -> Result<EnsName, IdentityError> {
        let path = identity::arapp_path(&self.project_root);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| IdentityError::Io {
                path: path.clone(),
                source,
            })?;
        identity::ens_name_from_arapp(&path, &contents)
    }

    async fn resolve_app_name(&self) -> Result<String, IdentityError> {
        let ens = self.resolve_ens_like_name().await?;
        Ok(identity::app_name(&ens))
    }
}

// ---------------------------------------------------------------------------
// Command launchers
// ---------------------------------------------------------------------------

/// Runs the configured backend program and waits for it to print its
/// addresses as one JSON line: `{"daoAddress": "0x…", "appAddress": "0x…"}`.
///
/// Lines before and after that are forwarded to the session log. The child
/// keeps running for as long as the launcher is alive.
pub struct CommandBackendLauncher {
    command: Option<LaunchCommand>,
    project_root: PathBuf,
    log: SessionLog,
    child: Mutex<Option<Child>>,
}

impl CommandBackendLauncher {
    pub fn new(command: Option<LaunchCommand>, project_root: impl Into<PathBuf>, log: SessionLog) -> Self {
        Self {
            command,
            project_root: project_root.into(),
            log,
            child: Mutex::new(None),
        }
    }
}

impl BackendLauncher for CommandBackendLauncher {
    async fn start(
        &self,
        env: &DevConfig,
        app_name: &str,
        app_id: &AppId,
    ) -> Result<BackendHandle, LaunchError> {
        let side = LaunchSide::Backend;
        let command = self
            .command
            .as_ref()
            .ok_or(LaunchError::NotConfigured { side })?;

        let mut cmd = base_command(command, &self.project_root);
        cmd.env("DEVSTART_APP_NAME", app_name)
            .env("DEVSTART_APP_ID", app_id.as_str())
            .env("DEVSTART_APP_SRC_PATH", &env.app_src_path)
            .env("DEVSTART_APP_SERVE_PORT", env.app_serve_port.to_string());
        let mut child = spawn(&mut cmd, side, command, self.log)?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, side, self.log));
        }
        let stdout = child.stdout.take().ok_or_else(|| LaunchError::Io {
            side,
            source: std::io::Error::other("stdout was not captured"),
        })?;

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|source| LaunchError::Io { side, source })?
        {
            if let Some(handle) = parse_handle(&line) {
                let log = self.log;
                tokio::spawn(async move {
                    while let Ok(Some(line)) = lines.next_line().await {
                        log.child(side, &line);
                    }
                    log.warn(format_args!("{side} output closed; the process may have exited"));
                });
                *self.child.lock().await = Some(child);
                return Ok(handle);
            }
            self.log.child(side, &line);
        }

        let status = child
            .wait()
            .await
            .map_err(|source| LaunchError::Io { side, source })?;
        Err(LaunchError::ExitedEarly { side, status })
    }
}

/// Runs the configured frontend program with the backend addresses in its
/// environment. Ready as soon as the process is spawned.
pub struct CommandFrontendLauncher {
    command: Option<LaunchCommand>,
    project_root: PathBuf,
    log: SessionLog,
    child: Mutex<Option<Child>>,
}

impl CommandFrontendLauncher {
    pub fn new(command: Option<LaunchCommand>, project_root: impl Into<PathBuf>, log: SessionLog) -> Self {
        Self {
            command,
            project_root: project_root.into(),
            log,
            child: Mutex::new(None),
        }
    }
}

impl FrontendLauncher for CommandFrontendLauncher {
    async fn start(
        &self,
        env: &DevConfig,
        dao_address: &str,
        app_address: &str,
        open_browser: bool,
    ) -> Result<(), LaunchError> {
        let side = LaunchSide::Frontend;
        let command = self
            .command
            .as_ref()
            .ok_or(LaunchError::NotConfigured { side })?;

        let mut cmd = base_command(command, &self.project_root);
        cmd.env("DEVSTART_DAO_ADDRESS", dao_address)
            .env("DEVSTART_APP_ADDRESS", app_address)
            .env("DEVSTART_OPEN_BROWSER", open_browser.to_string())
            .env("DEVSTART_CLIENT_SERVE_PORT", env.client_serve_port.to_string());
        let mut child = spawn(&mut cmd, side, command, self.log)?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, side, self.log));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, side, self.log));
        }
        *self.child.lock().await = Some(child);
        Ok(())
    }
}

fn base_command(command: &LaunchCommand, project_root: &Path) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .envs(&command.env)
        .current_dir(project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

fn spawn(
    cmd: &mut Command,
    side: LaunchSide,
    command: &LaunchCommand,
    log: SessionLog,
) -> Result<Child, LaunchError> {
    log.debug(format_args!("spawning {side}: {} {:?}", command.program, command.args));
    cmd.spawn().map_err(|source| LaunchError::Spawn {
        side,
        program: command.program.clone(),
        source,
    })
}

/// A backend handle line, if `line` is one.
pub fn parse_handle(line: &str) -> Option<BackendHandle> {
    let line = line.trim();
    if !line.starts_with('{') {
        return None;
    }
    serde_json::from_str(line).ok()
}

async fn forward_lines<R>(reader: R, side: LaunchSide, log: SessionLog)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        log.child(side, &line);
    }
}
