use std::path::PathBuf;

use devstart_core::{config, AppId, BackendHandle, DevConfig, ProjectIdentity};
use devstart_preflight::{ports::probe_order, scripts::manifest_path, TcpPortProbe};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::error::{LaunchError, SessionError};
use crate::launcher::{
    ArappIdentitySource, BackendLauncher, CommandBackendLauncher, CommandFrontendLauncher,
    FrontendLauncher, LaunchSide,
};
use crate::log::SessionLog;
use crate::sequencer::{Sequencer, StartOptions};
use crate::state::SessionState;

/// Inputs for `devstart start`.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub open_browser: bool,
    pub silent: bool,
}

/// Inputs for `devstart check`.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub silent: bool,
}

/// What `devstart check` verified.
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub identity: ProjectIdentity,
    pub ports: Vec<u16>,
    pub manifest: PathBuf,
    pub states: Vec<SessionState>,
}

/// Start a development session and block the current thread until it ends.
pub fn start_blocking(request: StartRequest) -> Result<(), SessionError> {
    init_tracing(SessionLog::new(request.silent));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SessionError::Runtime)?;
    runtime.block_on(run(request))
}

/// Run a development session until Ctrl-C.
///
/// Returning drops both launchers, which kills their children.
pub async fn run(request: StartRequest) -> Result<(), SessionError> {
    let log = SessionLog::new(request.silent);
    log.main("Starting...");

    let file_config = config::load_at(&request.project_root, request.config_path.as_deref())?;
    let dev = file_config.dev_config(&request.project_root);

    let identity = ArappIdentitySource::new(&request.project_root);
    let probe = TcpPortProbe::default();
    let backend =
        CommandBackendLauncher::new(file_config.backend.clone(), &request.project_root, log);
    let frontend =
        CommandFrontendLauncher::new(file_config.frontend.clone(), &request.project_root, log);

    let mut sequencer = Sequencer::new(&identity, &probe, &backend, &frontend, log);
    let session = sequencer
        .start(
            &dev,
            StartOptions {
                open_browser: request.open_browser,
            },
        )
        .await?;
    log.main(format!(
        "Development session for {} is running. Press Ctrl-C to stop.",
        session.identity.ens_like_name
    ));

    tokio::select! {
        () = session.keep_alive() => Ok(()),
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => {
                log.main("received ctrl-c, shutting down");
                Ok(())
            }
            Err(err) => Err(SessionError::Runtime(err)),
        },
    }
}

/// Run the preflight checks on a fresh single-threaded runtime.
pub fn check_blocking(request: CheckRequest) -> Result<PreflightReport, SessionError> {
    init_tracing(SessionLog::new(request.silent));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SessionError::Runtime)?;
    runtime.block_on(check(request))
}

/// Resolve the identity and run every check without launching anything.
pub async fn check(request: CheckRequest) -> Result<PreflightReport, SessionError> {
    let log = SessionLog::new(request.silent);
    let file_config = config::load_at(&request.project_root, request.config_path.as_deref())?;
    let dev = file_config.dev_config(&request.project_root);

    let identity = ArappIdentitySource::new(&request.project_root);
    let probe = TcpPortProbe::default();
    let mut sequencer = Sequencer::new(&identity, &probe, &NoLaunch, &NoLaunch, log);
    let identity = sequencer.preflight(&dev).await?;

    Ok(PreflightReport {
        identity,
        ports: probe_order(&dev).into_iter().map(|(_, port)| port).collect(),
        manifest: manifest_path(&dev.app_src_path),
        states: sequencer.history().to_vec(),
    })
}

/// Stand-in launchers for check-only runs; preflight never reaches them.
struct NoLaunch;

impl BackendLauncher for NoLaunch {
    async fn start(&self, _: &DevConfig, _: &str, _: &AppId) -> Result<BackendHandle, LaunchError> {
        Err(LaunchError::NotConfigured {
            side: LaunchSide::Backend,
        })
    }
}

impl FrontendLauncher for NoLaunch {
    async fn start(&self, _: &DevConfig, _: &str, _: &str, _: bool) -> Result<(), LaunchError> {
        Err(LaunchError::NotConfigured {
            side: LaunchSide::Frontend,
        })
    }
}

fn init_tracing(log: SessionLog) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(log))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `off` for silent sessions, regardless of `RUST_LOG`; otherwise `RUST_LOG`
/// or `info`.
fn log_filter(log: SessionLog) -> EnvFilter {
    if log.is_silent() {
        return EnvFilter::new("off");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::FailureKind;

    fn project(ens: &str) -> TempDir {
        let dir = TempDir::new().expect("project");
        fs::write(
            dir.path().join("arapp.json"),
            format!(r#"{{"environments":{{"default":{{"appName":"{ens}"}}}}}}"#),
        )
        .expect("write arapp.json");
        dir
    }

    #[test]
    fn silent_sessions_turn_all_logging_off() {
        assert_eq!(log_filter(SessionLog::new(true)).to_string(), "off");
    }

    #[tokio::test]
    async fn check_rejects_wrong_registry_suffix() {
        let dir = project("myapp.eth");
        let err = check(CheckRequest {
            project_root: dir.path().to_path_buf(),
            config_path: None,
            silent: true,
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidIdentityName);
    }

    #[tokio::test]
    async fn check_reports_configuration_errors() {
        let dir = project("myapp.aragonpm.eth");
        fs::write(dir.path().join("devstart.yaml"), "app_serve_port: nope\n").expect("write");
        let err = check(CheckRequest {
            project_root: dir.path().to_path_buf(),
            config_path: None,
            silent: true,
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Configuration);
    }

    #[tokio::test]
    async fn run_without_backend_command_fails_after_preflight() {
        let dir = project("myapp.aragonpm.eth");
        let ports: Vec<u16> = {
            let a = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            let b = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            vec![
                a.local_addr().expect("addr").port(),
                b.local_addr().expect("addr").port(),
            ]
        };
        fs::write(
            dir.path().join("devstart.yaml"),
            format!("client_serve_port: {}\napp_serve_port: {}\n", ports[0], ports[1]),
        )
        .expect("write config");
        fs::create_dir_all(dir.path().join("app")).expect("mkdir app");
        fs::write(
            dir.path().join("app").join("package.json"),
            r#"{"scripts":{"sync-assets":"a","watch":"w","serve":"s"}}"#,
        )
        .expect("write manifest");

        let err = run(StartRequest {
            project_root: dir.path().to_path_buf(),
            config_path: None,
            open_browser: false,
            silent: true,
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::LaunchFailure);
        assert!(err.to_string().contains("backend launcher is not configured"));
    }
}
