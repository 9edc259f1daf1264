//! `devstart start`: run the full startup sequence and keep the stack alive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};

use devstart_session::{start_blocking, StartRequest};

/// Arguments for `devstart start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Project root containing `arapp.json` and `devstart.yaml`.
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Explicit config file; must exist when given.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Whether the frontend should open a browser window.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub open_browser: bool,

    /// Suppress progress output. Errors are still reported.
    #[arg(long)]
    pub silent: bool,
}

impl StartArgs {
    pub fn run(self) -> Result<()> {
        let project_root = self.project.clone();
        start_blocking(StartRequest {
            project_root: self.project,
            config_path: self.config,
            open_browser: self.open_browser,
            silent: self.silent,
        })
        .with_context(|| {
            format!(
                "development session failed for {}",
                project_root.display()
            )
        })
    }
}
