//! `devstart check`: preflight only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use devstart_preflight::REQUIRED_SCRIPTS;
use devstart_session::{check_blocking, CheckRequest, PreflightReport};

/// Arguments for `devstart check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project root containing `arapp.json` and `devstart.yaml`.
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Explicit config file; must exist when given.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let project_root = self.project.clone();
        let report = check_blocking(CheckRequest {
            project_root: self.project,
            config_path: self.config,
            silent: true,
        })
        .with_context(|| format!("preflight failed for {}", project_root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to render report JSON")?
            );
            return Ok(());
        }

        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &PreflightReport) {
    let ok = "✓".green().bold();
    println!("{}", report.identity.ens_like_name.as_str().bold());
    println!("  app name  {}", report.identity.name);
    println!("  app id    {}", report.identity.id);
    println!();

    let ports = report
        .ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("{ok} ens name is a development name");
    println!("{ok} ports free: {ports}");
    println!(
        "{ok} scripts present in {}: {}",
        report.manifest.display(),
        REQUIRED_SCRIPTS.join(", ")
    );
}
