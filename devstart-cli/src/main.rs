//! devstart: one-command local development environment for Aragon-style apps.
//!
//! # Usage
//!
//! ```text
//! devstart start [--project <dir>] [--config <file>] [--open-browser <bool>] [--silent]
//! devstart check [--project <dir>] [--config <file>] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, start::StartArgs};

#[derive(Parser, Debug)]
#[command(
    name = "devstart",
    version,
    about = "Validate an app project and start its local development stack",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every check, start the backend and frontend, then wait for Ctrl-C.
    Start(StartArgs),

    /// Run the identity, port and script checks without launching anything.
    Check(CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}
