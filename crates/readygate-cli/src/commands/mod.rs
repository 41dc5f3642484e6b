//! CLI command definitions and dispatch.

pub mod probe;
pub mod wait;

use clap::{Parser, Subcommand};

/// readygate — wait for containers to report ready in their logs.
#[derive(Parser, Debug)]
#[command(name = readygate_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Docker endpoint (unix socket path, unix://, or tcp:// address).
    #[arg(long, global = true, env = readygate_common::constants::DOCKER_HOST_ENV)]
    pub docker_host: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long = "json", global = true)]
    pub json_logs: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Block until every container has logged its marker.
    Wait(wait::WaitArgs),
    /// Check a container's logs for a marker once.
    Probe(probe::ProbeArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let docker_host = cli.docker_host;
    match cli.command {
        Command::Wait(args) => wait::execute(args, docker_host.as_deref()),
        Command::Probe(args) => probe::execute(&args, docker_host.as_deref()),
    }
}
