//! `readygate probe` — Check a container's logs for a marker once.

use clap::Args;
use readygate_common::error::ReadyGateError;
use readygate_common::types::{ContainerName, Marker};
use readygate_runtime::backend::docker::DockerRuntime;
use readygate_runtime::probe::{ProbeOutcome, probe};

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Container name.
    pub container: String,

    /// Marker to look for in the container's logs.
    pub marker: String,
}

/// Executes the `probe` command.
///
/// Reads the container's full log history once and reports whether the
/// marker is in it.
///
/// # Errors
///
/// Returns an error if the Docker daemon cannot be reached or the marker is
/// not present.
pub fn execute(args: &ProbeArgs, docker_host: Option<&str>) -> anyhow::Result<()> {
    let runtime = DockerRuntime::from_host(docker_host);
    let container = ContainerName::new(args.container.as_str());
    let marker = Marker::new(args.marker.as_str());

    let executor = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| ReadyGateError::Executor { source })?;
    let outcome = executor.block_on(probe(&runtime, &container, &marker))?;

    println!("{container}: {outcome}");
    match outcome {
        ProbeOutcome::Observed => Ok(()),
        ProbeOutcome::MarkerAbsent | ProbeOutcome::NotYetStarted => {
            anyhow::bail!("\"{marker}\" not observed for container {container}")
        }
    }
}
