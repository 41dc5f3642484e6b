//! `readygate wait` — Block until every container has logged its marker.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use readygate_common::config::{ConditionConfig, GateConfig};
use readygate_gate::{GateBuilder, GateReport};
use readygate_runtime::backend::docker::DockerRuntime;

use crate::output;

/// Arguments for the `wait` command.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Gate configuration file (YAML, or JSON with a `.json` extension).
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Condition as CONTAINER=MARKER; repeat for several containers.
    /// Evaluated after any conditions from the configuration file.
    #[arg(short = 'c', long = "condition", value_name = "CONTAINER=MARKER", value_parser = parse_condition)]
    pub conditions: Vec<(String, String)>,

    /// Total budget in seconds, shared by all conditions.
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Seconds between two probes of the same container.
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Seconds to wait before the first probe of each container.
    #[arg(long)]
    pub delay: Option<u64>,
}

/// Executes the `wait` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the Docker daemon
/// cannot be reached, or a container misses the deadline.
pub fn execute(args: WaitArgs, docker_host: Option<&str>) -> anyhow::Result<()> {
    let config = resolve_config(args, docker_host)?;
    tracing::info!(
        conditions = config.conditions.len(),
        timeout_secs = config.timeout_secs,
        interval_secs = config.poll_interval_secs,
        "waiting for containers"
    );

    let start = Instant::now();
    output::print_plan(&config);

    let runtime = DockerRuntime::from_host(config.docker_host.as_deref());
    let gate = GateBuilder::from_config(&config).build(runtime)?;

    let report = gate.evaluate_blocking().context("readiness gate failed")?;
    conclude(report, start.elapsed())
}

/// Prints the per-container breakdown and the verdict, then fails if any
/// container missed the deadline.
fn conclude(report: GateReport, elapsed: Duration) -> anyhow::Result<()> {
    output::print_report(&report);
    output::print_summary(report.is_open(), elapsed);
    report.into_result()?;
    Ok(())
}

/// Merges the configuration file, command-line flags, and the global Docker
/// endpoint into one validated configuration.
fn resolve_config(args: WaitArgs, docker_host: Option<&str>) -> anyhow::Result<GateConfig> {
    let mut config = match &args.config {
        Some(path) => GateConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GateConfig::default(),
    };

    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval;
    }
    if let Some(delay) = args.delay {
        config.poll_delay_secs = delay;
    }
    if let Some(host) = docker_host {
        config.docker_host = Some(host.to_string());
    }
    config
        .conditions
        .extend(args.conditions.into_iter().map(|(container, marker)| ConditionConfig {
            container: container.into(),
            marker: marker.into(),
        }));

    if config.conditions.is_empty() {
        anyhow::bail!("no conditions given: pass --condition CONTAINER=MARKER or --config FILE");
    }
    config.validate()?;
    Ok(config)
}

/// Splits `CONTAINER=MARKER` at the first `=`; the marker may itself
/// contain `=` and spaces.
fn parse_condition(raw: &str) -> Result<(String, String), String> {
    let (container, marker) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CONTAINER=MARKER, got `{raw}`"))?;
    let container = container.trim();
    if container.is_empty() {
        return Err(format!("missing container name in `{raw}`"));
    }
    Ok((container.to_string(), marker.to_string()))
}
