//! Formatted output helpers for CLI commands.

use std::time::Duration;

use readygate_common::config::GateConfig;
use readygate_gate::{ConditionState, GateReport};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Formats a duration as `1m 05s`, `12.3s`, or `450ms`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{:.1}s", millis as f64 / 1_000.0)
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Prints the containers about to be waited for.
pub fn print_plan(config: &GateConfig) {
    eprintln!();
    eprintln!(
        "  {BOLD}{}{RESET} {DIM}v{}{RESET}",
        readygate_common::constants::APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "  {DIM}budget {}, probing every {}{RESET}",
        format_duration(Duration::from_secs(config.timeout_secs)),
        format_duration(Duration::from_secs(config.poll_interval_secs))
    );
    eprintln!();
    for condition in &config.conditions {
        eprintln!(
            "  {YELLOW}…{RESET} {} {DIM}waiting for \"{}\"{RESET}",
            condition.container, condition.marker
        );
    }
}

/// Prints one line per condition of a finished evaluation.
pub fn print_report(report: &GateReport) {
    eprintln!();
    for entry in &report.conditions {
        let (symbol, color) = match entry.state {
            ConditionState::Satisfied => ("✓", GREEN),
            ConditionState::TimedOut => ("✗", RED),
            ConditionState::Pending => ("-", DIM),
        };
        eprintln!(
            "  {color}{symbol}{RESET} {:<24} {DIM}{} after {} ({} probes){RESET}",
            entry.container.as_str(),
            entry.state,
            format_duration(entry.waited),
            entry.probes
        );
    }
}

/// Prints the final verdict.
pub fn print_summary(open: bool, elapsed: Duration) {
    eprintln!();
    if open {
        eprintln!("  {GREEN}{BOLD}Gate open{RESET} {DIM}in {}{RESET}", format_duration(elapsed));
    } else {
        eprintln!("  {RED}{BOLD}Gate closed{RESET} {DIM}after {}{RESET}", format_duration(elapsed));
    }
    eprintln!();
}
