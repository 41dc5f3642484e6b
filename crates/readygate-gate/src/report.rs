//! Outcome of a gate evaluation.

use std::fmt;
use std::time::Duration;

use readygate_common::error::{ReadyGateError, Result};
use readygate_common::types::{ContainerName, Marker};

/// Where a single condition ended up.
///
/// `Pending` moves to `Satisfied` when a probe observes the marker, or to
/// `TimedOut` when the shared budget runs out. Neither terminal state is ever
/// left. Conditions after a timed-out one are never probed and stay
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionState {
    /// Not decided yet, or never evaluated.
    Pending,
    /// The marker was observed.
    Satisfied,
    /// The deadline passed first.
    TimedOut,
}

impl ConditionState {
    /// Whether the state can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Satisfied | Self::TimedOut)
    }
}

impl fmt::Display for ConditionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Satisfied => write!(f, "satisfied"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// What happened to one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionReport {
    /// Container that was watched.
    pub container: ContainerName,
    /// Marker that was looked for.
    pub marker: Marker,
    /// Final state.
    pub state: ConditionState,
    /// Probes issued for this condition.
    pub probes: u32,
    /// Wall time spent on this condition.
    pub waited: Duration,
}

/// Per-condition results in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    /// One entry per condition, in evaluation order.
    pub conditions: Vec<ConditionReport>,
    /// Wall time spent on the whole evaluation.
    pub elapsed: Duration,
}

impl GateReport {
    /// Whether every condition is satisfied.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conditions
            .iter()
            .all(|c| c.state == ConditionState::Satisfied)
    }

    /// The condition that ran out of time, if any.
    #[must_use]
    pub fn timed_out(&self) -> Option<&ConditionReport> {
        self.conditions
            .iter()
            .find(|c| c.state == ConditionState::TimedOut)
    }

    /// Total number of probes issued.
    #[must_use]
    pub fn total_probes(&self) -> u32 {
        self.conditions.iter().map(|c| c.probes).sum()
    }

    /// Turns a closed gate into an error.
    ///
    /// # Errors
    ///
    /// Returns [`ReadyGateError::DeadlineExceeded`] naming the condition that
    /// timed out.
    pub fn into_result(self) -> Result<Self> {
        if let Some(failed) = self.timed_out() {
            return Err(ReadyGateError::DeadlineExceeded {
                container: failed.container.to_string(),
                marker: failed.marker.to_string(),
            });
        }
        Ok(self)
    }
}
