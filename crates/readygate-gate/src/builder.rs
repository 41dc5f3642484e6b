//! Fluent API for assembling a gate.

use std::time::Duration;

use readygate_common::config::GateConfig;
use readygate_common::constants::DEFAULT_TIMEOUT_SECS;
use readygate_common::error::{ReadyGateError, Result};
use readygate_common::types::{ContainerName, Marker};
use readygate_runtime::backend::ContainerRuntime;

use crate::conditions::ReadinessConditions;
use crate::deadline::Deadline;
use crate::poller::{PollSettings, ReadinessPoller};
use crate::report::GateReport;

/// A poller bound to the conditions it waits for.
#[derive(Debug, Clone)]
pub struct Gate<R> {
    poller: ReadinessPoller<R>,
    conditions: ReadinessConditions,
}

impl<R: ContainerRuntime> Gate<R> {
    /// Binds an existing poller and condition set.
    #[must_use]
    pub const fn new(poller: ReadinessPoller<R>, conditions: ReadinessConditions) -> Self {
        Self { poller, conditions }
    }

    /// The conditions this gate waits for.
    #[must_use]
    pub const fn conditions(&self) -> &ReadinessConditions {
        &self.conditions
    }

    /// The poller driving the probes.
    #[must_use]
    pub const fn poller(&self) -> &ReadinessPoller<R> {
        &self.poller
    }

    /// Waits until every container is ready.
    ///
    /// # Errors
    ///
    /// See [`ReadinessPoller::await_all`].
    pub async fn open(&self) -> Result<GateReport> {
        self.poller.await_all(&self.conditions).await
    }

    /// Waits until every container is ready, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// See [`ReadinessPoller::await_all_blocking`].
    pub fn open_blocking(&self) -> Result<GateReport> {
        self.poller.await_all_blocking(&self.conditions)
    }

    /// Runs every condition to a final state without treating a timeout as
    /// an error, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// See [`ReadinessPoller::evaluate_blocking`].
    pub fn evaluate_blocking(&self) -> Result<GateReport> {
        self.poller.evaluate_blocking(&self.conditions)
    }
}

/// Builder for a [`Gate`].
///
/// The deadline is fixed when [`GateBuilder::build`] runs: a relative
/// timeout starts counting at that moment.
#[derive(Debug, Clone)]
pub struct GateBuilder {
    timeout: Duration,
    deadline: Option<Deadline>,
    settings: PollSettings,
    markers: Vec<(ContainerName, Marker)>,
}

impl GateBuilder {
    /// Creates a builder with the default timeout and pacing and no
    /// conditions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            deadline: None,
            settings: PollSettings::default(),
            markers: Vec::new(),
        }
    }

    /// Creates a builder from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        let mut builder = Self::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .poll_interval(Duration::from_secs(config.poll_interval_secs))
            .poll_delay(Duration::from_secs(config.poll_delay_secs));
        for condition in &config.conditions {
            builder = builder.condition(condition.container.clone(), condition.marker.clone());
        }
        builder
    }

    /// Sets a budget relative to the moment the gate is built.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.deadline = None;
        self
    }

    /// Sets an absolute deadline; overrides any relative timeout.
    #[must_use]
    pub const fn deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the pause between two probes of the same container.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.interval = interval;
        self
    }

    /// Sets the pause before the first probe of each container.
    #[must_use]
    pub const fn poll_delay(mut self, delay: Duration) -> Self {
        self.settings.delay = delay;
        self
    }

    /// Appends a condition; conditions are evaluated in the order added.
    #[must_use]
    pub fn condition(mut self, container: impl Into<ContainerName>, marker: impl Into<Marker>) -> Self {
        self.markers.push((container.into(), marker.into()));
        self
    }

    /// Fixes the deadline and binds the conditions to `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadyGateError::Config`] if the poll interval is zero.
    pub fn build<R: ContainerRuntime>(self, runtime: R) -> Result<Gate<R>> {
        if self.settings.interval.is_zero() {
            return Err(ReadyGateError::Config {
                message: "poll interval must be greater than zero".to_string(),
            });
        }
        let deadline = self
            .deadline
            .unwrap_or_else(|| Deadline::after(self.timeout));
        let conditions = ReadinessConditions::new(deadline, self.markers);
        tracing::debug!(
            conditions = conditions.len(),
            remaining_ms = conditions.remaining_millis(),
            interval_ms = self.settings.interval.as_millis(),
            "readiness gate built"
        );
        Ok(Gate::new(ReadinessPoller::new(runtime, self.settings), conditions))
    }
}

impl Default for GateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
