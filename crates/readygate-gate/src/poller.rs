//! Readiness poller: drives probes until every condition is satisfied or the
//! shared deadline passes.
//!
//! Conditions are evaluated one after another in the order of the set. Each
//! condition is probed, then the poller sleeps one interval (or whatever is
//! left of the budget, if less) and checks the budget again. A probe that is
//! already running is never cancelled; the budget is only consulted between
//! probes.

use std::time::Duration;

use readygate_common::constants::{DEFAULT_POLL_DELAY_SECS, DEFAULT_POLL_INTERVAL_SECS};
use readygate_common::error::{ReadyGateError, Result};
use readygate_runtime::backend::ContainerRuntime;
use readygate_runtime::probe::probe;
use tokio::time::Instant;

use crate::conditions::{Condition, ReadinessConditions};
use crate::deadline::Deadline;
use crate::report::{ConditionReport, ConditionState, GateReport};

/// Pacing of the probes for one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between two probes of the same container.
    pub interval: Duration,
    /// Pause before the first probe of each container.
    pub delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            delay: Duration::from_secs(DEFAULT_POLL_DELAY_SECS),
        }
    }
}

/// Waits for readiness conditions against a container runtime.
#[derive(Debug, Clone)]
pub struct ReadinessPoller<R> {
    runtime: R,
    settings: PollSettings,
}

impl<R: ContainerRuntime> ReadinessPoller<R> {
    /// Creates a poller with explicit pacing.
    #[must_use]
    pub const fn new(runtime: R, settings: PollSettings) -> Self {
        Self { runtime, settings }
    }

    /// Creates a poller that probes every ten seconds, starting immediately.
    #[must_use]
    pub fn with_defaults(runtime: R) -> Self {
        Self::new(runtime, PollSettings::default())
    }

    /// The runtime probes are sent to.
    #[must_use]
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Probe pacing.
    #[must_use]
    pub const fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Blocks until every condition is satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`ReadyGateError::DeadlineExceeded`] for the first condition
    /// whose marker was not observed in time; later conditions are not
    /// probed. Runtime failures are returned as soon as they happen.
    pub async fn await_all(&self, conditions: &ReadinessConditions) -> Result<GateReport> {
        self.evaluate(conditions).await?.into_result()
    }

    /// Like [`ReadinessPoller::await_all`], for callers outside an async
    /// context. Drives the wait on a current-thread runtime, suspending the
    /// calling thread. Must not be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Same as [`ReadinessPoller::await_all`], plus
    /// [`ReadyGateError::Executor`] if the executor cannot be created.
    pub fn await_all_blocking(&self, conditions: &ReadinessConditions) -> Result<GateReport> {
        executor()?.block_on(self.await_all(conditions))
    }

    /// Like [`ReadinessPoller::evaluate`], blocking the calling thread. Must
    /// not be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Same as [`ReadinessPoller::evaluate`], plus
    /// [`ReadyGateError::Executor`] if the executor cannot be created.
    pub fn evaluate_blocking(&self, conditions: &ReadinessConditions) -> Result<GateReport> {
        executor()?.block_on(self.evaluate(conditions))
    }

    /// Evaluates every condition and reports where each one ended up. A
    /// timeout is recorded in the report rather than returned as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the container runtime fails.
    pub async fn evaluate(&self, conditions: &ReadinessConditions) -> Result<GateReport> {
        let started = Instant::now();
        let mut reports: Vec<ConditionReport> = Vec::with_capacity(conditions.len());
        let mut closed = false;

        for condition in conditions {
            if closed {
                reports.push(ConditionReport {
                    container: condition.container().clone(),
                    marker: condition.marker().clone(),
                    state: ConditionState::Pending,
                    probes: 0,
                    waited: Duration::ZERO,
                });
                continue;
            }
            let report = self.await_condition(condition, conditions.deadline()).await?;
            closed = report.state == ConditionState::TimedOut;
            reports.push(report);
        }

        let report = GateReport {
            conditions: reports,
            elapsed: started.elapsed(),
        };
        if report.is_open() {
            tracing::info!(
                conditions = report.conditions.len(),
                elapsed_ms = report.elapsed.as_millis(),
                "readiness gate open"
            );
        }
        Ok(report)
    }

    async fn await_condition(
        &self,
        condition: &Condition,
        deadline: Deadline,
    ) -> Result<ConditionReport> {
        let started = Instant::now();
        let container = condition.container();
        let marker = condition.marker();
        let mut probes: u32 = 0;

        let finish = |state: ConditionState, probes: u32| ConditionReport {
            container: container.clone(),
            marker: marker.clone(),
            state,
            probes,
            waited: started.elapsed(),
        };

        if !deadline.has_passed() && !self.settings.delay.is_zero() {
            tokio::time::sleep(self.settings.delay.min(deadline.remaining())).await;
        }

        loop {
            let remaining_ms = deadline.remaining_millis();
            if remaining_ms <= 0 {
                tracing::warn!(
                    container = %container,
                    marker = %marker,
                    probes,
                    "deadline exceeded before marker was observed"
                );
                return Ok(finish(ConditionState::TimedOut, probes));
            }

            probes += 1;
            let outcome = probe(&self.runtime, container, marker).await?;
            if outcome.is_observed() {
                return Ok(finish(ConditionState::Satisfied, probes));
            }

            tracing::debug!(
                container = %container,
                outcome = %outcome,
                probe = probes,
                remaining_ms,
                "condition still pending"
            );
            tokio::time::sleep(self.settings.interval.min(deadline.remaining())).await;
        }
    }
}

fn executor() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| ReadyGateError::Executor { source })
}

#[cfg(test)]
mod tests {
    use readygate_runtime::backend::memory::{MemoryRuntime, ScriptedContainer};

    use super::*;

    fn settings(interval_secs: u64) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(interval_secs),
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn default_settings_poll_every_ten_seconds() {
        let s = PollSettings::default();
        assert_eq!(s.interval, Duration::from_secs(10));
        assert_eq!(s.delay, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_set_opens_without_probing() {
        let runtime = MemoryRuntime::new();
        let poller = ReadinessPoller::new(runtime.clone(), settings(10));
        let set = ReadinessConditions::new(
            Deadline::after(Duration::from_secs(1)),
            Vec::<(String, String)>::new(),
        );
        let report = poller.await_all(&set).await.unwrap();
        assert!(report.is_open());
        assert_eq!(runtime.connects(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn past_deadline_times_out_without_probing() {
        let runtime = MemoryRuntime::new()
            .with_container("api", ScriptedContainer::new().line_at(Duration::ZERO, "Ready"));
        let poller = ReadinessPoller::new(runtime.clone(), settings(10));
        let set = ReadinessConditions::new(Deadline::after(Duration::ZERO), [("api", "Ready")]);

        let err = poller.await_all(&set).await.unwrap_err();
        assert!(matches!(err, ReadyGateError::DeadlineExceeded { .. }));
        assert_eq!(runtime.log_requests("api"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_delay_postpones_first_probe() {
        let runtime = MemoryRuntime::new()
            .with_container("api", ScriptedContainer::new().line_at(Duration::ZERO, "Ready"));
        let poller = ReadinessPoller::new(
            runtime.clone(),
            PollSettings {
                interval: Duration::from_secs(10),
                delay: Duration::from_secs(3),
            },
        );
        let set = ReadinessConditions::new(Deadline::after(Duration::from_secs(60)), [("api", "Ready")]);

        let start = Instant::now();
        let report = poller.await_all(&set).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(report.conditions[0].probes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn evaluate_records_timeout_instead_of_failing() {
        let runtime = MemoryRuntime::new()
            .with_container("slow", ScriptedContainer::new())
            .with_container("fast", ScriptedContainer::new().line_at(Duration::ZERO, "Ready"));
        let poller = ReadinessPoller::new(runtime, settings(5));
        let set = ReadinessConditions::new(
            Deadline::after(Duration::from_secs(20)),
            [("slow", "Ready"), ("fast", "Ready")],
        );

        let report = poller.evaluate(&set).await.unwrap();
        assert_eq!(report.conditions[0].state, ConditionState::TimedOut);
        assert_eq!(report.conditions[1].state, ConditionState::Pending);
        assert_eq!(report.conditions[1].probes, 0);
        assert_eq!(report.timed_out().unwrap().container.as_str(), "slow");
    }

    #[tokio::test(start_paused = true)]
    async fn runtime_failure_is_not_retried() {
        let runtime = MemoryRuntime::new();
        runtime.set_unreachable(true);
        let poller = ReadinessPoller::new(runtime, settings(10));
        let set = ReadinessConditions::new(Deadline::after(Duration::from_secs(60)), [("api", "Ready")]);

        let start = Instant::now();
        let err = poller.await_all(&set).await.unwrap_err();
        assert!(matches!(err, ReadyGateError::RuntimeConnection { .. }));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn blocking_wait_runs_outside_async_context() {
        let runtime = MemoryRuntime::new()
            .with_container("api", ScriptedContainer::new().line_at(Duration::ZERO, "Ready"));
        let poller = ReadinessPoller::new(runtime, settings(1));
        let set = ReadinessConditions::new(Deadline::after(Duration::from_secs(5)), [("api", "Ready")]);
        let report = poller.await_all_blocking(&set).unwrap();
        assert!(report.is_open());
    }
}
