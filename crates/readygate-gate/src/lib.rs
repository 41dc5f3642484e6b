//! # readygate-gate
//!
//! Blocks until a set of named containers have each written a ready marker
//! to their logs, bounded by one deadline shared by all of them.
//!
//! - [`ReadinessConditions`]: ordered container → marker mapping plus the
//!   shared [`Deadline`].
//! - [`ReadinessPoller`]: probes each condition in turn until it is
//!   satisfied or the budget is gone.
//! - [`GateBuilder`]: fluent construction, also from a
//!   [`GateConfig`](readygate_common::config::GateConfig).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use readygate_gate::GateBuilder;
//! use readygate_runtime::backend::docker::DockerRuntime;
//!
//! # fn main() -> readygate_common::error::Result<()> {
//! let gate = GateBuilder::new()
//!     .timeout(Duration::from_secs(300))
//!     .condition("localstack", "Ready")
//!     .build(DockerRuntime::default())?;
//! let report = gate.open_blocking()?;
//! assert!(report.is_open());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod builder;
pub mod conditions;
pub mod deadline;
pub mod poller;
pub mod report;

pub use builder::{Gate, GateBuilder};
pub use conditions::{Condition, ReadinessConditions};
pub use deadline::Deadline;
pub use poller::{PollSettings, ReadinessPoller};
pub use report::{ConditionReport, ConditionState, GateReport};
