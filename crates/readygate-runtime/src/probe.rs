//! A single readiness probe.
//!
//! A probe connects to the runtime, reads the container's entire log history
//! from the beginning, and stops reading as soon as the marker shows up. The
//! runtime handle lives only for the duration of the probe and is dropped on
//! every return path.

use std::fmt;

use futures::StreamExt;
use readygate_common::error::Result;
use readygate_common::types::{ContainerName, Marker};

use crate::backend::{ContainerRuntime, LogRequest, RuntimeHandle};
use crate::scan::MarkerScanner;

/// What one probe learned about a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The marker is in the log history.
    Observed,
    /// The container exists but has not written the marker yet.
    MarkerAbsent,
    /// The runtime does not know the container yet.
    NotYetStarted,
}

impl ProbeOutcome {
    /// Returns true when the condition is satisfied.
    #[must_use]
    pub const fn is_observed(self) -> bool {
        matches!(self, Self::Observed)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed => write!(f, "observed"),
            Self::MarkerAbsent => write!(f, "marker absent"),
            Self::NotYetStarted => write!(f, "not yet started"),
        }
    }
}

/// Runs one probe of `container` for `marker`.
///
/// # Errors
///
/// Returns an error only for runtime failures: the runtime cannot be
/// reached, or it fails with anything other than "container not found".
pub async fn probe<R>(runtime: &R, container: &ContainerName, marker: &Marker) -> Result<ProbeOutcome>
where
    R: ContainerRuntime + ?Sized,
{
    let handle = runtime.connect().await?;
    tracing::info!(container = %container, marker = %marker, "looking for marker");

    let mut logs = handle.logs(container, &LogRequest::full_history());
    let mut scanner = MarkerScanner::new(marker.as_bytes());
    while let Some(chunk) = logs.next().await {
        match chunk {
            Ok(bytes) => {
                if scanner.feed(&bytes) {
                    tracing::info!(container = %container, marker = %marker, "observed marker");
                    return Ok(ProbeOutcome::Observed);
                }
            }
            Err(e) if e.is_container_not_found() => {
                tracing::debug!(container = %container, "container has not appeared yet");
                return Ok(ProbeOutcome::NotYetStarted);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(container = %container, marker = %marker, "marker not in log history");
    Ok(ProbeOutcome::MarkerAbsent)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use readygate_common::error::ReadyGateError;

    use super::*;
    use crate::backend::memory::{LogSource, MemoryRuntime, ScriptedContainer};

    fn names(container: &str, marker: &str) -> (ContainerName, Marker) {
        (ContainerName::new(container), Marker::new(marker))
    }

    #[tokio::test(start_paused = true)]
    async fn observed_when_history_contains_marker() {
        let runtime = MemoryRuntime::new().with_container(
            "serviceA",
            ScriptedContainer::new()
                .line_at(Duration::ZERO, "booting")
                .line_at(Duration::ZERO, "Server Ready on port 8080"),
        );
        let (c, m) = names("serviceA", "Ready");
        assert_eq!(probe(&runtime, &c, &m).await.unwrap(), ProbeOutcome::Observed);
    }

    #[tokio::test(start_paused = true)]
    async fn observed_on_stderr() {
        let runtime = MemoryRuntime::new().with_container(
            "localstack",
            ScriptedContainer::new().stderr_line_at(Duration::ZERO, "Ready."),
        );
        let (c, m) = names("localstack", "Ready");
        assert!(probe(&runtime, &c, &m).await.unwrap().is_observed());
    }

    #[tokio::test(start_paused = true)]
    async fn observed_when_marker_spans_frames() {
        let runtime = MemoryRuntime::new().with_container(
            "api",
            ScriptedContainer::new()
                .chunk_at(Duration::ZERO, LogSource::Stdout, b"status: Re".to_vec())
                .chunk_at(Duration::ZERO, LogSource::Stdout, b"ady\n".to_vec()),
        );
        let (c, m) = names("api", "Ready");
        assert!(probe(&runtime, &c, &m).await.unwrap().is_observed());
    }

    #[tokio::test(start_paused = true)]
    async fn absent_when_marker_missing() {
        let runtime = MemoryRuntime::new().with_container(
            "api",
            ScriptedContainer::new().line_at(Duration::ZERO, "still starting"),
        );
        let (c, m) = names("api", "Ready");
        assert_eq!(
            probe(&runtime, &c, &m).await.unwrap(),
            ProbeOutcome::MarkerAbsent
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_container_is_not_fatal() {
        let runtime = MemoryRuntime::new();
        let (c, m) = names("ghost", "Ready");
        assert_eq!(
            probe(&runtime, &c, &m).await.unwrap(),
            ProbeOutcome::NotYetStarted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_runtime_is_fatal() {
        let runtime = MemoryRuntime::new();
        runtime.set_unreachable(true);
        let (c, m) = names("api", "Ready");
        let err = probe(&runtime, &c, &m).await.unwrap_err();
        assert!(matches!(err, ReadyGateError::RuntimeConnection { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn handle_is_released_on_every_path() {
        let runtime = MemoryRuntime::new().with_container(
            "api",
            ScriptedContainer::new().line_at(Duration::ZERO, "Ready"),
        );
        let ready = names("api", "Ready");
        let absent = names("api", "Listening");
        let missing = names("ghost", "Ready");

        let _ = probe(&runtime, &ready.0, &ready.1).await.unwrap();
        let _ = probe(&runtime, &absent.0, &absent.1).await.unwrap();
        let _ = probe(&runtime, &missing.0, &missing.1).await.unwrap();

        assert_eq!(runtime.connects(), 3);
        assert_eq!(runtime.releases(), 3);
    }
}
