//! Container runtime abstraction.
//!
//! A runtime hands out a fresh [`RuntimeHandle`] per [`ContainerRuntime::connect`]
//! call. Handles are never shared between probes; dropping one closes the
//! underlying connection.

pub mod docker;
pub mod memory;

use async_trait::async_trait;
use futures::stream::BoxStream;
use readygate_common::error::Result;
use readygate_common::types::ContainerName;

/// Raw log chunks as emitted by the runtime, stdout and stderr interleaved.
///
/// A missing container is reported as a
/// [`ReadyGateError::NotFound`](readygate_common::error::ReadyGateError::NotFound)
/// item, usually the first and only one.
pub type LogStream<'a> = BoxStream<'a, Result<Vec<u8>>>;

/// Which part of a container's log history to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRequest {
    /// Unix timestamp (seconds) of the oldest entry to return; `0` reads
    /// everything the container has written.
    pub since: i64,
    /// Include standard output.
    pub stdout: bool,
    /// Include standard error.
    pub stderr: bool,
}

impl LogRequest {
    /// Both streams, from the very beginning of the container's history.
    #[must_use]
    pub const fn full_history() -> Self {
        Self {
            since: 0,
            stdout: true,
            stderr: true,
        }
    }
}

impl Default for LogRequest {
    fn default() -> Self {
        Self::full_history()
    }
}

/// A container runtime the gate can observe.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Connection type handed out per probe.
    type Handle: RuntimeHandle;

    /// Opens a new connection to the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ReadyGateError::RuntimeConnection`](readygate_common::error::ReadyGateError::RuntimeConnection)
    /// if the runtime cannot be reached.
    async fn connect(&self) -> Result<Self::Handle>;
}

/// An open connection to a container runtime. Dropping it releases the
/// connection.
pub trait RuntimeHandle: Send {
    /// Streams the logs of `container` without following new output; the
    /// stream ends once the current history has been sent.
    fn logs<'a>(&'a self, container: &ContainerName, request: &LogRequest) -> LogStream<'a>;
}
