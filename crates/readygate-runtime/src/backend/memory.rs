//! In-memory container runtime driven by a timeline.
//!
//! Each scripted container appears after a delay and writes log chunks at
//! fixed offsets from the moment the runtime was created. Probes see exactly
//! the history written so far, which makes readiness scenarios reproducible
//! under a paused tokio clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use readygate_common::error::{ReadyGateError, Result};
use readygate_common::types::ContainerName;
use tokio::time::Instant;

use super::{ContainerRuntime, LogRequest, LogStream, RuntimeHandle};

/// Output stream a scripted chunk is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

#[derive(Debug, Clone)]
struct ScriptedChunk {
    at: Duration,
    source: LogSource,
    bytes: Vec<u8>,
}

/// Timeline of a single container.
#[derive(Debug, Clone, Default)]
pub struct ScriptedContainer {
    appears_after: Duration,
    chunks: Vec<ScriptedChunk>,
}

impl ScriptedContainer {
    /// A container that exists from the start and has written nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the container unknown to the runtime until `delay` has elapsed.
    #[must_use]
    pub const fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    /// Writes a newline-terminated line to stdout at offset `at`.
    #[must_use]
    pub fn line_at(self, at: Duration, line: &str) -> Self {
        self.chunk_at(at, LogSource::Stdout, format!("{line}\n").into_bytes())
    }

    /// Writes a newline-terminated line to stderr at offset `at`.
    #[must_use]
    pub fn stderr_line_at(self, at: Duration, line: &str) -> Self {
        self.chunk_at(at, LogSource::Stderr, format!("{line}\n").into_bytes())
    }

    /// Writes raw bytes at offset `at`, exactly as given.
    #[must_use]
    pub fn chunk_at(mut self, at: Duration, source: LogSource, bytes: Vec<u8>) -> Self {
        self.chunks.push(ScriptedChunk { at, source, bytes });
        self.chunks.sort_by_key(|c| c.at);
        self
    }
}

#[derive(Debug)]
struct Inner {
    origin: Instant,
    containers: Mutex<HashMap<ContainerName, ScriptedContainer>>,
    log_requests: Mutex<HashMap<ContainerName, usize>>,
    connects: AtomicUsize,
    releases: AtomicUsize,
    unreachable: AtomicBool,
}

/// Scriptable runtime that keeps every container in memory.
#[derive(Debug, Clone)]
pub struct MemoryRuntime {
    inner: Arc<Inner>,
}

impl MemoryRuntime {
    /// Creates an empty runtime; its timeline starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                origin: Instant::now(),
                containers: Mutex::new(HashMap::new()),
                log_requests: Mutex::new(HashMap::new()),
                connects: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
                unreachable: AtomicBool::new(false),
            }),
        }
    }

    /// Registers (or replaces) a scripted container.
    #[must_use]
    pub fn with_container(self, name: impl Into<ContainerName>, script: ScriptedContainer) -> Self {
        let _ = self
            .inner
            .containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), script);
        self
    }

    /// Makes every subsequent `connect` fail as if the daemon were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of handles handed out so far.
    #[must_use]
    pub fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Number of handles dropped so far.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.inner.releases.load(Ordering::SeqCst)
    }

    /// Number of log requests issued for `name`.
    #[must_use]
    pub fn log_requests(&self, name: &str) -> usize {
        self.inner
            .log_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ContainerName::new(name))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for MemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for MemoryRuntime {
    type Handle = MemoryHandle;

    async fn connect(&self) -> Result<MemoryHandle> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            return Err(ReadyGateError::RuntimeConnection {
                message: "memory runtime is unreachable".to_string(),
            });
        }
        let _ = self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHandle {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Connection to a [`MemoryRuntime`]; counted as released on drop.
#[derive(Debug)]
pub struct MemoryHandle {
    inner: Arc<Inner>,
}

impl RuntimeHandle for MemoryHandle {
    fn logs<'a>(&'a self, container: &ContainerName, request: &LogRequest) -> LogStream<'a> {
        *self
            .inner
            .log_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(container.clone())
            .or_insert(0) += 1;

        let elapsed = self.inner.origin.elapsed();
        let containers = self
            .inner
            .containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(script) = containers
            .get(container)
            .filter(|script| script.appears_after <= elapsed)
        else {
            let missing = ReadyGateError::container_not_found(container.as_str());
            return stream::once(async move { Err(missing) }).boxed();
        };

        let written: Vec<Result<Vec<u8>>> = script
            .chunks
            .iter()
            .filter(|chunk| chunk.at <= elapsed)
            .filter(|chunk| match chunk.source {
                LogSource::Stdout => request.stdout,
                LogSource::Stderr => request.stderr,
            })
            .map(|chunk| Ok(chunk.bytes.clone()))
            .collect();
        stream::iter(written).boxed()
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        let _ = self.inner.releases.fetch_add(1, Ordering::SeqCst);
    }
}
