//! Docker backend built on `bollard`.

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::LogsOptions;
use futures::StreamExt;
use readygate_common::constants::DOCKER_CLIENT_TIMEOUT_SECS;
use readygate_common::error::{ReadyGateError, Result};
use readygate_common::types::ContainerName;

use super::{ContainerRuntime, LogRequest, LogStream, RuntimeHandle};

/// Where the Docker daemon listens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DockerEndpoint {
    /// Whatever the client picks by default (`DOCKER_HOST`, then the local
    /// socket or named pipe).
    #[default]
    LocalDefaults,
    /// A unix socket path.
    Socket(String),
    /// An HTTP address such as `tcp://127.0.0.1:2375`.
    Http(String),
}

impl DockerEndpoint {
    /// Interprets a `DOCKER_HOST` style string.
    #[must_use]
    pub fn parse(host: &str) -> Self {
        let host = host.trim();
        if host.is_empty() {
            Self::LocalDefaults
        } else if let Some(path) = host.strip_prefix("unix://") {
            Self::Socket(path.to_string())
        } else if host.starts_with('/') {
            Self::Socket(host.to_string())
        } else {
            Self::Http(host.to_string())
        }
    }
}

/// Container runtime backed by a Docker daemon.
#[derive(Debug, Clone, Default)]
pub struct DockerRuntime {
    endpoint: DockerEndpoint,
}

impl DockerRuntime {
    /// Creates a runtime that connects to `endpoint` on every probe.
    #[must_use]
    pub const fn new(endpoint: DockerEndpoint) -> Self {
        Self { endpoint }
    }

    /// Creates a runtime from an optional `DOCKER_HOST` style string.
    #[must_use]
    pub fn from_host(host: Option<&str>) -> Self {
        Self::new(host.map_or(DockerEndpoint::LocalDefaults, DockerEndpoint::parse))
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &DockerEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    type Handle = DockerHandle;

    async fn connect(&self) -> Result<DockerHandle> {
        let client = match &self.endpoint {
            DockerEndpoint::LocalDefaults => Docker::connect_with_local_defaults(),
            DockerEndpoint::Socket(path) => Docker::connect_with_socket(
                path,
                DOCKER_CLIENT_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
            DockerEndpoint::Http(addr) => Docker::connect_with_http(
                addr,
                DOCKER_CLIENT_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
        }
        .map_err(|e| ReadyGateError::RuntimeConnection {
            message: e.to_string(),
        })?;
        tracing::trace!(endpoint = ?self.endpoint, "docker client connected");
        Ok(DockerHandle { client })
    }
}

/// One Docker client connection; released on drop.
#[derive(Debug)]
pub struct DockerHandle {
    client: Docker,
}

impl RuntimeHandle for DockerHandle {
    fn logs<'a>(&'a self, container: &ContainerName, request: &LogRequest) -> LogStream<'a> {
        let options = LogsOptions::<String> {
            follow: false,
            stdout: request.stdout,
            stderr: request.stderr,
            since: request.since,
            tail: "all".to_string(),
            ..Default::default()
        };
        let name = container.as_str().to_string();
        self.client
            .logs(container.as_str(), Some(options))
            .map(move |item| {
                item.map(|output| output.into_bytes().to_vec())
                    .map_err(|e| map_docker_error(&name, e))
            })
            .boxed()
    }
}

/// A 404 from the daemon means the container does not exist (yet); anything
/// else means the runtime itself is failing.
fn map_docker_error(container: &str, err: bollard::errors::Error) -> ReadyGateError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => ReadyGateError::container_not_found(container),
        other => ReadyGateError::RuntimeConnection {
            message: other.to_string(),
        },
    }
}
