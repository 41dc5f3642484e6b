//! Unified error type for the readygate workspace.
//!
//! Transient conditions (a container that has not started yet, a marker not
//! yet written) are not errors at the gate level: the probe reports them as
//! outcomes and the poller retries. Only [`ReadyGateError::DeadlineExceeded`]
//! and [`ReadyGateError::RuntimeConnection`] end a wait.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ReadyGateError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The shared budget ran out before a container printed its marker.
    #[error("deadline exceeded waiting for \"{marker}\" from container {container}")]
    DeadlineExceeded {
        /// Container that never became ready.
        container: String,
        /// Marker that was never observed.
        marker: String,
    },

    /// The container runtime could not be reached or failed mid-request.
    #[error("container runtime failure: {message}")]
    RuntimeConnection {
        /// Description reported by the runtime client.
        message: String,
    },

    /// The async executor backing a blocking wait could not be started.
    #[error("failed to start async executor: {source}")]
    Executor {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// YAML deserialization failed.
    #[error("yaml error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

impl ReadyGateError {
    /// Shorthand for a missing container.
    #[must_use]
    pub fn container_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "container",
            id: name.into(),
        }
    }

    /// Returns true when the runtime reported that a container does not exist.
    #[must_use]
    pub fn is_container_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound {
                kind: "container",
                ..
            }
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ReadyGateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_message_names_container_and_marker() {
        let err = ReadyGateError::DeadlineExceeded {
            container: "serviceA".into(),
            marker: "Ready".into(),
        };
        assert_eq!(
            err.to_string(),
            "deadline exceeded waiting for \"Ready\" from container serviceA"
        );
    }

    #[test]
    fn container_not_found_is_recognised() {
        assert!(ReadyGateError::container_not_found("db").is_container_not_found());
        let other = ReadyGateError::NotFound {
            kind: "image",
            id: "db".into(),
        };
        assert!(!other.is_container_not_found());
    }
}
