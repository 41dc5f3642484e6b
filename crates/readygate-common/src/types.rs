//! Domain primitive types used across the readygate workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name under which the container runtime knows a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerName(String);

impl ContainerName {
    /// Creates a container name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContainerName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Literal substring a container writes to its logs once it is ready.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    /// Creates a marker from a string value.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    /// Returns the marker text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the marker as raw bytes, the form log chunks are matched in.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Marker {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Marker {
    fn from(value: String) -> Self {
        Self(value)
    }
}
