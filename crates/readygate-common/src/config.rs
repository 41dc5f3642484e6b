//! Configuration model for a readiness gate.
//!
//! A gate configuration can be written in YAML or JSON; the format is chosen
//! from the file extension. Conditions are a list so that their order, which
//! is also the evaluation order, survives every format.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{ReadyGateError, Result};
use crate::types::{ContainerName, Marker};

/// One container and the marker it must print before the gate opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Container to watch.
    pub container: ContainerName,
    /// Substring expected in the container's logs.
    pub marker: Marker,
}

/// Root configuration for a readiness gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Total budget shared by every condition, in seconds.
    pub timeout_secs: u64,
    /// Pause between two probes of the same container, in seconds.
    pub poll_interval_secs: u64,
    /// Pause before the first probe of each container, in seconds.
    pub poll_delay_secs: u64,
    /// Docker endpoint; `None` uses the client's local defaults.
    pub docker_host: Option<String>,
    /// Conditions in evaluation order.
    pub conditions: Vec<ConditionConfig>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL_SECS,
            poll_delay_secs: constants::DEFAULT_POLL_DELAY_SECS,
            docker_host: None,
            conditions: Vec::new(),
        }
    }
}

impl GateConfig {
    /// Loads a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`GateConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReadyGateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the gate meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ReadyGateError::Config`] for a zero poll interval or a
    /// condition with an empty container name.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(ReadyGateError::Config {
                message: "poll_interval_secs must be greater than zero".to_string(),
            });
        }
        if let Some(index) = self
            .conditions
            .iter()
            .position(|c| c.container.as_str().trim().is_empty())
        {
            return Err(ReadyGateError::Config {
                message: format!("condition #{index} has an empty container name"),
            });
        }
        Ok(())
    }
}
