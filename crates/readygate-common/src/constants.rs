//! Default values shared by the library and the CLI.

/// Default total budget for the whole gate, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default pause between two probes of the same container, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default pause before the first probe of each container, in seconds.
pub const DEFAULT_POLL_DELAY_SECS: u64 = 0;

/// Request timeout handed to the Docker client, in seconds.
pub const DOCKER_CLIENT_TIMEOUT_SECS: u64 = 120;

/// Environment variable overriding the Docker endpoint.
pub const DOCKER_HOST_ENV: &str = "READYGATE_DOCKER_HOST";

/// Application name used in CLI output.
pub const APP_NAME: &str = "readygate";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "readygate";
