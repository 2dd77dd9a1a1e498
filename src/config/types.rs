//! Configuration data types for the Docker provider.

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::ConfigError;

/// Docker discovery configuration.
///
/// Read-only once a provider has been built from it.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct DockerProviderConfig {
    /// Container names ignored by both event watching and route listing.
    pub excludes: Vec<String>,

    /// Name of the network whose container address is used for routing.
    #[default(_code = "String::from(\"bridge\")")]
    pub network: String,

    /// The container engine socket path or URL.
    ///
    /// When unset the engine endpoint is resolved from `DOCKER_HOST`,
    /// `CONTAINER_HOST`, `PODMAN_HOST` and finally the platform default.
    pub engine_socket: Option<String>,
}

impl DockerProviderConfig {
    /// Validates the configuration before a provider is built from it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `network` is empty or
    /// whitespace-only, and `ConfigError::InvalidValue` when an exclusion
    /// entry is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("network"),
            });
        }

        if self.excludes.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: String::from("excludes"),
                reason: String::from("entries cannot be blank"),
            });
        }

        Ok(())
    }

    /// Return the configured engine socket, treating blank values as unset.
    #[must_use]
    pub fn engine_socket(&self) -> Option<&str> {
        self.engine_socket
            .as_deref()
            .filter(|socket| !socket.trim().is_empty())
    }
}
