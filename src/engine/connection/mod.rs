//! Socket resolution and container engine connection.
//!
//! Resolves the engine endpoint from configuration, environment variables or
//! the platform default, then opens a `Bollard` client against it.

mod error_classification;

use bollard::Docker;
use tracing::debug;

use crate::error::ContainerError;
use error_classification::classify_connection_error;

/// Environment variable names checked in fallback order after configuration.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

/// Connection timeout in seconds for engine API requests.
///
/// Event subscriptions are long-lived, so this only bounds individual
/// request/response exchanges.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

/// Resolves container engine endpoints from environment variables.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing `mockable::Env`, so lookups
///   can be replaced in tests.
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Returns the first non-empty value of `DOCKER_HOST`, `CONTAINER_HOST`
    /// or `PODMAN_HOST`.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Returns the platform default socket.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }
}

/// Endpoint families understood by the connector.
#[derive(Debug, PartialEq, Eq)]
enum Endpoint {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint (TCP is rewritten to HTTP).
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl Endpoint {
    fn classify(socket: &str) -> Self {
        if socket.starts_with("unix://") || socket.starts_with("npipe://") {
            Self::Socket
        } else if ["tcp://", "http://", "https://"]
            .iter()
            .any(|scheme| socket.starts_with(scheme))
        {
            Self::Http
        } else {
            Self::BarePath
        }
    }
}

/// Opens `Bollard` clients for Docker or Podman engines.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the container engine at `socket`.
    ///
    /// Accepts `unix://`, `npipe://`, `tcp://` (treated as HTTP), `http://`
    /// and `https://` endpoints. Bare paths starting with `\\` or `//` are
    /// treated as named pipes, every other bare path as a Unix socket.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::SocketNotFound` or
    /// `ContainerError::PermissionDenied` when the socket path can be
    /// identified, and `ContainerError::ConnectionFailed` otherwise.
    pub fn connect(socket: &str) -> Result<Docker, ContainerError> {
        debug!(socket, "connecting to container engine");
        let result = match Endpoint::classify(socket) {
            Endpoint::Socket => Docker::connect_with_socket(
                socket,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
            Endpoint::Http => Docker::connect_with_http(
                &Self::normalize_http(socket),
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
            Endpoint::BarePath => Docker::connect_with_socket(
                &Self::normalize_bare_path(socket),
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
        };

        result.map_err(|error| classify_connection_error(&error, socket))
    }

    /// Resolve the endpoint from configuration and environment, then connect.
    ///
    /// # Errors
    ///
    /// See [`Self::connect`].
    pub fn connect_with_fallback<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<Docker, ContainerError> {
        let socket = Self::resolve_socket(config_socket, resolver);
        Self::connect(&socket)
    }

    /// Resolves the endpoint without connecting.
    ///
    /// Resolution order: `config_socket`, then `DOCKER_HOST`,
    /// `CONTAINER_HOST`, `PODMAN_HOST`, then the platform default.
    #[must_use]
    pub fn resolve_socket<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> String {
        config_socket
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.resolve_from_env())
            .unwrap_or_else(|| SocketResolver::<E>::default_socket().to_owned())
    }

    fn normalize_http(socket: &str) -> String {
        socket.strip_prefix("tcp://").map_or_else(
            || socket.to_owned(),
            |address| format!("http://{address}"),
        )
    }

    fn normalize_bare_path(path: &str) -> String {
        if path.starts_with("\\\\") || path.starts_with("//") {
            format!("npipe://{path}")
        } else {
            format!("unix://{path}")
        }
    }
}
