//! Semantic error types for the Docker discovery provider.
//!
//! Conditions a caller might inspect or retry are modelled as `thiserror`
//! enums grouped by concern and aggregated into [`ProviderError`]. Failures
//! inside the background event watcher never reach the caller; they are
//! classified by [`WatchError`] so the watcher can tell a permanent stop from
//! a transient fault.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration value is missing or blank.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Errors reported by the container engine client.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The engine rejected or failed a container listing request.
    #[error("container listing failed: {message}")]
    ListFailed {
        /// A description of the listing failure.
        message: String,
    },

    /// The engine refused to open an event subscription.
    #[error("event subscription failed: {message}")]
    SubscribeFailed {
        /// A description of the subscription failure.
        message: String,
    },

    /// An open event subscription reported a transport failure.
    #[error("event stream failed: {message}")]
    EventStreamFailed {
        /// A description of the stream failure.
        message: String,
    },
}

/// Errors returned by a route listing call.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Enumerating running containers failed.
    #[error("can't list containers: {source}")]
    ListContainers {
        /// The engine failure.
        source: ContainerError,
    },

    /// A container's source pattern could not be compiled.
    #[error("invalid src regex '{pattern}' for container '{container}': {source}")]
    InvalidSourcePattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The name of the container that supplied the pattern.
        container: String,
        /// The compilation failure.
        source: regex::Error,
    },
}

/// Reasons a single pass of the event watcher ended.
///
/// Only [`WatchError::Cancelled`], [`WatchError::DeadlineExceeded`] and
/// [`WatchError::ReceiverDropped`] stop the watcher; every other variant is
/// retried after a short delay.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The watcher's lifetime was cancelled.
    #[error("watcher lifetime cancelled")]
    Cancelled,

    /// The watcher's lifetime deadline passed.
    #[error("watcher lifetime deadline exceeded")]
    DeadlineExceeded,

    /// The consumer dropped its change feed.
    #[error("change feed receiver dropped")]
    ReceiverDropped,

    /// Opening the engine event subscription failed.
    #[error("can't add event listener: {0}")]
    Subscribe(ContainerError),

    /// The engine event subscription reported a failure.
    #[error("events stream failed: {0}")]
    Stream(ContainerError),

    /// The engine event subscription ended without cancellation.
    #[error("events closed")]
    StreamClosed,
}

impl WatchError {
    /// Returns `true` when the watcher must stop instead of reconnecting.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::DeadlineExceeded | Self::ReceiverDropped
        )
    }
}

/// Top-level error type for the provider's public operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred talking to the container engine.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// An error occurred while deriving routing rules.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The event watcher was started outside a Tokio runtime.
    #[error("event watcher requires a Tokio runtime: {source}")]
    NoRuntime {
        /// The runtime lookup failure.
        #[from]
        source: tokio::runtime::TryCurrentError,
    },
}

/// A specialised `Result` type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
