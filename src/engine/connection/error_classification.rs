//! Maps `Bollard` connection failures onto semantic `ContainerError` values.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ContainerError;

/// Filesystem path behind a `unix://` or `npipe://` endpoint.
///
/// HTTP endpoints and bare paths have no reliable path and yield `None`.
pub(super) fn socket_path(socket_uri: &str) -> Option<&Path> {
    socket_uri
        .strip_prefix("unix://")
        .or_else(|| socket_uri.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Classify a `Bollard` connection error for the endpoint it was opened on.
pub(super) fn classify_connection_error(
    error: &bollard::errors::Error,
    socket_uri: &str,
) -> ContainerError {
    let kind = match error {
        bollard::errors::Error::SocketNotFoundError(_) => Some(ErrorKind::NotFound),
        bollard::errors::Error::IOError { err } => {
            Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()))
        }
        other => io_error_kind_in_chain(other),
    };

    classify_kind(kind, socket_path(socket_uri), error.to_string())
}

fn classify_kind(kind: Option<ErrorKind>, path: Option<&Path>, message: String) -> ContainerError {
    match (kind, path) {
        (Some(ErrorKind::NotFound), Some(socket)) => ContainerError::SocketNotFound {
            path: socket.to_path_buf(),
        },
        (Some(ErrorKind::PermissionDenied), Some(socket)) => ContainerError::PermissionDenied {
            path: socket.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed { message },
    }
}

/// First `io::Error` kind found below `error` in its source chain.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    std::iter::successors(error.source(), |err| err.source())
        .find_map(|err| err.downcast_ref::<std::io::Error>())
        .map(std::io::Error::kind)
}
