//! Container engine connection and the runtime client seam.
//!
//! The engine endpoint is resolved through a priority-based fallback chain:
//!
//! 1. `engine_socket` from [`DockerProviderConfig`](crate::config::DockerProviderConfig)
//! 2. `DOCKER_HOST` environment variable
//! 3. `CONTAINER_HOST` environment variable
//! 4. `PODMAN_HOST` environment variable
//! 5. Platform default (`/var/run/docker.sock` on Unix)

mod client;
mod connection;

pub use client::{
    ContainerRecord, ListContainersFuture, PortMapping, RuntimeClient, RuntimeEvent,
    RuntimeEventStream,
};
pub use connection::{EngineConnector, SocketResolver};
