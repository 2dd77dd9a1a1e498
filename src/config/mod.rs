//! Configuration for the Docker discovery provider.
//!
//! The provider does not load configuration itself. The host service embeds
//! [`DockerProviderConfig`] in its own configuration (TOML, environment, CLI)
//! and hands the merged value to
//! [`DockerProvider::new`](crate::provider::docker::DockerProvider::new).
//!
//! # Example Configuration
//!
//! ```toml
//! [docker]
//! network = "proxy"
//! excludes = ["dpx", "postgres"]
//! engine_socket = "unix:///var/run/docker.sock"
//! ```

mod types;


pub use types::DockerProviderConfig;
