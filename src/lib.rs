//! Docker discovery provider for a URL-routing reverse proxy.
//!
//! `dpx-docker` watches a Docker (or Podman) engine and derives routing
//! rules from the containers it runs. A rule maps a request path pattern to a
//! destination URL template on the container's network address.
//!
//! # Architecture
//!
//! The provider exposes two independent halves that the proxy core composes:
//! a synchronous-from-the-caller's-view listing call that snapshots running
//! containers into rules, and a long-lived event watcher that tells the core
//! when to list again. The watcher survives engine restarts and socket drops
//! on its own and stops only when its owner says so.
//!
//! # Modules
//!
//! - [`config`]: Provider configuration embedded by the host service
//! - [`discovery`]: Routing rules and provider identity shared with the consumer
//! - [`engine`]: Engine connection and the runtime client seam
//! - [`error`]: Semantic error types
//! - [`provider`]: The Docker discovery provider itself

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod provider;
