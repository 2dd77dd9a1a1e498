//! Docker discovery provider.
//!
//! Derives routing rules from running containers and watches the engine for
//! lifecycle changes. By default a container named `web` on network address
//! `172.17.0.3` exposing private port `8080` is routed as
//! `^/api/web/(.*)` → `http://172.17.0.3:8080/$1`.
//!
//! Container labels override the defaults:
//!
//! - `dpx.route`: source pattern, used verbatim as a regular expression
//! - `dpx.dest`: destination path appended to `http://<ip>:<port>`
//! - `dpx.server`: server name the rule is restricted to
//!
//! The two halves are independent. [`DockerProvider::list`] is called on
//! the consumer's schedule; [`DockerProvider::events`] starts a background
//! watcher whose signals tell the consumer when to call `list` again.

mod feed;
mod lifetime;
mod mapper;
mod watcher;

use std::collections::HashSet;
use std::sync::Arc;

use bollard::Docker;

use crate::config::DockerProviderConfig;
use crate::discovery::{ProviderId, RoutingRule, StatusVocabulary};
use crate::engine::{EngineConnector, RuntimeClient, SocketResolver};
use crate::error::Result;

pub use feed::ChangeFeed;
pub use lifetime::Lifetime;
pub use mapper::{DEST_LABEL, ROUTE_LABEL, SERVER_LABEL};

/// Read-only settings shared by the watcher and the mapper.
#[derive(Debug)]
struct DiscoveryScope {
    excludes: HashSet<String>,
    network: String,
    statuses: StatusVocabulary,
}

impl DiscoveryScope {
    fn new(config: &DockerProviderConfig, statuses: StatusVocabulary) -> Self {
        Self {
            excludes: config.excludes.iter().cloned().collect(),
            network: config.network.clone(),
            statuses,
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excludes.contains(name)
    }

    fn network(&self) -> &str {
        &self.network
    }

    const fn statuses(&self) -> StatusVocabulary {
        self.statuses
    }
}

/// Strip the leading `/` Docker adds to container names.
fn container_name(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}

/// Discovery provider backed by a container engine.
///
/// The client is shared between listing calls and the watcher task, so it
/// must tolerate concurrent use.
pub struct DockerProvider<C = Docker> {
    client: Arc<C>,
    scope: Arc<DiscoveryScope>,
}

impl<C: RuntimeClient> DockerProvider<C> {
    /// Build a provider using Docker's status vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn new(client: C, config: &DockerProviderConfig) -> Result<Self> {
        Self::with_statuses(client, config, StatusVocabulary::DOCKER)
    }

    /// Build a provider with an explicit status vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn with_statuses(
        client: C,
        config: &DockerProviderConfig,
        statuses: StatusVocabulary,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: Arc::new(client),
            scope: Arc::new(DiscoveryScope::new(config, statuses)),
        })
    }

    /// Snapshot running containers and translate them into routing rules.
    ///
    /// Rules come back in the order the engine listed the containers.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ListContainers` when the engine listing
    /// fails and `DiscoveryError::InvalidSourcePattern` when any container's
    /// source pattern does not compile. No partial rule set is returned.
    pub async fn list(&self) -> Result<Vec<RoutingRule>> {
        Ok(mapper::list_rules(self.client.as_ref(), &self.scope).await?)
    }

    /// Blocking variant of [`Self::list`] for callers outside async code.
    ///
    /// # Errors
    ///
    /// See [`Self::list`].
    pub fn list_blocking(&self, runtime: &tokio::runtime::Handle) -> Result<Vec<RoutingRule>> {
        runtime.block_on(self.list())
    }

    /// Provider kind tag.
    #[must_use]
    pub const fn id(&self) -> ProviderId {
        ProviderId::Docker
    }
}

impl<C: RuntimeClient + Send + Sync + 'static> DockerProvider<C> {
    /// Start watching engine events in a background task.
    ///
    /// The returned feed yields one item per relevant container start/stop
    /// event and ends once `lifetime` ends. Transient engine failures are
    /// logged and retried; they never end the feed. A lifetime that has
    /// already ended yields a closed feed without starting a task.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NoRuntime` when called outside a Tokio
    /// runtime.
    pub fn events(&self, lifetime: Lifetime) -> Result<ChangeFeed> {
        let runtime = tokio::runtime::Handle::try_current()?;
        if lifetime.is_ended() {
            return Ok(ChangeFeed::closed());
        }
        Ok(watcher::spawn(
            &runtime,
            Arc::clone(&self.client),
            Arc::clone(&self.scope),
            lifetime,
        ))
    }
}

impl DockerProvider<Docker> {
    /// Connect to the engine named by `config` (or the environment) and build
    /// a provider on top of it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation and
    /// `ContainerError` when the engine client cannot be created.
    pub fn connect<E: mockable::Env>(config: &DockerProviderConfig, env: &E) -> Result<Self> {
        config.validate()?;
        let resolver = SocketResolver::new(env);
        let docker = EngineConnector::connect_with_fallback(config.engine_socket(), &resolver)?;
        Self::new(docker, config)
    }
}
