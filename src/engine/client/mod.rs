//! Runtime client seam used by the discovery provider.
//!
//! The provider only needs two engine operations: enumerate running
//! containers and subscribe to lifecycle events. [`RuntimeClient`] captures
//! exactly that, with engine-neutral record types, so listing and watching
//! logic stays testable without a running daemon. The production
//! implementation is `bollard::Docker`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use bollard::Docker;
use bollard::models::{ContainerSummary, EventMessage};
use bollard::query_parameters::{EventsOptionsBuilder, ListContainersOptionsBuilder};
use futures_util::{Stream, StreamExt};

use crate::error::ContainerError;

/// Boxed future returned by [`RuntimeClient::list_running_containers`].
pub type ListContainersFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ContainerRecord>, ContainerError>> + Send + 'a>>;

/// Live feed of runtime events returned by [`RuntimeClient::subscribe_events`].
pub type RuntimeEventStream<'a> =
    Pin<Box<dyn Stream<Item = Result<RuntimeEvent, ContainerError>> + Send + 'a>>;

/// A container as reported by the engine's listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Engine-assigned container ID.
    pub id: String,

    /// Container names; the first one is canonical. Docker prefixes names
    /// with `/`.
    pub names: Vec<String>,

    /// Lifecycle status, expressed in the event status vocabulary.
    pub status: String,

    /// Creation time in seconds since the Unix epoch.
    pub created: i64,

    /// Address of the container on each network it is attached to.
    pub networks: HashMap<String, String>,

    /// Container labels.
    pub labels: HashMap<String, String>,

    /// Exposed port mappings in engine order.
    pub ports: Vec<PortMapping>,
}

/// One exposed port of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    /// Port inside the container.
    pub private_port: u16,

    /// Port published on the host, if any.
    pub public_port: Option<u16>,
}

/// A lifecycle event emitted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEvent {
    /// Type of object the event concerns (`container`, `network`, ...).
    pub resource_type: String,

    /// What happened (`start`, `die`, ...).
    pub status: String,

    /// Actor attributes; containers carry their `name` here.
    pub attributes: HashMap<String, String>,
}

/// Behaviour required from a container engine client.
///
/// Implementations must be safe to share between a listing call and an
/// open event subscription.
pub trait RuntimeClient {
    /// Enumerate containers that are currently running.
    fn list_running_containers(&self) -> ListContainersFuture<'_>;

    /// Open a live subscription to engine events.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::SubscribeFailed` when the subscription cannot
    /// be set up. Clients that connect lazily report the same failure as the
    /// first item of the stream instead; later stream failures are
    /// `ContainerError::EventStreamFailed`.
    fn subscribe_events(&self) -> Result<RuntimeEventStream<'_>, ContainerError>;
}

impl RuntimeClient for Docker {
    fn list_running_containers(&self) -> ListContainersFuture<'_> {
        Box::pin(async move {
            let options = ListContainersOptionsBuilder::new().all(false).build();
            let summaries = Self::list_containers(self, Some(options))
                .await
                .map_err(|error| ContainerError::ListFailed {
                    message: error.to_string(),
                })?;

            Ok(summaries.into_iter().map(container_record).collect())
        })
    }

    fn subscribe_events(&self) -> Result<RuntimeEventStream<'_>, ContainerError> {
        let options = EventsOptionsBuilder::new().build();
        // Bollard connects on first poll, so a failure before any event
        // arrives is a failed subscription.
        let events = Self::events(self, Some(options))
            .enumerate()
            .map(|(position, item)| {
                item.map(runtime_event)
                    .map_err(|error| stream_failure(position, error.to_string()))
            });

        Ok(Box::pin(events))
    }
}

/// Translate a listing state into the lifecycle event vocabulary.
///
/// Docker reports `running`/`restarting` in listings but `start`/`restart`
/// in events; other states pass through unchanged.
fn lifecycle_status(state: &str) -> String {
    match state {
        "running" => String::from("start"),
        "restarting" => String::from("restart"),
        other => other.to_owned(),
    }
}

fn container_record(summary: ContainerSummary) -> ContainerRecord {
    let networks = summary
        .network_settings
        .and_then(|settings| settings.networks)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, endpoint)| (name, endpoint.ip_address.unwrap_or_default()))
        .collect();

    let ports = summary
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|port| PortMapping {
            private_port: port.private_port,
            public_port: port.public_port,
        })
        .collect();

    ContainerRecord {
        id: summary.id.unwrap_or_default(),
        names: summary.names.unwrap_or_default(),
        status: summary
            .state
            .map(|state| lifecycle_status(state.as_ref()))
            .unwrap_or_default(),
        created: summary.created.unwrap_or_default(),
        networks,
        labels: summary.labels.unwrap_or_default(),
        ports,
    }
}

fn stream_failure(position: usize, message: String) -> ContainerError {
    if position == 0 {
        ContainerError::SubscribeFailed { message }
    } else {
        ContainerError::EventStreamFailed { message }
    }
}

fn runtime_event(message: EventMessage) -> RuntimeEvent {
    RuntimeEvent {
        resource_type: message
            .typ
            .map(|typ| typ.to_string())
            .unwrap_or_default(),
        status: message.action.unwrap_or_default(),
        attributes: message
            .actor
            .and_then(|actor| actor.attributes)
            .unwrap_or_default(),
    }
}
