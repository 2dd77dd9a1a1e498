//! Translation of running containers into routing rules.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use super::{DiscoveryScope, container_name};
use crate::discovery::RoutingRule;
use crate::engine::{ContainerRecord, RuntimeClient};
use crate::error::DiscoveryError;

/// Label replacing the default source pattern.
pub const ROUTE_LABEL: &str = "dpx.route";

/// Label replacing the default destination path.
pub const DEST_LABEL: &str = "dpx.dest";

/// Label restricting the rule to one server name.
pub const SERVER_LABEL: &str = "dpx.server";

/// A running container that passed every filter.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContainerSnapshot {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    labels: HashMap<String, String>,
    ip: String,
    port: u16,
}

/// List running containers and derive one rule per eligible container.
pub(super) async fn list_rules<C: RuntimeClient + ?Sized>(
    client: &C,
    scope: &DiscoveryScope,
) -> Result<Vec<RoutingRule>, DiscoveryError> {
    let records = client
        .list_running_containers()
        .await
        .map_err(|source| DiscoveryError::ListContainers { source })?;
    debug!(total = records.len(), "listed containers");

    let rules = records
        .into_iter()
        .filter_map(|record| snapshot(record, scope))
        .map(|container| routing_rule(&container))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rules = rules.len(), "completed list");
    Ok(rules)
}

/// Apply the listing filters; `None` means the container is skipped.
fn snapshot(record: ContainerRecord, scope: &DiscoveryScope) -> Option<ContainerSnapshot> {
    if !scope.statuses().is_up(&record.status) {
        debug!(id = %record.id, status = %record.status, "container not up");
        return None;
    }

    let Some(name) = record.names.first().map(|raw| container_name(raw).to_owned()) else {
        debug!(id = %record.id, "container has no name");
        return None;
    };
    if scope.is_excluded(&name) {
        debug!(container = %name, "container excluded");
        return None;
    }

    let Some(ip) = record
        .networks
        .get(scope.network())
        .filter(|ip| !ip.is_empty())
        .cloned()
    else {
        debug!(container = %name, network = scope.network(), "container not on network");
        return None;
    };

    let Some(port) = record.ports.first().map(|mapping| mapping.private_port) else {
        debug!(container = %name, "container exposes no ports");
        return None;
    };

    let container = ContainerSnapshot {
        id: record.id,
        name,
        created_at: DateTime::from_timestamp(record.created, 0).unwrap_or_default(),
        labels: record.labels,
        ip,
        port,
    };
    debug!(
        container = %container.name,
        id = %container.id,
        created = %container.created_at,
        ip = %container.ip,
        port = container.port,
        "running container added"
    );
    Some(container)
}

/// Build the rule for one container, applying label overrides.
fn routing_rule(container: &ContainerSnapshot) -> Result<RoutingRule, DiscoveryError> {
    let ContainerSnapshot {
        name,
        labels,
        ip,
        port,
        ..
    } = container;

    let src = labels
        .get(ROUTE_LABEL)
        .cloned()
        .unwrap_or_else(|| format!("^/api/{name}/(.*)"));
    // A label destination is a plain path; only the default carries `$1`.
    let dst = labels.get(DEST_LABEL).map_or_else(
        || format!("http://{ip}:{port}/$1"),
        |path| format!("http://{ip}:{port}{path}"),
    );
    let server = labels
        .get(SERVER_LABEL)
        .map_or(RoutingRule::ANY_SERVER, String::as_str);

    let src_match = Regex::new(&src).map_err(|source| DiscoveryError::InvalidSourcePattern {
        pattern: src.clone(),
        container: name.clone(),
        source,
    })?;

    Ok(RoutingRule::new(server, src_match, dst))
}
