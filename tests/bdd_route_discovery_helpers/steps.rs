//! Given/when steps for route discovery scenarios.

use std::collections::HashMap;

use dpx_docker::config::DockerProviderConfig;
use dpx_docker::engine::{
    ContainerRecord, ListContainersFuture, PortMapping, RuntimeClient, RuntimeEventStream,
};
use dpx_docker::error::ContainerError;
use dpx_docker::provider::docker::DockerProvider;
use mockall::mock;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{ListingResult, RouteDiscoveryState, RuleView};

mock! {
    #[derive(Debug)]
    RouteEngine {}

    impl RuntimeClient for RouteEngine {
        fn list_running_containers<'a>(&'a self) -> ListContainersFuture<'a>;
        fn subscribe_events<'a>(&'a self) -> Result<RuntimeEventStream<'a>, ContainerError>;
    }
}

/// Apply `change` to the container named `name`.
fn update_container<F>(
    route_discovery_state: &RouteDiscoveryState,
    name: &str,
    change: F,
) -> StepResult<()>
where
    F: FnOnce(&mut ContainerRecord),
{
    let mut containers = route_discovery_state.containers.get().unwrap_or_default();
    let record = containers
        .iter_mut()
        .find(|record| record.names.iter().any(|n| n.trim_start_matches('/') == name))
        .ok_or_else(|| format!("container {name} should be declared first"))?;
    change(record);
    route_discovery_state.containers.set(containers);
    Ok(())
}

#[given("a running container named {name} at {ip} exposing port {port}")]
fn running_container(
    route_discovery_state: &RouteDiscoveryState,
    name: String,
    ip: String,
    port: u16,
) {
    let mut containers = route_discovery_state.containers.get().unwrap_or_default();
    containers.push(ContainerRecord {
        id: format!("{name}-0001"),
        names: vec![format!("/{name}")],
        status: String::from("start"),
        created: 1_700_000_000,
        networks: HashMap::from([(String::from("bridge"), ip)]),
        labels: HashMap::new(),
        ports: vec![PortMapping {
            private_port: port,
            public_port: None,
        }],
    });
    route_discovery_state.containers.set(containers);
}

#[given("container {name} has label {key} set to {value}")]
fn container_label(
    route_discovery_state: &RouteDiscoveryState,
    name: String,
    key: String,
    value: String,
) -> StepResult<()> {
    update_container(route_discovery_state, &name, |record| {
        record.labels.insert(key, value);
    })
}

#[given("container {name} is attached to network {network}")]
fn container_network(
    route_discovery_state: &RouteDiscoveryState,
    name: String,
    network: String,
) -> StepResult<()> {
    update_container(route_discovery_state, &name, |record| {
        record.networks = record
            .networks
            .drain()
            .map(|(_, address)| (network.clone(), address))
            .collect();
    })
}

#[given("container {name} has no exposed ports")]
fn container_without_ports(
    route_discovery_state: &RouteDiscoveryState,
    name: String,
) -> StepResult<()> {
    update_container(route_discovery_state, &name, |record| record.ports.clear())
}

#[given("container {name} is excluded")]
fn container_excluded(route_discovery_state: &RouteDiscoveryState, name: String) {
    let mut excludes = route_discovery_state.excludes.get().unwrap_or_default();
    excludes.push(name);
    route_discovery_state.excludes.set(excludes);
}

#[given("the provider network is {network}")]
fn provider_network(route_discovery_state: &RouteDiscoveryState, network: String) {
    route_discovery_state.network.set(network);
}

#[given("the engine listing fails")]
fn engine_listing_fails(route_discovery_state: &RouteDiscoveryState) {
    route_discovery_state.listing_fails.set(true);
}

fn engine_for(route_discovery_state: &RouteDiscoveryState) -> MockRouteEngine {
    let containers = route_discovery_state.containers.get().unwrap_or_default();
    let fails = route_discovery_state.listing_fails.get().unwrap_or(false);

    let mut engine = MockRouteEngine::new();
    engine
        .expect_list_running_containers()
        .times(1)
        .returning(move || {
            let listed = containers.clone();
            Box::pin(async move {
                if fails {
                    Err(ContainerError::ListFailed {
                        message: String::from("daemon unavailable"),
                    })
                } else {
                    Ok(listed)
                }
            })
        });
    engine
}

#[when("routes are listed")]
fn routes_are_listed(route_discovery_state: &RouteDiscoveryState) -> StepResult<()> {
    let config = DockerProviderConfig {
        excludes: route_discovery_state.excludes.get().unwrap_or_default(),
        network: route_discovery_state
            .network
            .get()
            .ok_or_else(|| String::from("network should be configured"))?,
        engine_socket: None,
    };
    let provider = DockerProvider::new(engine_for(route_discovery_state), &config)
        .map_err(|e| format!("failed to build provider: {e}"))?;

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let result = match provider.list_blocking(runtime.handle()) {
        Ok(rules) => ListingResult::Rules(rules.iter().map(RuleView::from).collect()),
        Err(e) => ListingResult::Err(e.to_string()),
    };
    route_discovery_state.result.set(result);
    Ok(())
}
