//! Scenario state for route discovery behavioural tests.

use dpx_docker::discovery::RoutingRule;
use dpx_docker::engine::ContainerRecord;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// A routing rule reduced to comparable strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleView {
    pub(crate) server: String,
    pub(crate) src: String,
    pub(crate) dst: String,
}

impl From<&RoutingRule> for RuleView {
    fn from(rule: &RoutingRule) -> Self {
        Self {
            server: rule.server().to_owned(),
            src: rule.src_match().as_str().to_owned(),
            dst: rule.dst().to_owned(),
        }
    }
}

/// Outcome of a listing call.
#[derive(Debug, Clone)]
pub(crate) enum ListingResult {
    /// The provider returned rules.
    Rules(Vec<RuleView>),
    /// The provider returned an error.
    Err(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct RouteDiscoveryState {
    pub(crate) network: Slot<String>,
    pub(crate) excludes: Slot<Vec<String>>,
    pub(crate) containers: Slot<Vec<ContainerRecord>>,
    pub(crate) listing_fails: Slot<bool>,
    pub(crate) result: Slot<ListingResult>,
}

#[fixture]
pub(crate) fn route_discovery_state() -> RouteDiscoveryState {
    let state = RouteDiscoveryState::default();
    state.network.set(String::from("bridge"));
    state.excludes.set(Vec::new());
    state.containers.set(Vec::new());
    state.listing_fails.set(false);
    state
}
