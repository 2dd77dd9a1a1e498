//! Assertion helpers for route discovery behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{ListingResult, RouteDiscoveryState, RuleView};

fn listed_rules(route_discovery_state: &RouteDiscoveryState) -> StepResult<Vec<RuleView>> {
    match route_discovery_state
        .result
        .get()
        .ok_or_else(|| String::from("result should be set"))?
    {
        ListingResult::Rules(rules) => Ok(rules),
        ListingResult::Err(msg) => Err(format!("expected rules, got error: {msg}")),
    }
}

fn nth_rule(route_discovery_state: &RouteDiscoveryState, index: usize) -> StepResult<RuleView> {
    let rules = listed_rules(route_discovery_state)?;
    index
        .checked_sub(1)
        .and_then(|position| rules.get(position).cloned())
        .ok_or_else(|| format!("rule {index} missing from {} rules", rules.len()))
}

fn assert_rule_count(
    route_discovery_state: &RouteDiscoveryState,
    expected: usize,
) -> StepResult<()> {
    let rules = listed_rules(route_discovery_state)?;
    if rules.len() == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} rules, got {rules:?}"))
    }
}

#[then("{count} rule is returned")]
fn one_rule_is_returned(
    route_discovery_state: &RouteDiscoveryState,
    count: usize,
) -> StepResult<()> {
    assert_rule_count(route_discovery_state, count)
}

#[then("{count} rules are returned")]
fn rules_are_returned(route_discovery_state: &RouteDiscoveryState, count: usize) -> StepResult<()> {
    assert_rule_count(route_discovery_state, count)
}

#[then("rule {index} has source {src} and destination {dst}")]
fn rule_has_source_and_destination(
    route_discovery_state: &RouteDiscoveryState,
    index: usize,
    src: String,
    dst: String,
) -> StepResult<()> {
    let rule = nth_rule(route_discovery_state, index)?;
    if rule.src == src && rule.dst == dst {
        Ok(())
    } else {
        Err(format!(
            "expected {src} -> {dst}, got {} -> {}",
            rule.src, rule.dst
        ))
    }
}

#[then("rule {index} applies to server {server}")]
fn rule_applies_to_server(
    route_discovery_state: &RouteDiscoveryState,
    index: usize,
    server: String,
) -> StepResult<()> {
    let rule = nth_rule(route_discovery_state, index)?;
    if rule.server == server {
        Ok(())
    } else {
        Err(format!("expected server {server}, got {}", rule.server))
    }
}

#[then("listing fails with an error mentioning {text}")]
fn listing_fails(route_discovery_state: &RouteDiscoveryState, text: String) -> StepResult<()> {
    match route_discovery_state
        .result
        .get()
        .ok_or_else(|| String::from("result should be set"))?
    {
        ListingResult::Err(msg) if msg.contains(&text) => Ok(()),
        ListingResult::Err(msg) => Err(format!("expected error mentioning {text}, got: {msg}")),
        ListingResult::Rules(rules) => Err(format!("expected an error, got rules: {rules:?}")),
    }
}
