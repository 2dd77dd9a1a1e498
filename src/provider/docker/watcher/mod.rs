//! Background watcher turning engine lifecycle events into change signals.
//!
//! The watcher keeps one event subscription open for as long as its
//! [`Lifetime`] lasts. A failed or closed subscription is reopened after
//! [`RESTART_DELAY`]; only the end of the lifetime (or the consumer dropping
//! its feed) stops it.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::feed::{ChangeFeed, ChangeSender, change_channel};
use super::{DiscoveryScope, Lifetime, container_name};
use crate::engine::{RuntimeClient, RuntimeEvent};
use crate::error::WatchError;

/// Pause before resubscribing after a transient failure.
pub(super) const RESTART_DELAY: Duration = Duration::from_millis(100);

const CONTAINER_RESOURCE: &str = "container";

/// Start a watcher task and return the feed it publishes to.
pub(super) fn spawn<C>(
    runtime: &Handle,
    client: Arc<C>,
    scope: Arc<DiscoveryScope>,
    lifetime: Lifetime,
) -> ChangeFeed
where
    C: RuntimeClient + Send + Sync + 'static,
{
    let (sender, feed) = change_channel();
    runtime.spawn(async move {
        supervise(client.as_ref(), &scope, &sender, &lifetime).await;
    });
    feed
}

/// Run watch passes until one ends permanently.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "false positive triggered inside tokio::select! expansion"
)]
async fn supervise<C: RuntimeClient + ?Sized>(
    client: &C,
    scope: &DiscoveryScope,
    sender: &ChangeSender,
    lifetime: &Lifetime,
) {
    loop {
        let error = watch(client, scope, sender, lifetime).await;
        if error.is_permanent() {
            debug!(reason = %error, "docker events watcher stopped");
            return;
        }

        warn!(error = %error, "docker events listener failed, restarting");
        tokio::select! {
            biased;
            reason = lifetime.ended() => {
                debug!(reason = %reason, "docker events watcher stopped");
                return;
            }
            () = tokio::time::sleep(RESTART_DELAY) => {}
        }
    }
}

/// One subscription pass; returns why it ended.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "false positive triggered inside tokio::select! expansion"
)]
async fn watch<C: RuntimeClient + ?Sized>(
    client: &C,
    scope: &DiscoveryScope,
    sender: &ChangeSender,
    lifetime: &Lifetime,
) -> WatchError {
    let mut events = match client.subscribe_events() {
        Ok(events) => events,
        Err(error) => return WatchError::Subscribe(error),
    };

    loop {
        let next = tokio::select! {
            biased;
            reason = lifetime.ended() => return reason,
            next = events.next() => next,
        };

        let event = match next {
            Some(Ok(event)) => event,
            Some(Err(error)) => return WatchError::Stream(error),
            None => return WatchError::StreamClosed,
        };

        if !signals_change(&event, scope) {
            continue;
        }

        tokio::select! {
            biased;
            reason = lifetime.ended() => return reason,
            sent = sender.send() => {
                if let Err(error) = sent {
                    return error;
                }
            }
        }
    }
}

/// Returns `true` when `event` is a start/stop transition of a container
/// that is not excluded.
fn signals_change(event: &RuntimeEvent, scope: &DiscoveryScope) -> bool {
    if event.resource_type != CONTAINER_RESOURCE {
        return false;
    }

    let Some(transition) = scope.statuses().classify(&event.status) else {
        return false;
    };
    debug!(status = %event.status, ?transition, "api event");

    let name = event
        .attributes
        .get("name")
        .map_or("", |raw| container_name(raw));
    if scope.is_excluded(name) {
        debug!(container = name, "container excluded");
        return false;
    }

    info!(container = name, status = %event.status, "new event");
    true
}
