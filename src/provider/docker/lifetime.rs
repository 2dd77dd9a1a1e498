//! Externally owned lifetime of an event watcher.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::WatchError;

/// Cancellation token plus an optional deadline.
///
/// The watcher runs until the token is cancelled or the deadline passes,
/// whichever happens first.
#[derive(Debug, Clone)]
pub struct Lifetime {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Lifetime {
    /// A lifetime that ends only when `token` is cancelled.
    #[must_use]
    pub const fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// End the lifetime at `deadline` at the latest.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// End the lifetime `timeout` from now at the latest.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The underlying cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns `true` once the token is cancelled or the deadline has passed.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.token.is_cancelled()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Resolves when the lifetime ends, reporting why.
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "false positive triggered inside tokio::select! expansion"
    )]
    pub(crate) async fn ended(&self) -> WatchError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.token.cancelled() => WatchError::Cancelled,
                () = tokio::time::sleep_until(deadline) => WatchError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                WatchError::Cancelled
            }
        }
    }
}

impl From<CancellationToken> for Lifetime {
    fn from(token: CancellationToken) -> Self {
        Self::new(token)
    }
}
