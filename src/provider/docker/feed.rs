//! Rendezvous hand-off of change signals from the watcher to its consumer.
//!
//! Each signal travels as a one-shot acknowledgement channel. The watcher
//! waits until the consumer has taken the signal, so an idle consumer stalls
//! the watcher instead of letting signals pile up.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::Stream;
use tokio::sync::{mpsc, oneshot};

use crate::error::WatchError;

type Ack = oneshot::Sender<()>;

/// Create a connected sender/feed pair.
pub(super) fn change_channel() -> (ChangeSender, ChangeFeed) {
    let (tx, rx) = mpsc::channel(1);
    (ChangeSender { tx }, ChangeFeed { rx })
}

/// Watcher side of the hand-off.
#[derive(Debug)]
pub(super) struct ChangeSender {
    tx: mpsc::Sender<Ack>,
}

impl ChangeSender {
    /// Hand one signal over and wait until the consumer has accepted it.
    pub(super) async fn send(&self) -> Result<(), WatchError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(ack_tx)
            .await
            .map_err(|_| WatchError::ReceiverDropped)?;
        ack_rx.await.map_err(|_| WatchError::ReceiverDropped)
    }
}

/// Receive side of a watcher's change signals.
///
/// Each item means "the running inventory may have changed; list again".
/// The feed ends exactly once, when the watcher's
/// [`Lifetime`](super::Lifetime) ends.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: mpsc::Receiver<Ack>,
}

impl ChangeFeed {
    /// A feed whose watcher has already stopped.
    pub(super) fn closed() -> Self {
        let (_, feed) = change_channel();
        feed
    }

    /// Wait for the next change signal.
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<()> {
        while let Some(ack) = self.rx.recv().await {
            // The watcher abandons a hand-off only when it is shutting down.
            if ack.send(()).is_ok() {
                return Some(());
            }
        }
        None
    }
}

impl Stream for ChangeFeed {
    type Item = ();

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        while let Some(ack) = ready!(self.rx.poll_recv(cx)) {
            if ack.send(()).is_ok() {
                return Poll::Ready(Some(()));
            }
        }
        Poll::Ready(None)
    }
}
