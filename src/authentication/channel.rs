//! Single-delivery result channel
//!
//! Each login attempt gets a fresh channel. [`OutcomeSender::post`] consumes the
//! sender, so at most one outcome can ever be written for an attempt. When an
//! attempt ends without an outcome the sender is dropped and the receiver
//! observes a closed channel.

use crate::models::Outcome;
use tokio::sync::oneshot;

/// What a receiver currently sees
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The attempt posted its outcome
    Delivered(Outcome),
    /// The attempt is still running
    Pending,
    /// The attempt ended without posting, or the outcome was already taken
    Closed,
}

/// Create a sender/receiver pair for one attempt
#[must_use]
pub fn channel() -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    (OutcomeSender { inner: tx }, OutcomeReceiver { inner: rx })
}

/// Write half, used once by the flow
#[derive(Debug)]
pub struct OutcomeSender {
    inner: oneshot::Sender<Outcome>,
}

impl OutcomeSender {
    /// Post the outcome of the attempt
    pub fn post(self, outcome: Outcome) {
        if self.inner.send(outcome).is_err() {
            log::debug!("Login outcome dropped: receiver no longer listening");
        }
    }
}

/// Read half, handed to the caller
#[derive(Debug)]
pub struct OutcomeReceiver {
    inner: oneshot::Receiver<Outcome>,
}

impl OutcomeReceiver {
    /// Wait for the outcome.
    ///
    /// Returns `None` if the attempt ended without posting one.
    pub async fn recv(self) -> Option<Outcome> {
        self.inner.await.ok()
    }

    /// Check for the outcome without waiting
    pub fn try_recv(&mut self) -> Delivery {
        match self.inner.try_recv() {
            Ok(outcome) => Delivery::Delivered(outcome),
            Err(oneshot::error::TryRecvError::Empty) => Delivery::Pending,
            Err(oneshot::error::TryRecvError::Closed) => Delivery::Closed,
        }
    }
}
