//! Replay channel ports - fan-out of selected history entries.
//!
//! Selecting a past entry publishes a [`ReplayEvent`]; every mounted tool
//! page holds a [`ReplaySubscription`] and receives the same event
//! (broadcast, not queue). There is no acknowledgment and no backpressure:
//! a slow subscriber skips what it missed.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::domain::history::ReplayEvent;

/// Publishes replay events to every current subscriber.
pub trait ReplayPublisher: Send + Sync {
    /// Returns the number of subscribers reached.
    fn publish(&self, event: ReplayEvent) -> usize;
}

/// Hands out subscriptions to replay events.
pub trait ReplaySubscriber: Send + Sync {
    fn subscribe(&self) -> ReplaySubscription;
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ReplaySubscription {
    receiver: broadcast::Receiver<ReplayEvent>,
}

impl ReplaySubscription {
    pub fn new(receiver: broadcast::Receiver<ReplayEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event. `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<ReplayEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Replay subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next event already delivered, without waiting.
    pub fn try_recv(&mut self) -> Option<ReplayEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Replay subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
