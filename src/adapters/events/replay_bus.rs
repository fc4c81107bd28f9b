//! Broadcast replay bus.
//!
//! Application-scoped fan-out of history replay events. Every mounted tool
//! page subscribes on mount and drops its subscription on unmount; each
//! published event reaches every subscriber alive at publish time.
//!
//! # Architecture
//!
//! ```text
//! HistoryBrowser --publish--> BroadcastReplayBus
//!                              ├── ToolPage (essay)
//!                              └── ToolPage (translator)
//! ```

use tokio::sync::broadcast;

use crate::domain::history::ReplayEvent;
use crate::ports::{ReplayPublisher, ReplaySubscriber, ReplaySubscription};

/// Default buffer of undelivered events per subscriber.
pub const DEFAULT_REPLAY_CAPACITY: usize = 16;

/// Replay channel backed by a tokio broadcast channel.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct BroadcastReplayBus {
    sender: broadcast::Sender<ReplayEvent>,
}

impl BroadcastReplayBus {
    /// Create a bus whose subscribers buffer at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastReplayBus {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_CAPACITY)
    }
}

impl ReplayPublisher for BroadcastReplayBus {
    fn publish(&self, event: ReplayEvent) -> usize {
        // Sending with no subscriber is not an error for a replay.
        let reached = self.sender.send(event).unwrap_or(0);
        tracing::debug!(reached, "Replay event published");
        reached
    }
}

impl ReplaySubscriber for BroadcastReplayBus {
    fn subscribe(&self) -> ReplaySubscription {
        ReplaySubscription::new(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_the_same_event() {
        let bus = BroadcastReplayBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(ReplayEvent::new("X")), 2);

        assert_eq!(first.recv().await.unwrap().text, "X");
        assert_eq!(second.recv().await.unwrap().text, "X");
    }

    #[test]
    fn publish_without_subscribers_reaches_nobody() {
        let bus = BroadcastReplayBus::default();
        assert_eq!(bus.publish(ReplayEvent::new("X")), 0);
    }

    #[test]
    fn dropped_subscription_stops_counting() {
        let bus = BroadcastReplayBus::default();
        let subscription = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(ReplayEvent::new("X")), 0);
    }

    #[test]
    fn subscription_only_sees_events_after_subscribing() {
        let bus = BroadcastReplayBus::default();
        let _keepalive = bus.subscribe();
        bus.publish(ReplayEvent::new("antes"));

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_none());

        bus.publish(ReplayEvent::new("depois"));
        assert_eq!(late.try_recv().unwrap().text, "depois");
    }
}
