//! ReplayListener - A mounted page's end of the replay channel.
//!
//! Created on mount, dropped on unmount; dropping it unsubscribes.

use crate::domain::history::ReplayEvent;
use crate::ports::{ReplaySubscriber, ReplaySubscription};

pub struct ReplayListener {
    subscription: ReplaySubscription,
}

impl ReplayListener {
    pub fn subscribe(subscriber: &dyn ReplaySubscriber) -> Self {
        Self {
            subscription: subscriber.subscribe(),
        }
    }

    /// Next pending event without waiting. Events with no text are skipped.
    pub fn try_next(&mut self) -> Option<ReplayEvent> {
        loop {
            let event = self.subscription.try_recv()?;
            if !event.is_empty() {
                return Some(event);
            }
        }
    }

    /// Waits for the next event; `None` once the channel is closed.
    pub async fn next(&mut self) -> Option<ReplayEvent> {
        loop {
            let event = self.subscription.recv().await?;
            if !event.is_empty() {
                return Some(event);
            }
        }
    }
}
