//! HistoryBrowser - The history list shown next to each tool.
//!
//! Lists and deletes entries through the store, and publishes a replay
//! event when the user picks one.

use std::sync::Arc;

use crate::domain::foundation::{HistoryEntryId, UserId};
use crate::domain::history::{HistoryEntry, HistoryError, ReplayEvent};
use crate::domain::tool::ToolType;
use crate::ports::{HistoryQuery, HistoryStore, ReplayPublisher};

#[derive(Clone)]
pub struct HistoryBrowser {
    store: Arc<dyn HistoryStore>,
    publisher: Arc<dyn ReplayPublisher>,
    page_size: usize,
}

impl HistoryBrowser {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        publisher: Arc<dyn ReplayPublisher>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            publisher,
            page_size,
        }
    }

    /// Entries of `user_id` for one tool, newest first.
    pub async fn list(
        &self,
        user_id: &UserId,
        tool_type: ToolType,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let query = HistoryQuery::for_user(user_id.clone())
            .tool(tool_type)
            .limit(self.page_size);
        self.store.list(&query).await
    }

    pub async fn delete(&self, user_id: &UserId, id: &HistoryEntryId) -> Result<(), HistoryError> {
        self.store.delete(user_id, id).await?;
        tracing::debug!(user_id = %user_id, id = %id, "History entry deleted");
        Ok(())
    }

    /// Replays `entry` into every mounted tool page.
    ///
    /// Returns how many pages received it.
    pub fn select(&self, entry: &HistoryEntry) -> usize {
        self.publisher.publish(ReplayEvent::from_entry(entry))
    }
}
