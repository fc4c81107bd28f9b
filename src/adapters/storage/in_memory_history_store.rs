//! In-Memory History Store Adapter
//!
//! Keeps history entries in memory, newest last. Useful for testing and
//! development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{HistoryEntryId, Timestamp, UserId};
use crate::domain::history::{HistoryEntry, HistoryError, NewHistoryEntry};
use crate::ports::{HistoryQuery, HistoryStore};

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<HistoryEntry>,
    next_id: u64,
    save_attempts: usize,
    force_error: Option<HistoryError>,
}

/// In-memory storage for history entries
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryHistoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `error` until cleared
    pub async fn fail_with(&self, error: HistoryError) {
        self.inner.write().await.force_error = Some(error);
    }

    /// Return to normal operation
    pub async fn clear_error(&self) {
        self.inner.write().await.force_error = None;
    }

    /// All stored entries in insertion order
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.read().await.entries.clone()
    }

    /// Number of save calls, successful or not
    pub async fn save_attempts(&self) -> usize {
        self.inner.read().await.save_attempts
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn save(&self, entry: &NewHistoryEntry) -> Result<(), HistoryError> {
        let mut inner = self.inner.write().await;
        inner.save_attempts += 1;
        if let Some(error) = inner.force_error.clone() {
            return Err(error);
        }

        inner.next_id += 1;
        let id = HistoryEntryId::new(inner.next_id.to_string())
            .map_err(|e| HistoryError::decode(e.to_string()))?;
        inner.entries.push(HistoryEntry {
            id,
            user_id: entry.user_id.clone(),
            tool_type: entry.tool_type,
            tool_name: Some(entry.tool_name.clone()),
            input_data: entry.input_data.clone(),
            output_data: entry.output_data.clone(),
            metadata: entry.metadata.clone(),
            created_at: Some(Timestamp::now()),
        });
        Ok(())
    }

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError> {
        let inner = self.inner.read().await;
        if let Some(error) = inner.force_error.clone() {
            return Err(error);
        }

        Ok(inner
            .entries
            .iter()
            .rev()
            .filter(|e| e.user_id == query.user_id)
            .filter(|e| query.tool_type.map_or(true, |t| e.tool_type == t))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: &UserId, id: &HistoryEntryId) -> Result<(), HistoryError> {
        let mut inner = self.inner.write().await;
        if let Some(error) = inner.force_error.clone() {
            return Err(error);
        }

        let position = inner
            .entries
            .iter()
            .position(|e| &e.id == id && &e.user_id == user_id)
            .ok_or_else(|| HistoryError::rejected(404, "Item não autorizado"))?;
        inner.entries.remove(position);
        Ok(())
    }
}
