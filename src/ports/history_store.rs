//! History store port - persisted records of past tool invocations.
//!
//! The store assigns ids and creation times and orders listings most
//! recent first. There is no deduplication: saving the same entry twice
//! creates two rows.

use async_trait::async_trait;

use crate::domain::foundation::{HistoryEntryId, UserId};
use crate::domain::history::{HistoryEntry, HistoryError, NewHistoryEntry};
use crate::domain::tool::ToolType;

/// Default number of rows returned by a listing.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Filter for listing a user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub user_id: UserId,
    pub tool_type: Option<ToolType>,
    pub limit: usize,
}

impl HistoryQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            tool_type: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn tool(mut self, tool_type: ToolType) -> Self {
        self.tool_type = Some(tool_type);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Persistence of history entries.
///
/// # Contract
///
/// Implementations must:
/// - Make `save` create exactly one row per call
/// - Return `list` results newest first, at most `limit` rows
/// - Only delete rows owned by the given user
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn save(&self, entry: &NewHistoryEntry) -> Result<(), HistoryError>;

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError>;

    async fn delete(&self, user_id: &UserId, id: &HistoryEntryId) -> Result<(), HistoryError>;
}
