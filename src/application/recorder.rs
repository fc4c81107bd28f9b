//! HistoryRecorder - Best-effort persistence of completed invocations.
//!
//! Recording happens after the result is displayed. A failed save is logged
//! and reported to the caller as [`RecordOutcome::Failed`]; it never becomes a
//! user-visible error. There is no retry and no deduplication.

use std::sync::Arc;

use crate::domain::history::NewHistoryEntry;
use crate::ports::HistoryStore;

/// What happened to a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// The store refused or was unreachable; the message was logged.
    Failed(String),
    /// The tool does not record history.
    Skipped,
}

impl RecordOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordOutcome::Recorded)
    }
}

#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Saves `entry` once, swallowing any failure.
    pub async fn record(&self, entry: Option<&NewHistoryEntry>) -> RecordOutcome {
        let Some(entry) = entry else {
            return RecordOutcome::Skipped;
        };

        match self.store.save(entry).await {
            Ok(()) => RecordOutcome::Recorded,
            Err(e) => {
                tracing::warn!(
                    tool = %entry.tool_type,
                    user_id = %entry.user_id,
                    error = %e,
                    "Failed to save history entry"
                );
                RecordOutcome::Failed(e.to_string())
            }
        }
    }
}
