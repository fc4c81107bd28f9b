//! Replay events - a past entry pushed back into the mounted tool page.

use serde::{Deserialize, Serialize};

use super::{HistoryEntry, HistoryMetadata};

/// Payload published when a history entry is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayEvent {
    /// Value for the page's primary input field.
    pub text: String,
    /// Selector values (style, tone, level...) the page may restore.
    #[serde(default)]
    pub metadata: HistoryMetadata,
}

impl ReplayEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HistoryMetadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HistoryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Replays the entry's input together with its metadata.
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            text: entry.input_data.clone(),
            metadata: entry.metadata.clone(),
        }
    }

    /// Events without text are ignored by pages.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
