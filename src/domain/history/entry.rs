//! History entries - persisted records of past tool invocations.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{HistoryEntryId, Timestamp, UserId};
use crate::domain::tool::ToolType;

/// Free-form metadata stored with an entry (style, tone, credits, counts...).
pub type HistoryMetadata = Map<String, Value>;

/// A stored history row as returned by the history store.
///
/// Entries are never mutated after creation; they can only be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub user_id: UserId,
    pub tool_type: ToolType,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub input_data: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub output_data: String,
    #[serde(default, deserialize_with = "metadata_or_null")]
    pub metadata: HistoryMetadata,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl HistoryEntry {
    /// String metadata value, if present.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// Body of a history save; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHistoryEntry {
    pub user_id: UserId,
    pub tool_type: ToolType,
    /// Human-readable tool label stored alongside the slug.
    pub tool_name: String,
    pub input_data: String,
    pub output_data: String,
    pub metadata: HistoryMetadata,
}

impl NewHistoryEntry {
    pub fn new(user_id: UserId, tool_type: ToolType, draft: HistoryDraft) -> Self {
        Self {
            user_id,
            tool_type,
            tool_name: tool_type.display_name().to_string(),
            input_data: draft.input_data,
            output_data: draft.output_data,
            metadata: draft.metadata,
        }
    }
}

/// The tool-specific part of an entry, produced from a request and its result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryDraft {
    pub input_data: String,
    pub output_data: String,
    pub metadata: HistoryMetadata,
}

impl HistoryDraft {
    pub fn new(input_data: impl Into<String>, output_data: impl Into<String>) -> Self {
        Self {
            input_data: input_data.into(),
            output_data: output_data.into(),
            metadata: HistoryMetadata::new(),
        }
    }

    /// Adds one metadata value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn metadata_or_null<'de, D>(deserializer: D) -> Result<HistoryMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HistoryMetadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_parses_rows_with_short_tool_slugs() {
        for (slug, tool) in [("social", ToolType::SocialMedia), ("image", ToolType::ImageGenerator)] {
            let entry: HistoryEntry = serde_json::from_value(json!({
                "id": 7,
                "user_id": "user-1",
                "tool_type": slug,
                "input_data": "post sobre café",
                "output_data": "..."
            }))
            .unwrap();
            assert_eq!(entry.tool_type, tool);
        }
    }

    #[test]
    fn entry_parses_store_row() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 42,
            "user_id": "user-1",
            "tool_type": "translator",
            "input_data": "Olá",
            "output_data": "Hello",
            "metadata": {"tone": "Formal", "lang": "Inglês"},
            "created_at": "2024-05-01T12:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(entry.id.as_str(), "42");
        assert_eq!(entry.tool_type, ToolType::Translator);
        assert_eq!(entry.metadata_str("tone"), Some("Formal"));
        assert!(entry.created_at.is_some());
    }

    #[test]
    fn entry_tolerates_null_metadata_and_output() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": "a1",
            "user_id": "user-1",
            "tool_type": "study",
            "input_data": "Fotossíntese",
            "output_data": null,
            "metadata": null
        }))
        .unwrap();

        assert!(entry.output_data.is_empty());
        assert!(entry.metadata.is_empty());
        assert!(entry.created_at.is_none());
    }

    #[test]
    fn new_entry_serializes_save_body() {
        let draft = HistoryDraft::new("Tema", "{}").with("score", 780);
        let entry = NewHistoryEntry::new(
            UserId::new("user-1").unwrap(),
            ToolType::EssayCorrector,
            draft,
        );

        let body = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            body,
            json!({
                "user_id": "user-1",
                "tool_type": "essay-corrector",
                "tool_name": "Corretor de Redação",
                "input_data": "Tema",
                "output_data": "{}",
                "metadata": {"score": 780}
            })
        );
    }
}
