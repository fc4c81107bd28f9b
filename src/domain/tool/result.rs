//! ToolResult - what a successful tool call puts on screen.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Structured score returned by the essay corrector.
///
/// The body is model-generated: the total may arrive as a float or a numeric
/// string, and optional parts as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssayScore {
    #[serde(deserialize_with = "lenient_score")]
    pub total_score: u32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub feedback: String,
    #[serde(default, deserialize_with = "map_or_null")]
    pub competencies: Map<String, Value>,
    /// Response body as received, stored verbatim in history.
    #[serde(skip)]
    pub body: Value,
}

impl EssayScore {
    /// Parses a response body, keeping it alongside the typed fields.
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        let mut score: EssayScore = serde_json::from_value(body.clone())?;
        score.body = body;
        Ok(score)
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, f64::from(u32::MAX)) as u32)
        .ok_or_else(|| D::Error::custom("total_score is not a number"))
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn map_or_null<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A generated file (spreadsheet, docx).
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryOutput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for BinaryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOutput")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Tool-specific result shape, held only in transient page state.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    /// Plain generated text (summary, translation, prompt, answer...).
    Text(String),
    /// Essay correction score.
    Score(EssayScore),
    /// Free-form JSON object (interview questions and tips).
    Structured(Value),
    /// Link to a generated asset (image).
    Url(String),
    /// Generated file to download.
    File(BinaryOutput),
}

impl ToolResult {
    /// The text a page shows (or copies) for text-like results.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolResult::Text(text) | ToolResult::Url(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_score(&self) -> Option<&EssayScore> {
        match self {
            ToolResult::Score(score) => Some(score),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&BinaryOutput> {
        match self {
            ToolResult::File(file) => Some(file),
            _ => None,
        }
    }

    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolResult::Text(_) => "text",
            ToolResult::Score(_) => "score",
            ToolResult::Structured(_) => "structured",
            ToolResult::Url(_) => "url",
            ToolResult::File(_) => "file",
        }
    }
}
