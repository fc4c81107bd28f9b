//! Response-to-result mappers shared by the tool catalog.
//!
//! Each function returns a [`ResultFn`] that only ever sees 2xx responses.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::tool::{BinaryOutput, EssayScore, ToolError, ToolResult};
use crate::ports::BackendResponse;

use super::tool_spec::ResultFn;

const OCTET_STREAM: &str = "application/octet-stream";

fn json_of(response: &BackendResponse) -> Result<Value, ToolError> {
    response
        .json_body()
        .map_err(|e| ToolError::invalid_response(e.to_string()))
}

/// First non-empty string among `keys`, as text.
///
/// Several endpoints renamed their result field over time, so callers list
/// every name the backend may use.
pub fn text_field(keys: &'static [&'static str]) -> ResultFn {
    Arc::new(move |response: &BackendResponse| {
        let body = json_of(response)?;
        keys.iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(|text| ToolResult::Text(text.to_string()))
            .ok_or_else(|| ToolError::invalid_response(format!("missing field '{}'", keys.join("|"))))
    })
}

/// A URL field, such as a generated image.
pub fn url_field(key: &'static str) -> ResultFn {
    Arc::new(move |response: &BackendResponse| {
        let body = json_of(response)?;
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|url| ToolResult::Url(url.to_string()))
            .ok_or_else(|| ToolError::invalid_response(format!("missing field '{}'", key)))
    })
}

/// The essay score object.
pub fn score() -> ResultFn {
    Arc::new(|response: &BackendResponse| {
        let score = EssayScore::from_body(json_of(response)?)
            .map_err(|e| ToolError::invalid_response(e.to_string()))?;
        Ok(ToolResult::Score(score))
    })
}

/// The whole JSON body, for results rendered field by field.
pub fn structured() -> ResultFn {
    Arc::new(|response: &BackendResponse| Ok(ToolResult::Structured(json_of(response)?)))
}

/// A downloadable file saved under `file_name`.
pub fn binary(file_name: &'static str) -> ResultFn {
    Arc::new(move |response: &BackendResponse| {
        if response.body.is_empty() {
            return Err(ToolError::invalid_response("empty file"));
        }
        Ok(ToolResult::File(BinaryOutput {
            file_name: file_name.to_string(),
            content_type: response
                .content_type
                .clone()
                .unwrap_or_else(|| OCTET_STREAM.to_string()),
            bytes: response.body.clone(),
        }))
    })
}
