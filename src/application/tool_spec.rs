//! ToolSpec - Parameterized description of one tool invocation.
//!
//! Every tool page performs the same cycle: validate inputs, POST a payload,
//! map the response, and describe what goes into history. A `ToolSpec`
//! captures the parts that vary between tools so that a single
//! [`ToolInvoker`](super::ToolInvoker) runs them all.
//!
//! # Example
//!
//! ```ignore
//! let spec = ToolSpec::builder(ToolType::StudyMaterial, "/generate-study-material")
//!     .primary_field("topic")
//!     .require("topic")
//!     .default_value("level", "ensino_medio")
//!     .result(result_mappers::text_field(&["material"]))
//!     .history(|s, r| HistoryDraft::new(s.text("topic"), r.as_text().unwrap_or_default()))
//!     .fallback_error("Erro ao gerar material.")
//!     .build()?;
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::history::HistoryDraft;
use crate::domain::tool::text::char_count;
use crate::domain::tool::{
    DocumentPipeline, FieldValue, QueryableDocument, ToolError, ToolRequest, ToolResult, ToolType,
};
use crate::ports::BackendResponse;

/// Builds the JSON body of the tool call.
pub type PayloadFn = Arc<dyn Fn(&Submission<'_>) -> Value + Send + Sync>;

/// Maps a 2xx response to the displayed result.
pub type ResultFn = Arc<dyn Fn(&BackendResponse) -> Result<ToolResult, ToolError> + Send + Sync>;

/// Describes the history entry of a successful call.
pub type HistoryFn = Arc<dyn Fn(&Submission<'_>, &ToolResult) -> HistoryDraft + Send + Sync>;

/// Everything known about one submission once its inputs are final.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub request: &'a ToolRequest,
    pub user_id: &'a UserId,
    /// Set for tools with an upload step.
    pub document: Option<&'a DocumentPipeline<QueryableDocument>>,
}

impl<'a> Submission<'a> {
    /// Text value of a field; empty when missing.
    pub fn text(&self, name: &str) -> &'a str {
        self.request.text(name).unwrap_or_default()
    }
}

/// Upload that must complete before the tool call is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStep {
    pub endpoint: String,
    /// Request field holding the file; also the multipart part name.
    pub file_field: String,
    pub fallback_error: String,
    pub max_bytes: usize,
}

/// One tool: endpoint, inputs, payload, result and history mapping.
#[derive(Clone)]
pub struct ToolSpec {
    tool_type: ToolType,
    endpoint: String,
    primary_field: String,
    required: Vec<String>,
    min_chars: Option<(String, usize)>,
    defaults: Vec<(String, String)>,
    replay_bindings: Vec<(String, String)>,
    upload: Option<UploadStep>,
    payload: PayloadFn,
    result: ResultFn,
    history: Option<HistoryFn>,
    fallback_error: String,
}

impl ToolSpec {
    pub fn builder(tool_type: ToolType, endpoint: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder::new(tool_type, endpoint)
    }

    pub fn tool_type(&self) -> ToolType {
        self.tool_type
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Field overwritten by a replayed history entry.
    pub fn primary_field(&self) -> &str {
        &self.primary_field
    }

    pub fn upload(&self) -> Option<&UploadStep> {
        self.upload.as_ref()
    }

    pub fn fallback_error(&self) -> &str {
        &self.fallback_error
    }

    pub fn records_history(&self) -> bool {
        self.history.is_some()
    }

    /// Initial values of selector fields.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `(metadata_key, field)` pairs restored on replay.
    pub fn replay_bindings(&self) -> Vec<(&str, &str)> {
        self.replay_bindings
            .iter()
            .map(|(k, f)| (k.as_str(), f.as_str()))
            .collect()
    }

    /// Fills blank fields with their defaults.
    pub fn prepare(&self, mut request: ToolRequest) -> ToolRequest {
        for (field, value) in &self.defaults {
            if request.is_blank(field) {
                request.set_text(field.clone(), value.clone());
            }
        }
        request
    }

    /// Presence and minimum length checks.
    pub fn validate(&self, request: &ToolRequest) -> Result<(), ValidationError> {
        if let Some(field) = self.required.iter().find(|f| request.is_blank(f)) {
            return Err(ValidationError::empty_field(field.clone()));
        }
        if let Some((field, min)) = &self.min_chars {
            let actual = char_count(request.text(field).unwrap_or_default().trim());
            if actual < *min {
                return Err(ValidationError::too_short(field.clone(), *min, actual));
            }
        }
        Ok(())
    }

    pub fn payload(&self, submission: &Submission<'_>) -> Value {
        (self.payload)(submission)
    }

    pub fn map_result(&self, response: &BackendResponse) -> Result<ToolResult, ToolError> {
        (self.result)(response)
    }

    /// History draft for a successful call; `None` for tools without history.
    pub fn history_draft(
        &self,
        submission: &Submission<'_>,
        result: &ToolResult,
    ) -> Option<HistoryDraft> {
        self.history.as_ref().map(|h| h(submission, result))
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("tool_type", &self.tool_type)
            .field("endpoint", &self.endpoint)
            .field("primary_field", &self.primary_field)
            .field("required", &self.required)
            .field("upload", &self.upload)
            .field("records_history", &self.records_history())
            .finish_non_exhaustive()
    }
}

/// Default payload: every text field of the request plus `user_id`.
pub fn text_fields_payload(submission: &Submission<'_>) -> Value {
    let mut body: Map<String, Value> = submission
        .request
        .fields()
        .filter_map(|(name, value)| match value {
            FieldValue::Text(text) => Some((name.to_string(), Value::String(text.clone()))),
            FieldValue::File(_) => None,
        })
        .collect();
    body.insert(
        "user_id".to_string(),
        Value::String(submission.user_id.as_str().to_string()),
    );
    Value::Object(body)
}

fn default_payload() -> PayloadFn {
    Arc::new(text_fields_payload)
}

/// Builder for [`ToolSpec`].
pub struct ToolSpecBuilder {
    tool_type: ToolType,
    endpoint: String,
    primary_field: Option<String>,
    required: Vec<String>,
    min_chars: Option<(String, usize)>,
    defaults: Vec<(String, String)>,
    replay_bindings: Vec<(String, String)>,
    upload: Option<UploadStep>,
    payload: Option<PayloadFn>,
    result: Option<ResultFn>,
    history: Option<HistoryFn>,
    fallback_error: Option<String>,
}

impl ToolSpecBuilder {
    fn new(tool_type: ToolType, endpoint: impl Into<String>) -> Self {
        Self {
            tool_type,
            endpoint: endpoint.into(),
            primary_field: None,
            required: Vec::new(),
            min_chars: None,
            defaults: Vec::new(),
            replay_bindings: Vec::new(),
            upload: None,
            payload: None,
            result: None,
            history: None,
            fallback_error: None,
        }
    }

    pub fn primary_field(mut self, field: impl Into<String>) -> Self {
        self.primary_field = Some(field.into());
        self
    }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    pub fn min_chars(mut self, field: impl Into<String>, min: usize) -> Self {
        self.min_chars = Some((field.into(), min));
        self
    }

    pub fn default_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.push((field.into(), value.into()));
        self
    }

    pub fn bind_replay(mut self, metadata_key: impl Into<String>, field: impl Into<String>) -> Self {
        self.replay_bindings.push((metadata_key.into(), field.into()));
        self
    }

    pub fn upload(mut self, step: UploadStep) -> Self {
        self.upload = Some(step);
        self
    }

    pub fn payload<F>(mut self, f: F) -> Self
    where
        F: Fn(&Submission<'_>) -> Value + Send + Sync + 'static,
    {
        self.payload = Some(Arc::new(f));
        self
    }

    pub fn result(mut self, mapper: ResultFn) -> Self {
        self.result = Some(mapper);
        self
    }

    pub fn history<F>(mut self, f: F) -> Self
    where
        F: Fn(&Submission<'_>, &ToolResult) -> HistoryDraft + Send + Sync + 'static,
    {
        self.history = Some(Arc::new(f));
        self
    }

    pub fn fallback_error(mut self, message: impl Into<String>) -> Self {
        self.fallback_error = Some(message.into());
        self
    }

    pub fn build(self) -> Result<ToolSpec, ValidationError> {
        if self.endpoint.trim().is_empty() {
            return Err(ValidationError::empty_field("endpoint"));
        }
        let primary_field = self
            .primary_field
            .ok_or_else(|| ValidationError::empty_field("primary_field"))?;
        let result = self
            .result
            .ok_or_else(|| ValidationError::empty_field("result"))?;
        let fallback_error = self
            .fallback_error
            .ok_or_else(|| ValidationError::empty_field("fallback_error"))?;

        Ok(ToolSpec {
            tool_type: self.tool_type,
            endpoint: self.endpoint,
            primary_field,
            required: self.required,
            min_chars: self.min_chars,
            defaults: self.defaults,
            replay_bindings: self.replay_bindings,
            upload: self.upload,
            payload: self.payload.unwrap_or_else(default_payload),
            result,
            history: self.history,
            fallback_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::result_mappers;
    use serde_json::json;

    fn spec() -> ToolSpec {
        ToolSpec::builder(ToolType::TextSummary, "/summarize-text")
            .primary_field("text")
            .require("text")
            .min_chars("text", 5)
            .default_value("format", "bulletpoints")
            .bind_replay("format", "format")
            .result(result_mappers::text_field(&["summary"]))
            .history(|s, r| {
                HistoryDraft::new(s.text("text"), r.as_text().unwrap_or_default())
                    .with("format", s.text("format"))
            })
            .fallback_error("Erro ao resumir.")
            .build()
            .unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn build_requires_result_mapper() {
        let err = ToolSpec::builder(ToolType::Abnt, "/format-abnt")
            .primary_field("text")
            .fallback_error("Erro ao formatar.")
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "result");
    }

    #[test]
    fn build_requires_primary_field() {
        let err = ToolSpec::builder(ToolType::Abnt, "/format-abnt")
            .result(result_mappers::structured())
            .fallback_error("x")
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "primary_field");
    }

    #[test]
    fn prepare_fills_blank_defaults_only() {
        let spec = spec();
        let filled = spec.prepare(ToolRequest::new().with_text("format", " "));
        assert_eq!(filled.text("format"), Some("bulletpoints"));

        let kept = spec.prepare(ToolRequest::new().with_text("format", "paragraph"));
        assert_eq!(kept.text("format"), Some("paragraph"));
    }

    #[test]
    fn validate_rejects_blank_required_field() {
        let err = spec().validate(&ToolRequest::new().with_text("text", "  ")).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("text"));
    }

    #[test]
    fn validate_counts_trimmed_chars() {
        let err = spec()
            .validate(&ToolRequest::new().with_text("text", "  abcd  "))
            .unwrap_err();
        assert_eq!(err, ValidationError::too_short("text", 5, 4));
        assert!(spec().validate(&ToolRequest::new().with_text("text", "ação!")).is_ok());
    }

    #[test]
    fn default_payload_has_text_fields_and_user() {
        let spec = spec();
        let request = spec.prepare(ToolRequest::new().with_text("text", "Um texto longo"));
        let user = user();
        let submission = Submission {
            request: &request,
            user_id: &user,
            document: None,
        };

        assert_eq!(
            spec.payload(&submission),
            json!({"text": "Um texto longo", "format": "bulletpoints", "user_id": "user-1"})
        );
    }

    #[test]
    fn history_draft_uses_submission_and_result() {
        let spec = spec();
        let request = spec.prepare(ToolRequest::new().with_text("text", "Um texto"));
        let user = user();
        let submission = Submission {
            request: &request,
            user_id: &user,
            document: None,
        };

        let draft = spec
            .history_draft(&submission, &ToolResult::Text("resumo".into()))
            .unwrap();
        assert_eq!(draft.output_data, "resumo");
        assert_eq!(draft.metadata.get("format"), Some(&json!("bulletpoints")));
    }

    #[test]
    fn replay_bindings_are_exposed_as_pairs() {
        assert_eq!(spec().replay_bindings(), vec![("format", "format")]);
    }
}
