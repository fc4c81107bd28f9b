//! Tool backend port - the external AI service.
//!
//! Every tool is one `POST` to a path of the backend, carrying a JSON or
//! multipart body. The backend answers with JSON (result fields or an
//! `error` field) or with a binary file. HTTP 402 is reserved for
//! "insufficient credits".
//!
//! The port deliberately returns every HTTP response, successful or not;
//! interpreting status codes is the invoker's job.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::domain::tool::{FileUpload, ToolError};

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

impl MultipartPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, file: FileUpload) -> Self {
        MultipartPart::File {
            name: name.into(),
            file,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// Body of a backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Json(_) => "json",
            RequestBody::Multipart(_) => "multipart",
        }
    }
}

/// Raw response of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl BackendResponse {
    pub fn new(status: StatusCode, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// A JSON response; handy for scripted backends.
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self::new(
            status,
            Some("application/json".to_string()),
            value.to_string().into_bytes(),
        )
    }

    /// A binary response.
    pub fn binary(status: StatusCode, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(status, Some(content_type.into()), body)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_payment_required(&self) -> bool {
        self.status == StatusCode::PAYMENT_REQUIRED
    }

    /// Parses the body as JSON.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The `error` field of a JSON body, when there is one.
    pub fn error_message(&self) -> Option<String> {
        self.json_body()
            .ok()?
            .get("error")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    }

    /// Maps a non-2xx response to the error the page shows.
    ///
    /// 402 passes the backend message through verbatim. Everything else
    /// uses the `error` field or `fallback` when the body carries none.
    pub fn to_tool_error(&self, fallback: &str) -> ToolError {
        let message = self.error_message().unwrap_or_else(|| fallback.to_string());
        if self.is_payment_required() {
            ToolError::PaymentRequired(message)
        } else {
            ToolError::backend(self.status.as_u16(), message)
        }
    }
}

/// A call that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("could not connect: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for ToolError {
    fn from(err: TransportError) -> Self {
        ToolError::Transport(err.to_string())
    }
}

/// The external AI backend.
///
/// # Contract
///
/// Implementations must:
/// - Send exactly one request per call, with no retry
/// - Return `Ok` for every HTTP response, whatever its status
/// - Return `Err` only when no response was obtained
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// POST `body` to `endpoint` (a path such as `/correct-essay`).
    async fn post(&self, endpoint: &str, body: RequestBody)
        -> Result<BackendResponse, TransportError>;
}
