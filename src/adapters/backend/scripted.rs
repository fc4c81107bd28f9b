//! Scripted tool backend for testing.
//!
//! Provides a configurable implementation of the `ToolBackend` port so that
//! tests run without an AI service.
//!
//! # Features
//!
//! - Pre-configured responses per endpoint (consumed in order)
//! - Transport error injection
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = ScriptedToolBackend::new()
//!     .with_json("/correct-essay", StatusCode::OK, json!({"total_score": 780}));
//!
//! let response = backend.post("/correct-essay", body).await?;
//! assert_eq!(backend.call_count(), 1);
//! ```

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{BackendResponse, RequestBody, ToolBackend, TransportError};

/// One call received by the scripted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub body: RequestBody,
}

impl RecordedCall {
    /// The JSON body, when the call carried one.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            RequestBody::Multipart(_) => None,
        }
    }
}

type Scripted = Result<BackendResponse, TransportError>;

/// Tool backend answering from a script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedToolBackend {
    /// Responses per endpoint (consumed in order).
    responses: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Simulated latency per request.
    delay: Duration,
}

impl ScriptedToolBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for `endpoint`.
    pub fn with_response(self, endpoint: impl Into<String>, response: BackendResponse) -> Self {
        self.push(endpoint.into(), Ok(response));
        self
    }

    /// Queues a JSON response for `endpoint`.
    pub fn with_json(self, endpoint: impl Into<String>, status: StatusCode, body: Value) -> Self {
        self.with_response(endpoint, BackendResponse::json(status, &body))
    }

    /// Queues a transport failure for `endpoint`.
    pub fn with_transport_error(self, endpoint: impl Into<String>, error: TransportError) -> Self {
        self.push(endpoint.into(), Err(error));
        self
    }

    /// Sets a simulated latency for every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Endpoints called so far, in order.
    pub fn endpoints(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|c| c.endpoint.clone()).collect()
    }

    fn push(&self, endpoint: String, scripted: Scripted) {
        lock(&self.responses)
            .entry(endpoint)
            .or_default()
            .push_back(scripted);
    }
}

#[async_trait]
impl ToolBackend for ScriptedToolBackend {
    async fn post(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<BackendResponse, TransportError> {
        lock(&self.calls).push(RecordedCall {
            endpoint: endpoint.to_string(),
            body,
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let scripted = lock(&self.responses)
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| {
            Ok(BackendResponse::json(
                StatusCode::NOT_FOUND,
                &json!({"error": format!("no scripted response for {}", endpoint)}),
            ))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
