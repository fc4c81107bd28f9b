//! Per-page UI state and its lifecycle.
//!
//! ```text
//! Idle --submit--> Loading --success--> Displaying(result)
//! Loading --error--> Idle(with error message)
//! Displaying --new submit--> Loading   (result cleared immediately)
//! Displaying --replay--> Idle          (result cleared)
//! ```
//!
//! There is no cancel transition. The `loading` flag is owned by a
//! [`SubmissionGuard`] and cleared when the guard drops, whatever the
//! outcome of the submission was.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::foundation::{StateMachine, ValidationError};

use super::{FileUpload, ToolRequest, ToolResult};

/// Lifecycle phase of a tool page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    Loading,
    Displaying,
}

impl StateMachine for ToolPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ToolPhase::*;
        matches!(
            (self, target),
            (Idle, Loading) | (Loading, Displaying) | (Loading, Idle) | (Displaying, Loading)
                | (Displaying, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ToolPhase::*;
        match self {
            Idle => vec![Loading],
            Loading => vec![Displaying, Idle],
            Displaying => vec![Loading, Idle],
        }
    }
}

/// State exclusively owned and mutated by one mounted tool page.
#[derive(Debug, Clone, Default)]
pub struct ToolPageState {
    phase: ToolPhase,
    loading: bool,
    status: Option<String>,
    error: Option<String>,
    result: Option<ToolResult>,
    fields: BTreeMap<String, String>,
    attachments: BTreeMap<String, FileUpload>,
    history_open: bool,
    scroll_to_top: bool,
}

impl ToolPageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ToolPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Intermediate progress text of multi-step flows.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&ToolResult> {
        self.result.as_ref()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn attachment(&self, name: &str) -> Option<&FileUpload> {
        self.attachments.get(name)
    }

    pub fn attach(&mut self, name: impl Into<String>, file: FileUpload) {
        self.attachments.insert(name.into(), file);
    }

    /// Forgets an attachment once the backend holds it.
    pub fn clear_attachment(&mut self, name: &str) -> Option<FileUpload> {
        self.attachments.remove(name)
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn toggle_history(&mut self) {
        self.history_open = !self.history_open;
    }

    /// Returns and resets the pending scroll-to-top request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    /// Snapshot of the current inputs as a fresh request.
    pub fn to_request(&self) -> ToolRequest {
        let request = self
            .fields
            .iter()
            .fold(ToolRequest::new(), |req, (k, v)| req.with_text(k.clone(), v.clone()));
        self.attachments
            .iter()
            .fold(request, |req, (k, f)| req.with_file(k.clone(), f.clone()))
    }

    /// Enters `Loading`, clearing any prior error, status and result.
    ///
    /// Fails while a submission is already in flight.
    pub fn begin_submission(&mut self) -> Result<SubmissionGuard<'_>, ValidationError> {
        self.phase = self.phase.transition_to(ToolPhase::Loading)?;
        self.loading = true;
        self.error = None;
        self.result = None;
        self.status = None;
        Ok(SubmissionGuard { state: self })
    }

    /// Overwrites inputs from a replayed history entry.
    ///
    /// `primary_field` receives `text`; each `(metadata_key, field)` binding
    /// copies a string metadata value when present. The current result is
    /// cleared, the history panel closed and a scroll to top requested.
    pub fn apply_replay(
        &mut self,
        primary_field: &str,
        text: &str,
        metadata: &Map<String, Value>,
        bindings: &[(&str, &str)],
    ) {
        self.fields.insert(primary_field.to_string(), text.to_string());
        for (key, field) in bindings {
            if let Some(value) = metadata.get(*key).and_then(Value::as_str) {
                self.fields.insert((*field).to_string(), value.to_string());
            }
        }
        if self.phase == ToolPhase::Displaying {
            self.phase = ToolPhase::Idle;
        }
        self.result = None;
        self.history_open = false;
        self.scroll_to_top = true;
    }
}

/// Exclusive handle on a page's state for the duration of one submission.
///
/// Dropping the guard clears `loading`; a submission that never reported
/// an outcome returns the page to `Idle`.
pub struct SubmissionGuard<'a> {
    state: &'a mut ToolPageState,
}

impl SubmissionGuard<'_> {
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.state.status = Some(status.into());
    }

    /// Loading -> Displaying with the new result.
    pub fn succeed(&mut self, result: ToolResult) {
        self.state.phase = ToolPhase::Displaying;
        self.state.status = None;
        self.state.error = None;
        self.state.result = Some(result);
    }

    /// Loading -> Idle with an error message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state.phase = ToolPhase::Idle;
        self.state.status = None;
        self.state.result = None;
        self.state.error = Some(message.into());
    }

    /// Read access to the state while the guard is held.
    pub fn state(&self) -> &ToolPageState {
        self.state
    }

    pub fn clear_attachment(&mut self, name: &str) -> Option<FileUpload> {
        self.state.clear_attachment(name)
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
        if self.state.phase == ToolPhase::Loading {
            self.state.phase = ToolPhase::Idle;
            self.state.status = None;
        }
    }
}
