//! History store errors.
//!
//! These never reach a tool page; the recorder logs them and moves on.

use thiserror::Error;

/// Failures of the external history store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The request never produced a response.
    #[error("history store unreachable: {0}")]
    Transport(String),

    /// The store answered with a non-2xx status.
    #[error("history store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("history store response could not be decoded: {0}")]
    Decode(String),
}

impl HistoryError {
    pub fn transport(message: impl Into<String>) -> Self {
        HistoryError::Transport(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        HistoryError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        HistoryError::Decode(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            HistoryError::Transport(_) => "HISTORY_TRANSPORT",
            HistoryError::Rejected { .. } => "HISTORY_REJECTED",
            HistoryError::Decode(_) => "HISTORY_DECODE",
        }
    }
}
