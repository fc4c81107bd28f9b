//! Tool invocation errors.
//!
//! Every variant is terminal for the submission that produced it; nothing
//! is retried. The `Display` text is what the submitting page shows.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Message shown when a submission happens without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Faça login para continuar.";

/// Errors a tool submission can end with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No authenticated identity at submission time.
    #[error("{}", LOGIN_REQUIRED_MESSAGE)]
    LoginRequired,

    /// HTTP 402 from the backend; the message is shown verbatim.
    #[error("{0}")]
    PaymentRequired(String),

    /// Any other non-2xx backend response.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// Form input rejected before any call was made.
    #[error("{}", validation_message(.0))]
    Validation(ValidationError),

    /// The request never produced a response.
    #[error("Erro de conexão: {0}")]
    Transport(String),

    /// A 2xx response without the expected result.
    #[error("Resposta inesperada do servidor: {0}")]
    InvalidResponse(String),
}

impl ToolError {
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// The string a page displays for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::LoginRequired => "LOGIN_REQUIRED",
            ToolError::PaymentRequired(_) => "PAYMENT_REQUIRED",
            ToolError::Backend { .. } => "BACKEND_ERROR",
            ToolError::Validation(_) => "VALIDATION_FAILED",
            ToolError::Transport(_) => "TRANSPORT_ERROR",
            ToolError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }
}

impl From<ValidationError> for ToolError {
    fn from(err: ValidationError) -> Self {
        ToolError::Validation(err)
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyField { field } => format!("Preencha o campo '{}'.", field),
        ValidationError::TooShort { min, .. } => {
            format!("Texto muito curto. Mínimo {} caracteres.", min)
        }
        ValidationError::TooLarge { max, .. } => {
            format!("Arquivo muito grande. Máximo {} MB.", max / (1024 * 1024))
        }
        ValidationError::InvalidFormat { field, reason } => {
            format!("Campo '{}' inválido: {}", field, reason)
        }
    }
}
