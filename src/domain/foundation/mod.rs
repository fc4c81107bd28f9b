//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, auth types and error types
//! that form the vocabulary of the Adapta IA client.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Session};
pub use errors::ValidationError;
pub use ids::{HistoryEntryId, SubmissionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
