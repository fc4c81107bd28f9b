//! Ports - interfaces to every external collaborator.
//!
//! - `IdentityProvider` - the current authenticated session
//! - `ToolBackend` - the AI service, one POST per tool
//! - `HistoryStore` - persisted history entries
//! - `ReplayPublisher` / `ReplaySubscriber` - history replay fan-out

mod history_store;
mod identity_provider;
mod replay_channel;
mod tool_backend;

pub use history_store::{HistoryQuery, HistoryStore, DEFAULT_HISTORY_LIMIT};
pub use identity_provider::IdentityProvider;
pub use replay_channel::{ReplayPublisher, ReplaySubscriber, ReplaySubscription};
pub use tool_backend::{BackendResponse, MultipartPart, RequestBody, ToolBackend, TransportError};
