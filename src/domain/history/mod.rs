//! History domain - records of past invocations and their replay.

mod entry;
mod errors;
mod replay;

pub use entry::{HistoryDraft, HistoryEntry, HistoryMetadata, NewHistoryEntry};
pub use errors::HistoryError;
pub use replay::ReplayEvent;
