//! Tool backend test doubles.

mod scripted;

pub use scripted::{RecordedCall, ScriptedToolBackend};
