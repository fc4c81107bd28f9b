//! Domain layer containing the types shared by every tool page.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, sessions, errors, state machines)
//! - `tool` - Tool catalog types, requests, results and per-page state
//! - `history` - Persisted history entries and replay events

pub mod foundation;
pub mod history;
pub mod tool;
