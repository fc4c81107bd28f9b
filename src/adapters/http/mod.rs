//! HTTP adapters for the AI backend (tools and history).

mod client;
mod history_store;
mod tool_backend;

pub use client::build_client;
pub use history_store::HttpHistoryStore;
pub use tool_backend::HttpToolBackend;
