//! Event adapters.
//!
//! - `BroadcastReplayBus` - tokio broadcast channel for history replay

mod replay_bus;

pub use replay_bus::{BroadcastReplayBus, DEFAULT_REPLAY_CAPACITY};
