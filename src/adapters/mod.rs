//! Adapters - implementations of the ports.
//!
//! - `http` - reqwest clients for the AI backend and its history endpoints
//! - `auth` - Supabase identity provider and a mock
//! - `events` - broadcast replay bus
//! - `storage` - in-memory history store
//! - `backend` - scripted tool backend for tests

pub mod auth;
pub mod backend;
pub mod events;
pub mod http;
pub mod storage;
