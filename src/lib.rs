//! Adapta IA - Client core for AI-backed tools
//!
//! Every tool page collects input, calls one backend endpoint, shows the
//! result and records it in history. This crate implements that workflow
//! once: session checks, parameterized tool invocation, best-effort history
//! recording and history replay.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
