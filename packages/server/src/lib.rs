//! Real-time two-player chess session server.
//!
//! Layers, from the inside out:
//!
//! - [`domain`]: sessions, clocks and the ports the core depends on
//! - [`usecase`]: one use case per client event
//! - [`infrastructure`]: in-memory store, WebSocket pusher, chess rules, DTOs
//! - [`ui`]: axum router, HTTP API and WebSocket gateway

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
