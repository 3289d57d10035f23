//! UI layer: axum router, HTTP API and WebSocket gateway.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
