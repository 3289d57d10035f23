//! Real-time two-player chess server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sente-server
//! cargo run --bin sente-server -- --host 0.0.0.0 --port 4000 --clock-seconds 300
//! ```

use std::sync::Arc;

use clap::Parser;
use sente_server::{
    domain::DEFAULT_CLOCK_SECONDS,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        rules::ChessRulesOracle,
    },
    ui::{AppState, Server},
};
use sente_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sente-server")]
#[command(about = "Real-time two-player chess server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "SENTE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Initial clock per side, in seconds
    #[arg(long, env = "SENTE_CLOCK_SECONDS", default_value_t = DEFAULT_CLOCK_SECONDS)]
    clock_seconds: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let Ok(initial_clock_millis) = i64::try_from(args.clock_seconds.saturating_mul(1000)) else {
        tracing::error!("--clock-seconds {} is out of range", args.clock_seconds);
        std::process::exit(1);
    };
    if initial_clock_millis == 0 {
        tracing::error!("--clock-seconds must be greater than 0");
        std::process::exit(1);
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. RulesOracle and Clock
    // 4. UseCases (AppState)
    // 5. Server
    let repository = Arc::new(InMemorySessionRepository::new(initial_clock_millis));
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let rules = Arc::new(ChessRulesOracle::new());
    let clock = Arc::new(SystemClock);
    tracing::info!("Clock per side: {} s", args.clock_seconds);

    let state = AppState::new(repository, message_pusher, rules, clock);
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
