//! Terminal chess client with reconnection support.
//!
//! Connects to a Sente server, reads commands from stdin and renders the board
//! after every move. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval). Duplicate client_id connections are rejected by the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sente-client -- --client-id alice
//! cargo run --bin sente-client -- -c bob -u ws://127.0.0.1:4000/ws
//! ```

use clap::Parser;

use sente_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sente-client")]
#[command(about = "Terminal client for the Sente chess server", long_about = None)]
struct Args {
    /// Client ID (must be unique among connected clients; assigned by the server if omitted)
    #[arg(short = 'c', long)]
    client_id: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:4000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = sente_client::run_client(args.url, args.client_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
