//! Agora WebSocket chat server.
//!
//! Every text frame a client sends is broadcast to all connected clients (the sender
//! included) as `"<username>: <text>"`. Clients idle for longer than the timeout are
//! disconnected.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin agora-server
//! cargo run --bin agora-server -- --host 0.0.0.0 --port 3000 --timeout 600
//! ```

use std::sync::Arc;

use agora_server::{domain::IdleTimeout, infrastructure::ConnectionRegistry, ui::Server};
use agora_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "agora-server")]
#[command(about = "WebSocket chat server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8000")]
    port: u16,

    /// Seconds a client may stay silent before it is disconnected
    #[arg(
        short = 't',
        long,
        default_value_t = IdleTimeout::DEFAULT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let idle_timeout = match IdleTimeout::from_secs(args.timeout) {
        Ok(timeout) => timeout,
        Err(e) => {
            tracing::error!("Invalid --timeout: {}", e);
            std::process::exit(2);
        }
    };

    // The one registry of this process, shared by every connection handler
    let registry = Arc::new(ConnectionRegistry::default());
    registry.set_idle_timeout(idle_timeout);

    let server = Server::new(registry);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
