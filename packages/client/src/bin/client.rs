//! Agora terminal chat client.
//!
//! Connects to the chat server, sends every typed line and prints every broadcast.
//! Exits when the user presses Ctrl+C / Ctrl+D or the server closes the connection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin agora-client -- --username Alice
//! cargo run --bin agora-client -- -H 127.0.0.1 -p 8000 -u Bob
//! ```

use clap::Parser;

use agora_client::{ClientError, chat_url, run_client_session, ui};
use agora_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "agora-client")]
#[command(about = "WebSocket chat client with broadcast support", long_about = None)]
struct Args {
    /// Server's host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server's port
    #[arg(short = 'p', long, default_value = "8000")]
    port: u16,

    /// Username shown in front of your messages
    #[arg(short = 'u', long)]
    username: String,
}

impl Args {
    fn url(&self) -> String {
        chat_url(&self.host, self.port, &self.username)
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    match run_client_session(&args.url(), &args.username).await {
        Ok(()) => {}
        Err(ClientError::Unreachable { url, reason }) => {
            tracing::debug!("Could not reach {}: {}", url, reason);
            ui::print_unreachable();
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}
