//! Agora terminal chat client.
//!
//! Connects to `ws://{host}:{port}/ws/{username}`, forwards typed lines to the server
//! and prints every broadcast it receives until either side stops.

pub mod error;
pub mod input;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use session::{chat_url, run_client_session};
