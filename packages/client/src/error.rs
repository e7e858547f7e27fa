//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached at all
    #[error("Failed to connect to server at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The connection failed after it was established
    #[error("Connection error: {0}")]
    Connection(String),

    /// One of the client tasks panicked
    #[error("Client task failed: {0}")]
    TaskFailed(String),
}
