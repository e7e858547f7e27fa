//! The two halves of a bidirectional text-frame channel.
//!
//! A connection's receive half is owned by its session alone. The send half is
//! shared: the session keeps it inside its [`Connection`](super::Connection) and the
//! registry reaches it through the same `Arc` when broadcasting.

use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a channel half.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The peer closed the channel (close frame or end of stream).
    #[error("channel closed")]
    Closed,

    /// A send did not complete within the delivery bound.
    #[error("send timed out")]
    TimedOut,

    /// Any other read or write failure.
    #[error("channel transport error: {0}")]
    Transport(String),
}

/// Receive half: yields inbound text frames in order.
#[async_trait]
pub trait Inbound: Send {
    /// Wait for the next text frame.
    ///
    /// Returns [`ChannelError::Closed`] once the peer has disconnected.
    async fn receive(&mut self) -> Result<String, ChannelError>;
}

/// Send half: pushes one text frame to the peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), ChannelError>;
}
