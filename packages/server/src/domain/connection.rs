//! Connection entity.

use std::{fmt, sync::Arc};

use uuid::Uuid;

use super::{ChannelError, Outbound};

/// Server-generated identifier of one accepted connection.
///
/// Identities are chosen by clients and may collide, so the registry is keyed by
/// this id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One accepted bidirectional channel.
///
/// Holds only the send half of the channel; the receive half stays with the
/// session that owns the connection.
pub struct Connection {
    id: ConnectionId,
    identity: String,
    connected_at: i64,
    outbound: Arc<dyn Outbound>,
}

impl Connection {
    /// Create a connection with a fresh [`ConnectionId`].
    ///
    /// # Arguments
    ///
    /// * `identity` - Client-supplied name, not validated and not unique
    /// * `connected_at` - Unix timestamp in milliseconds
    /// * `outbound` - Send half of the connection's channel
    pub fn new(
        identity: impl Into<String>,
        connected_at: i64,
        outbound: Arc<dyn Outbound>,
    ) -> Self {
        Self {
            id: ConnectionId::generate(),
            identity: identity.into(),
            connected_at,
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    /// Send one frame to this connection's peer.
    pub async fn send(&self, text: &str) -> Result<(), ChannelError> {
        self.outbound.send(text).await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}
