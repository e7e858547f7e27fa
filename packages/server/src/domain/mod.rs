//! Domain layer: connections, channel halves, the idle-timeout policy and their errors.
//!
//! Nothing here depends on axum; the WebSocket adapters live in the infrastructure
//! layer and implement the channel traits defined in [`channel`].

pub mod channel;
pub mod connection;
pub mod error;
pub mod idle_timeout;

pub use channel::{ChannelError, Inbound, Outbound};
pub use connection::{Connection, ConnectionId};
pub use error::{IdleTimeoutError, RegistryError};
pub use idle_timeout::IdleTimeout;

#[cfg(test)]
pub use channel::MockOutbound;
