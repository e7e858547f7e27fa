//! Registry and configuration errors.

use thiserror::Error;

use super::ConnectionId;

/// Registry contract violations.
///
/// Sessions register and unregister each connection exactly once, so neither
/// variant is reachable in correct operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection {0} is already registered")]
    DuplicateRegistration(ConnectionId),

    #[error("connection {0} is not registered")]
    NotRegistered(ConnectionId),
}

/// Rejected idle-timeout values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdleTimeoutError {
    #[error("idle timeout must be greater than zero")]
    Zero,
}
