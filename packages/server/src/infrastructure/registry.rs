//! In-memory connection registry.
//!
//! ## Responsibilities
//!
//! - Membership of the currently active connections, keyed by `ConnectionId`
//! - The idle-timeout policy that every session samples before each wait
//! - Fan-out of a text frame to every member (`broadcast`)
//!
//! ## Locking
//!
//! `members` sits behind a single synchronous mutex that is never held across an
//! `.await`. `broadcast` snapshots the members under the lock and sends after
//! releasing it, so a connection joining or leaving during a broadcast may or may not
//! see that message, but the map itself is never observed half-updated.
//!
//! Every send is bounded by [`DELIVERY_TIMEOUT`]. A peer that stops reading costs the
//! broadcasting session at most that long and is counted as a failed delivery.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};

use crate::domain::{ChannelError, Connection, ConnectionId, IdleTimeout, RegistryError};

/// Upper bound for handing one frame to one member.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members that accepted the frame
    pub delivered: usize,
    /// Members whose send failed (left for their own session to tear down)
    pub failed: usize,
}

/// Table of active connections shared by every session of the process.
///
/// Built once by the server's composition root and handed out as
/// `Arc<ConnectionRegistry>`.
///
/// ## Example
///
/// ```ignore
/// let registry = Arc::new(ConnectionRegistry::new(IdleTimeout::from_secs(60)?));
/// registry.register(connection.clone())?;
/// registry.broadcast("alice: hi").await;
/// registry.unregister(&connection.id())?;
/// ```
pub struct ConnectionRegistry {
    members: Mutex<HashMap<ConnectionId, Arc<Connection>>>,
    idle_timeout: RwLock<IdleTimeout>,
}

impl ConnectionRegistry {
    pub fn new(idle_timeout: IdleTimeout) -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            idle_timeout: RwLock::new(idle_timeout),
        }
    }

    /// Add a connection to the members.
    ///
    /// # Errors
    ///
    /// `DuplicateRegistration` if the connection is already a member; the members are
    /// left unchanged.
    pub fn register(&self, connection: Arc<Connection>) -> Result<(), RegistryError> {
        let id = connection.id();
        let mut members = self.members.lock();
        if members.contains_key(&id) {
            return Err(RegistryError::DuplicateRegistration(id));
        }
        members.insert(id, Arc::clone(&connection));
        tracing::debug!(
            "Connection {} ('{}') registered ({} active)",
            id,
            connection.identity(),
            members.len()
        );
        Ok(())
    }

    /// Remove a connection from the members.
    ///
    /// Not idempotent: each connection is unregistered exactly once by its session.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the connection is absent; the members are left unchanged.
    pub fn unregister(&self, id: &ConnectionId) -> Result<Arc<Connection>, RegistryError> {
        let mut members = self.members.lock();
        let removed = members
            .remove(id)
            .ok_or(RegistryError::NotRegistered(*id))?;
        tracing::debug!(
            "Connection {} ('{}') unregistered ({} active)",
            id,
            removed.identity(),
            members.len()
        );
        Ok(removed)
    }

    /// Send `message` to every current member.
    ///
    /// A failed or timed-out send is logged and counted but never stops delivery to
    /// the other members, and the failing member stays registered.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let targets: Vec<Arc<Connection>> = self.members.lock().values().cloned().collect();

        let results = join_all(targets.iter().map(|target| async move {
            tokio::time::timeout(DELIVERY_TIMEOUT, target.send(message))
                .await
                .unwrap_or(Err(ChannelError::TimedOut))
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (target, result) in targets.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Failed to deliver message to connection {} ('{}'): {}",
                        target.id(),
                        target.identity(),
                        e
                    );
                }
            }
        }

        tracing::debug!(
            "Broadcast finished: {} delivered, {} failed",
            report.delivered,
            report.failed
        );
        report
    }

    /// Replace the idle timeout used by waits that start after this call.
    pub fn set_idle_timeout(&self, idle_timeout: IdleTimeout) {
        *self.idle_timeout.write() = idle_timeout;
        tracing::info!("Idle timeout set to {}", idle_timeout);
    }

    pub fn idle_timeout(&self) -> IdleTimeout {
        *self.idle_timeout.read()
    }

    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.lock().contains_key(id)
    }

    /// Current members ordered by connection time, then identity.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        let mut connections: Vec<Arc<Connection>> =
            self.members.lock().values().cloned().collect();
        connections.sort_by(|a, b| {
            a.connected_at()
                .cmp(&b.connected_at())
                .then_with(|| a.identity().cmp(b.identity()))
        });
        connections
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(IdleTimeout::default())
    }
}
