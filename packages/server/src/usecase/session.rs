//! UseCase: per-connection session
//!
//! ## 責務
//!
//! One session owns one connection from acceptance to teardown:
//!
//! 1. register the connection
//! 2. wait for frames, each wait bounded by the registry's idle timeout (sampled
//!    again before every wait)
//! 3. broadcast every frame as `"<identity>: <frame>"`
//! 4. unregister exactly once, whatever ended the loop
//!
//! ## テスト実装の作業記録
//!
//! - 正常系：フレームのブロードキャスト、切断による終了
//! - タイムアウト：スライディングウィンドウ（フレーム受信でリセット）
//! - 異常系：トランスポートエラー、Future の途中破棄でも登録が残らないこと

use std::{fmt, sync::Arc};

use crate::{
    domain::{ChannelError, Connection, ConnectionId, Inbound, RegistryError},
    infrastructure::ConnectionRegistry,
};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Registered,
    /// Waiting for the next frame
    Active,
    TimedOut,
    Disconnected,
    Errored,
    /// Terminal
    Unregistered,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Registered => "registered",
            Self::Active => "active",
            Self::TimedOut => "timed-out",
            Self::Disconnected => "disconnected",
            Self::Errored => "errored",
            Self::Unregistered => "unregistered",
        };
        f.write_str(name)
    }
}

/// Why the receive loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// No frame arrived within the idle timeout
    TimedOut,
    /// The peer closed the channel
    Disconnected,
    /// The channel failed
    Errored(ChannelError),
}

impl SessionEnd {
    fn state(&self) -> SessionState {
        match self {
            Self::TimedOut => SessionState::TimedOut,
            Self::Disconnected => SessionState::Disconnected,
            Self::Errored(_) => SessionState::Errored,
        }
    }
}

/// Membership held by a running session.
///
/// Released explicitly on the normal path. If the session future is dropped or
/// unwinds first, `Drop` unregisters instead, so an entry never outlives its
/// session.
struct Registration {
    registry: Arc<ConnectionRegistry>,
    id: Option<ConnectionId>,
}

impl Registration {
    fn acquire(
        registry: Arc<ConnectionRegistry>,
        connection: Arc<Connection>,
    ) -> Result<Self, RegistryError> {
        let id = connection.id();
        registry.register(connection)?;
        Ok(Self {
            registry,
            id: Some(id),
        })
    }

    fn release(mut self) -> Result<(), RegistryError> {
        match self.id.take() {
            Some(id) => self.registry.unregister(&id).map(|_| ()),
            None => Ok(()),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::debug!("Session for connection {} dropped, unregistering", id);
            if let Err(e) = self.registry.unregister(&id) {
                tracing::error!("Registry invariant violated during cleanup: {}", e);
            }
        }
    }
}

/// Control loop for one connection.
pub struct ConnectionSession<I> {
    registry: Arc<ConnectionRegistry>,
    connection: Arc<Connection>,
    inbound: I,
    state: SessionState,
}

impl<I: Inbound> ConnectionSession<I> {
    /// Create a session in the `Connecting` state.
    ///
    /// # Arguments
    ///
    /// * `registry` - The process-wide registry
    /// * `connection` - The accepted connection (identity and send half)
    /// * `inbound` - Receive half of the connection's channel, owned by the session
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        connection: Arc<Connection>,
        inbound: I,
    ) -> Self {
        Self {
            registry,
            connection,
            inbound,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion.
    ///
    /// # Returns
    ///
    /// * `Ok(SessionEnd)` - Why the connection ended; the connection is unregistered
    /// * `Err(RegistryError)` - Registry contract violation
    pub async fn run(&mut self) -> Result<SessionEnd, RegistryError> {
        let registration =
            Registration::acquire(self.registry.clone(), self.connection.clone())?;
        self.transition(SessionState::Registered);

        let end = self.receive_loop().await;
        self.transition(end.state());

        registration.release()?;
        self.transition(SessionState::Unregistered);

        Ok(end)
    }

    async fn receive_loop(&mut self) -> SessionEnd {
        loop {
            self.transition(SessionState::Active);
            let idle_timeout = self.registry.idle_timeout();

            let received =
                tokio::time::timeout(idle_timeout.as_duration(), self.inbound.receive()).await;

            let frame = match received {
                Ok(Ok(frame)) => frame,
                Ok(Err(ChannelError::Closed)) => {
                    tracing::info!("{} left the chat", self.connection.identity());
                    return SessionEnd::Disconnected;
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        "Channel error on connection {} ('{}'): {}",
                        self.connection.id(),
                        self.connection.identity(),
                        e
                    );
                    return SessionEnd::Errored(e);
                }
                Err(_) => {
                    tracing::info!(
                        "Timeout: no data received from '{}' in {}",
                        self.connection.identity(),
                        idle_timeout
                    );
                    return SessionEnd::TimedOut;
                }
            };

            let message = format!("{}: {}", self.connection.identity(), frame);
            self.registry.broadcast(&message).await;
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(
                "Connection {} ('{}'): {} -> {}",
                self.connection.id(),
                self.connection.identity(),
                self.state,
                next
            );
            self.state = next;
        }
    }
}
