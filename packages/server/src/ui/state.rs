//! Server state shared by every handler.

use std::sync::Arc;

use crate::infrastructure::ConnectionRegistry;

/// Shared application state
pub struct AppState {
    /// The single connection registry of the process
    pub registry: Arc<ConnectionRegistry>,
}
