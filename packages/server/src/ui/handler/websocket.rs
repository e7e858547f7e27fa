//! WebSocket connection handler.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State, ws::WebSocket, ws::WebSocketUpgrade},
    response::IntoResponse,
};

use crate::{
    domain::Connection,
    infrastructure::websocket::split,
    ui::state::AppState,
    usecase::{ConnectionSession, SessionEnd},
};
use agora_shared::time::now_millis;

/// How long the writer may take to flush the close frame before it is aborted.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Upgrade `/ws/{identity}`. The identity is taken verbatim and is not authenticated.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> impl IntoResponse {
    tracing::info!("Upgrading connection for '{}'", identity);
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: String) {
    let (inbound, outbound, mut writer) = split(socket);
    let outbound = Arc::new(outbound);
    let connection = Arc::new(Connection::new(identity, now_millis(), outbound.clone()));

    tracing::info!(
        "{} joined the chat (connection {})",
        connection.identity(),
        connection.id()
    );

    let mut session = ConnectionSession::new(state.registry.clone(), connection.clone(), inbound);
    match session.run().await {
        Ok(SessionEnd::Errored(e)) => {
            tracing::warn!("Connection to {} failed: {}", connection.identity(), e);
        }
        Ok(end) => tracing::debug!("Session for {} ended: {:?}", connection.identity(), end),
        Err(e) => tracing::error!("Registry invariant violated: {}", e),
    }

    outbound.close();
    if tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        tracing::warn!(
            "Close frame to {} not flushed within {:?}, dropping the socket",
            connection.identity(),
            CLOSE_GRACE
        );
        writer.abort();
    }

    tracing::info!(
        "Disconnecting {} ({} still connected)",
        connection.identity(),
        state.registry.len()
    );
}
