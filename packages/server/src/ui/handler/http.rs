//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{ConnectionDto, ConnectionsDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List the connections currently registered for broadcast
pub async fn get_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionsDto> {
    let connections: Vec<ConnectionDto> = state
        .registry
        .snapshot()
        .iter()
        .map(|connection| ConnectionDto::from(connection.as_ref()))
        .collect();

    Json(ConnectionsDto {
        idle_timeout_secs: state.registry.idle_timeout().as_secs(),
        count: connections.len(),
        connections,
    })
}
