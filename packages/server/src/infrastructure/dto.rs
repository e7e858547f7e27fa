//! HTTP response bodies.

use serde::Serialize;

use crate::domain::Connection;
use agora_shared::time::millis_to_rfc3339;

/// `GET /api/connections` response.
#[derive(Debug, Serialize)]
pub struct ConnectionsDto {
    pub idle_timeout_secs: u64,
    pub count: usize,
    pub connections: Vec<ConnectionDto>,
}

/// One active connection.
#[derive(Debug, Serialize)]
pub struct ConnectionDto {
    pub id: String,
    pub identity: String,
    /// RFC 3339 (UTC); `null` if the timestamp cannot be represented
    pub connected_at: Option<String>,
}

impl From<&Connection> for ConnectionDto {
    fn from(connection: &Connection) -> Self {
        Self {
            id: connection.id().to_string(),
            identity: connection.identity().to_string(),
            connected_at: millis_to_rfc3339(connection.connected_at()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockOutbound;
    use std::sync::Arc;

    #[test]
    fn test_connection_dto_from_connection() {
        // テスト項目: Connection から DTO へ変換される
        // given (前提条件):
        let connection = Connection::new(
            "alice",
            1_672_531_200_000,
            Arc::new(MockOutbound::new()),
        );

        // when (操作):
        let dto = ConnectionDto::from(&connection);

        // then (期待する結果):
        assert_eq!(dto.id, connection.id().to_string());
        assert_eq!(dto.identity, "alice");
        assert_eq!(dto.connected_at.as_deref(), Some("2023-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_connections_dto_serializes_as_json() {
        // テスト項目: ConnectionsDto が期待する JSON 形状にシリアライズされる
        // given (前提条件):
        let dto = ConnectionsDto {
            idle_timeout_secs: 60,
            count: 0,
            connections: vec![],
        };

        // when (操作):
        let json = serde_json::to_value(&dto).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"idle_timeout_secs": 60, "count": 0, "connections": []})
        );
    }
}
