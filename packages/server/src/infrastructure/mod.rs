//! Infrastructure layer: the registry implementation, WebSocket adapters and DTOs.

pub mod dto;
pub mod registry;
pub mod websocket;

pub use registry::{BroadcastReport, ConnectionRegistry};
