//! Agora chat server library.
//!
//! A registry of live WebSocket connections, each driven by its own session that
//! enforces an idle timeout and broadcasts every received frame to all members.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
