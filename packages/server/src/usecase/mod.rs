//! UseCase layer.

pub mod session;

pub use session::{ConnectionSession, SessionEnd, SessionState};
