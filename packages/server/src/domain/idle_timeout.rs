//! Idle-timeout value object.

use std::{fmt, time::Duration};

use super::IdleTimeoutError;

/// Maximum time a session waits for the next inbound frame.
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdleTimeout(Duration);

impl IdleTimeout {
    /// Server default: one hour.
    pub const DEFAULT_SECS: u64 = 3600;

    /// Build a timeout from whole seconds.
    pub fn from_secs(secs: u64) -> Result<Self, IdleTimeoutError> {
        Self::try_from(Duration::from_secs(secs))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl TryFrom<Duration> for IdleTimeout {
    type Error = IdleTimeoutError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.is_zero() {
            return Err(IdleTimeoutError::Zero);
        }
        Ok(Self(value))
    }
}

impl Default for IdleTimeout {
    fn default() -> Self {
        Self(Duration::from_secs(Self::DEFAULT_SECS))
    }
}

impl fmt::Display for IdleTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
