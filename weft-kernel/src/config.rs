//! Session configuration.

use std::time::Duration;

/// Default idle time after which a session expires.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default period of the session monitor's client-side poll.
pub const DEFAULT_MONITOR_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle duration after which the session is considered expired.
    pub timeout: Duration,
    /// How often session monitors poll the remaining time.
    pub monitor_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SESSION_TIMEOUT,
            monitor_period: DEFAULT_MONITOR_PERIOD,
        }
    }
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
