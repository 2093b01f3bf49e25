//! Session monitor display state.

use std::fmt;

/// What a session monitor shows for a given remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Expired,
    /// Less than a minute left.
    UnderMinute,
    /// Roughly this many minutes left.
    Minutes(u64),
}

impl SessionStatus {
    /// Classify a remaining-time reading in seconds. Negative means expired.
    pub fn from_remaining(secs: f64) -> Self {
        if secs < 0.0 {
            SessionStatus::Expired
        } else if secs < 60.0 {
            SessionStatus::UnderMinute
        } else {
            SessionStatus::Minutes((secs / 60.0).round() as u64)
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, SessionStatus::Expired)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Expired => write!(f, "Expired!"),
            SessionStatus::UnderMinute => write!(f, "<1 min"),
            SessionStatus::Minutes(n) => write!(f, "~{} min", n),
        }
    }
}
