//! Session monitor component.
//!
//! The monitor has no server-side handlers. It installs a repeating client
//! timer that pulls the remaining session time from the session-check
//! endpoint and updates its own label, so it never goes through dirty
//! tracking.

use std::time::Duration;

use weft_api::protocol::classes;
use weft_api::{ComponentId, TimerSpec};

use crate::component::Component;
use crate::config::DEFAULT_MONITOR_PERIOD;
use crate::render::Writer;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct SessionMonitor {
    period: Duration,
}

impl SessionMonitor {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn check_js(id: ComponentId) -> String {
        format!("checkSession({})", id)
    }
}

impl Default for SessionMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_MONITOR_PERIOD)
    }
}

impl Component for SessionMonitor {
    fn render(&self, id: ComponentId, w: &mut Writer<'_>) {
        // The inner span holds the label the client fills in.
        w.start_tag("span", id, Some(classes::SESSION_MONITOR))
            .write("><span></span></span>");
    }

    fn client_timer(&self, id: ComponentId) -> Option<TimerSpec> {
        let millis = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX);
        Some(TimerSpec::repeating(Self::check_js(id), millis))
    }

    /// Check right away instead of waiting for the first tick.
    fn init_script(&self, id: ComponentId) -> Option<String> {
        Some(format!("{};", Self::check_js(id)))
    }
}

/// Seconds until `session` expires, negative once expired.
///
/// Reading the remaining time does not count as activity.
pub fn check_session_time_remaining(session: &Session) -> f64 {
    session.remaining_secs()
}
