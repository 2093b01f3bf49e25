//! Client-side timer specification.

use crate::ComponentId;

/// Parameters of a per-component client timer.
///
/// The browser runtime keeps one timer per component id. Setting up a timer
/// whose parameters differ from the installed one replaces it; setting up an
/// inactive timer tears the installed one down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSpec {
    /// JavaScript evaluated when the timer fires.
    pub js: String,
    pub timeout_ms: u64,
    pub repeat: bool,
    pub active: bool,
    /// Carried through to the client and compared like the other parameters.
    pub reset: bool,
}

impl TimerSpec {
    pub fn repeating(js: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            js: js.into(),
            timeout_ms,
            repeat: true,
            active: true,
            reset: false,
        }
    }

    /// Render the runtime call that installs this timer for `id`.
    pub fn setup_call(&self, id: ComponentId) -> String {
        format!(
            "setupTimer({},\"{}\",{},{},{},{});",
            id,
            self.js.replace('\\', "\\\\").replace('"', "\\\""),
            self.timeout_ms,
            self.repeat,
            self.active,
            self.reset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_call_format() {
        let spec = TimerSpec::repeating("checkSession(4)", 60_000);
        assert_eq!(
            spec.setup_call(ComponentId(4)),
            "setupTimer(4,\"checkSession(4)\",60000,true,true,false);"
        );
    }

    #[test]
    fn setup_call_escapes_quotes() {
        let spec = TimerSpec {
            js: "alert(\"hi\")".to_string(),
            timeout_ms: 5,
            repeat: false,
            active: false,
            reset: true,
        };
        assert_eq!(
            spec.setup_call(ComponentId(1)),
            "setupTimer(1,\"alert(\\\"hi\\\")\",5,false,false,true);"
        );
    }
}
