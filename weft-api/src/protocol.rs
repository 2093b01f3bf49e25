//! Wire protocol constants.
//!
//! These values are embedded verbatim into the generated browser runtime and
//! used by the server to decode requests and encode responses. Changing any of
//! them is a protocol version change.

/// Protocol/runtime version, part of the static runtime resource name.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Form field names of the event request.
pub mod params {
    pub const EVENT_TYPE: &str = "et";
    pub const COMP_ID: &str = "cid";
    pub const COMP_VALUE: &str = "cval";
    pub const FOCUSED_COMP_ID: &str = "fcid";
    pub const MOUSE_WX: &str = "mwx";
    pub const MOUSE_WY: &str = "mwy";
    pub const MOUSE_X: &str = "mx";
    pub const MOUSE_Y: &str = "my";
    pub const MOUSE_BTN: &str = "mb";
    pub const MOD_KEYS: &str = "mk";
    pub const KEY_CODE: &str = "kc";
}

/// Leading codes of response directives.
pub mod codes {
    pub const NO_ACTION: u8 = 0;
    pub const RELOAD_WINDOW: u8 = 1;
    pub const MARK_DIRTY: u8 = 2;
    pub const FOCUS_COMPONENT: u8 = 3;
}

/// Separator between directives in a response body.
pub const DIRECTIVE_SEP: char = ';';

/// Separator between the fields of one directive.
pub const FIELD_SEP: char = ',';

/// Endpoint suffixes, relative to the application path.
pub mod paths {
    pub const EVENT: &str = "e";
    pub const RENDER_COMP: &str = "rc";
    pub const SESSION_CHECK: &str = "sc";
    pub const STATIC_DIR: &str = "_static/";
}

/// File name of the static browser runtime resource.
pub fn runtime_resource_name() -> String {
    format!("weft-{}.js", VERSION)
}

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "weft-sid";

/// CSS classes the browser runtime toggles.
pub mod classes {
    pub const SESSION_MONITOR: &str = "weft-SessMonitor";
    pub const SESSION_MONITOR_EXPIRED: &str = "weft-SessMonitor-Expired";
}

/// Resolved endpoint paths for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Application path, always ending with `/` (e.g. `/app/`).
    pub app: String,
    pub event: String,
    pub render_comp: String,
    pub session_check: String,
    pub runtime_js: String,
}

impl AppPaths {
    /// Derive all endpoint paths from an application path.
    ///
    /// The path is normalized to start and end with `/`.
    pub fn new(app_path: &str) -> Self {
        let trimmed = app_path.trim_matches('/');
        let app = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        Self {
            event: format!("{}{}", app, paths::EVENT),
            render_comp: format!("{}{}", app, paths::RENDER_COMP),
            session_check: format!("{}{}", app, paths::SESSION_CHECK),
            runtime_js: format!("{}{}{}", app, paths::STATIC_DIR, runtime_resource_name()),
            app,
        }
    }

    /// Resolve a reload target the same way the browser runtime does.
    ///
    /// Absolute paths are used as-is, anything else is relative to the app.
    pub fn resolve_reload(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}{}", self.app, path)
        }
    }
}
