//! Session model and liveness.
//!
//! A session owns one component tree, its dirty tracker and its id space.
//! Liveness is cooperative: the session records its last activity and
//! computes the remaining time on demand.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;
use weft_api::{ComponentId, Event, ResponseAction};

use crate::config::SessionConfig;
use crate::dirty::DirtyTracker;
use crate::error::KernelError;
use crate::registry::ComponentRegistry;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

pub struct Session {
    id: SessionId,
    pub(crate) registry: ComponentRegistry,
    pub(crate) dirty: DirtyTracker,
    pub(crate) focused: Option<ComponentId>,
    created: Instant,
    accessed: Instant,
    timeout: Duration,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let now = Instant::now();
        let id = SessionId::new();
        tracing::info!(session = %id, timeout_secs = config.timeout.as_secs(), "session created");
        Self {
            id,
            registry: ComponentRegistry::new(),
            dirty: DirtyTracker::new(),
            focused: None,
            created: now,
            accessed: now,
            timeout: config.timeout,
            config,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn created(&self) -> Instant {
        self.created
    }

    pub fn accessed(&self) -> Instant {
        self.accessed
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Refresh the last-activity timestamp.
    pub fn access(&mut self) {
        self.accessed = Instant::now();
    }

    /// Seconds until expiry; negative once expired.
    pub fn remaining_secs(&self) -> f64 {
        let idle = self.accessed.elapsed().as_secs_f64();
        self.timeout.as_secs_f64() - idle
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs() < 0.0
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    pub fn set_root(&mut self, id: ComponentId) -> Result<(), KernelError> {
        self.registry.set_root(id)
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.registry.root()
    }

    /// Mark a component dirty outside of a dispatch (e.g. from a background
    /// task holding the session lock). Delivered with the next event response.
    pub fn mark_dirty(&mut self, id: ComponentId) {
        self.dirty.mark(id);
    }

    /// Last component reported or requested as focused.
    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }

    pub fn set_focused(&mut self, id: Option<ComponentId>) {
        self.focused = id;
    }

    /// Dispatch a client event and refresh activity.
    pub fn dispatch(&mut self, event: &Event) -> Vec<ResponseAction> {
        self.access();
        crate::dispatch::dispatch(self, event)
    }

    /// Render one component for the client and refresh activity.
    pub fn render(&mut self, id: ComponentId) -> Option<String> {
        self.access();
        crate::render::render_component(&self.registry, id)
    }

    /// Render the whole tree from the root.
    pub fn render_root(&mut self) -> Option<String> {
        let root = self.registry.root()?;
        self.render(root)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("components", &self.registry.len())
            .field("dirty", &self.dirty.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
