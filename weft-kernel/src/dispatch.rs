//! Event dispatch.
//!
//! A dispatch runs under exclusive access to one session: it resolves the
//! target, applies the client value, runs the registered handlers in order,
//! and turns the accumulated dirty marks and handler requests into response
//! actions.

use std::sync::Arc;

use weft_api::{ComponentId, Event, ResponseAction};

use crate::component::{Capabilities, Component};
use crate::dirty::DirtyTracker;
use crate::registry::ComponentRegistry;
use crate::session::Session;

/// A server-side event handler.
///
/// Returning an error stops the remaining handlers for this event. Dirty
/// marks made before the error are still delivered.
pub type EventHandler = Arc<dyn Fn(&mut EventContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// What a handler sees while it runs.
pub struct EventContext<'a> {
    event: &'a Event,
    registry: &'a mut ComponentRegistry,
    dirty: &'a mut DirtyTracker,
    reload: Option<Option<String>>,
    focus: Option<ComponentId>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        event: &'a Event,
        registry: &'a mut ComponentRegistry,
        dirty: &'a mut DirtyTracker,
    ) -> Self {
        Self {
            event,
            registry,
            dirty,
            reload: None,
            focus: None,
        }
    }

    pub fn event(&self) -> &Event {
        self.event
    }

    /// The component the event was fired on.
    pub fn source(&self) -> ComponentId {
        self.event.target
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &*self.registry
    }

    /// Mutable access to the tree, e.g. to add or remove components.
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut *self.registry
    }

    pub fn get<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.registry.get::<T>(id)
    }

    pub fn get_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.registry.get_mut::<T>(id)
    }

    /// Request a re-render of `id` in this response.
    pub fn mark_dirty(&mut self, id: ComponentId) {
        self.dirty.mark(id);
    }

    /// Ask the client to reload the current page.
    pub fn reload_window(&mut self) {
        self.reload = Some(None);
    }

    /// Ask the client to navigate. Paths not starting with `/` are relative
    /// to the application path.
    pub fn navigate(&mut self, path: impl Into<String>) {
        self.reload = Some(Some(path.into()));
    }

    /// Ask the client to move keyboard focus to `id`.
    pub fn focus(&mut self, id: ComponentId) {
        self.focus = Some(id);
    }
}

/// Dispatch one client event against a session.
///
/// Always yields at least one action; [`ResponseAction::NoAction`] when the
/// target does not resolve, is disabled, or nothing changed.
pub fn dispatch(session: &mut Session, event: &Event) -> Vec<ResponseAction> {
    if let Some(focused) = event.focused {
        session.focused = Some(focused);
    }

    let id = event.target;
    let Some(component) = session.registry.resolve_mut(id) else {
        tracing::debug!(component = %id, kind = ?event.kind, "event target not found");
        return vec![ResponseAction::NoAction];
    };

    if let Some(state) = component.enabled_state()
        && !state.enabled()
    {
        tracing::debug!(component = %id, "event on disabled component ignored");
        return vec![ResponseAction::NoAction];
    }

    if component.capabilities().contains(Capabilities::CLIENT_VALUE)
        && let Some(value) = event.value.as_deref()
        && let Some(consumer) = component.value_consumer()
    {
        consumer.consume_value(value);
    }

    let handlers = session.registry.handlers(id, event.kind);
    let mut ctx = EventContext::new(event, &mut session.registry, &mut session.dirty);
    for (index, handler) in handlers.iter().enumerate() {
        if let Err(error) = handler(&mut ctx) {
            tracing::warn!(
                component = %id,
                kind = ?event.kind,
                handler = index,
                error = %error,
                "event handler failed, skipping remaining handlers"
            );
            break;
        }
    }
    let EventContext { reload, focus, .. } = ctx;

    let dirty = session.dirty.drain_pruned(&session.registry);
    let mut actions = Vec::new();
    if !dirty.is_empty() {
        actions.push(ResponseAction::MarkDirty(dirty));
    }
    if let Some(focus) = focus {
        session.focused = Some(focus);
        actions.push(ResponseAction::FocusComponent(focus));
    }
    if let Some(path) = reload {
        actions.push(ResponseAction::ReloadWindow(path));
    }
    if actions.is_empty() {
        actions.push(ResponseAction::NoAction);
    }

    tracing::trace!(component = %id, kind = ?event.kind, ?actions, "event dispatched");
    actions
}
