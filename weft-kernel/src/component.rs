//! Component capability traits.
//!
//! A component is a server-owned node that can render itself to markup. What
//! else it can do is declared through [`Capabilities`]; the registry and the
//! dispatcher only ever consult those flags and the matching accessors, never
//! the concrete widget type.

use std::any::Any;

use bitflags::bitflags;
use weft_api::{ComponentId, EventType, TimerSpec};

use crate::render::Writer;

bitflags! {
    /// Optional behaviors a component variant implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        /// Has an enabled/disabled state (see [`Component::enabled_state`]).
        const ENABLED = 1;
        /// Accepts registered event handlers.
        const EVENTS = 1 << 1;
        /// Consumes the client value before handlers run
        /// (see [`Component::value_consumer`]).
        const CLIENT_VALUE = 1 << 2;
    }
}

/// Upcast helper so the registry can hand out typed references.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A renderable, server-side UI component.
///
/// Components never store their own id or children: both live in the
/// [`ComponentRegistry`](crate::ComponentRegistry), which passes the id into
/// every call.
pub trait Component: AsAny + Send {
    /// Write this component's markup. The outermost element must carry
    /// `id="<id>"` so the client can address it.
    fn render(&self, id: ComponentId, w: &mut Writer<'_>);

    /// Capabilities this component declares.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enabled_state(&self) -> Option<&dyn HasEnabled> {
        None
    }

    fn enabled_state_mut(&mut self) -> Option<&mut dyn HasEnabled> {
        None
    }

    fn value_consumer(&mut self) -> Option<&mut dyn ConsumesValue> {
        None
    }

    /// Event types the client must forward even with no handler registered,
    /// so the component's client value stays in sync.
    fn sync_on(&self) -> &'static [EventType] {
        &[]
    }

    /// JavaScript expression (evaluated with `this` bound to the element)
    /// whose result is sent as the event value.
    fn value_js(&self) -> Option<&'static str> {
        None
    }

    /// Client-side timer installed whenever this component is rendered.
    fn client_timer(&self, _id: ComponentId) -> Option<TimerSpec> {
        None
    }

    /// Script run on the client right after this component is rendered.
    fn init_script(&self, _id: ComponentId) -> Option<String> {
        None
    }
}

/// Enabled/disabled state.
pub trait HasEnabled {
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// Consumption of the value submitted by the client along with an event.
///
/// Implementations must never fail: malformed input means "no change".
pub trait ConsumesValue {
    fn consume_value(&mut self, value: &str);
}

/// Reusable enabled state for widgets that declare [`Capabilities::ENABLED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledState(bool);

impl Default for EnabledState {
    fn default() -> Self {
        Self(true)
    }
}

impl EnabledState {
    /// Write the `disabled` attribute when disabled.
    pub fn render(&self, w: &mut Writer<'_>) {
        if !self.0 {
            w.attr("disabled", "disabled");
        }
    }
}

impl HasEnabled for EnabledState {
    fn enabled(&self) -> bool {
        self.0
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.0 = enabled;
    }
}
