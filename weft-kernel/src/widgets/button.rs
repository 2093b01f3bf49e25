use weft_api::ComponentId;

use crate::component::{Capabilities, Component, EnabledState, HasEnabled};
use crate::render::Writer;

/// Clickable button. Accepts event handlers and can be disabled.
#[derive(Debug, Clone)]
pub struct Button {
    text: String,
    enabled: EnabledState,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: EnabledState::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl HasEnabled for Button {
    fn enabled(&self) -> bool {
        self.enabled.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled.set_enabled(enabled);
    }
}

impl Component for Button {
    fn render(&self, id: ComponentId, w: &mut Writer<'_>) {
        w.start_tag("button", id, Some("weft-Button"))
            .attr("type", "button");
        self.enabled.render(w);
        w.event_attrs(id).write(">").text(&self.text).write("</button>");
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ENABLED | Capabilities::EVENTS
    }

    fn enabled_state(&self) -> Option<&dyn HasEnabled> {
        Some(&self.enabled)
    }

    fn enabled_state_mut(&mut self) -> Option<&mut dyn HasEnabled> {
        Some(&mut self.enabled)
    }
}
