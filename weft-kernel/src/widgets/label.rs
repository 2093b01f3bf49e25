use weft_api::ComponentId;

use crate::component::Component;
use crate::render::Writer;

/// Static text.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for Label {
    fn render(&self, id: ComponentId, w: &mut Writer<'_>) {
        w.start_tag("span", id, Some("weft-Label"))
            .write(">")
            .text(&self.text)
            .write("</span>");
    }
}
