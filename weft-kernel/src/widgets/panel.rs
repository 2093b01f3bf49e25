use weft_api::ComponentId;

use crate::component::Component;
use crate::render::Writer;

/// Container that renders its registry children in order.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    class: Option<String>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra class appended after `weft-Panel`.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl Component for Panel {
    fn render(&self, id: ComponentId, w: &mut Writer<'_>) {
        let class = match &self.class {
            Some(extra) => format!("weft-Panel {}", extra),
            None => "weft-Panel".to_string(),
        };
        w.start_tag("div", id, Some(&class)).write(">");
        let registry = w.registry();
        for child in registry.children(id) {
            w.child(*child);
        }
        w.write("</div>");
    }
}
