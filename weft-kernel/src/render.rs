//! Render pipeline.
//!
//! Widgets produce their own markup through [`Writer`]; the pipeline owns the
//! protocol envelope around it (event capture attributes, the inline script
//! that installs client timers and init code) and the response encoding.

use std::fmt::Write as _;

use weft_api::{ComponentId, EventType, ResponseAction, encode_actions};

use crate::component::Component;
use crate::registry::ComponentRegistry;

/// Markup sink handed to [`Component::render`].
pub struct Writer<'a> {
    registry: &'a ComponentRegistry,
    out: &'a mut String,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(registry: &'a ComponentRegistry, out: &'a mut String) -> Self {
        Self { registry, out }
    }

    /// Raw markup, written as-is.
    pub fn write(&mut self, markup: &str) -> &mut Self {
        self.out.push_str(markup);
        self
    }

    /// Text content, escaped.
    pub fn text(&mut self, text: &str) -> &mut Self {
        escape_into(self.out, text);
        self
    }

    /// ` name="value"` with the value escaped.
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        let _ = write!(self.out, " {}=\"", name);
        escape_into(self.out, value);
        self.out.push('"');
        self
    }

    /// Open `<tag id="<id>"` with an optional class. The tag is left open so
    /// the caller can add attributes; close it with `write(">")`.
    pub fn start_tag(&mut self, tag: &str, id: ComponentId, class: Option<&str>) -> &mut Self {
        let _ = write!(self.out, "<{} id=\"{}\"", tag, id);
        if let Some(class) = class {
            self.attr("class", class);
        }
        self
    }

    /// Event capture attributes for `id`: one `on<event>` attribute for every
    /// event type with a registered handler or declared as sync-on.
    pub fn event_attrs(&mut self, id: ComponentId) -> &mut Self {
        let Some(component) = self.registry.component(id) else {
            return self;
        };
        let mut kinds = self.registry.handled_types(id);
        kinds.extend_from_slice(component.sync_on());
        kinds.sort();
        kinds.dedup();

        let value_js = component.value_js();
        for kind in kinds {
            let _ = write!(self.out, " {}=\"", kind.attr_name());
            send_event_js(self.out, kind, id, value_js);
            self.out.push('"');
        }
        self
    }

    /// Render a child component in place. Hidden or unknown children render
    /// nothing.
    pub fn child(&mut self, id: ComponentId) -> &mut Self {
        if !self.registry.is_hidden(id) {
            render_node(self.registry, id, self.out);
        }
        self
    }

    pub fn registry(&self) -> &'a ComponentRegistry {
        self.registry
    }
}

fn send_event_js(out: &mut String, kind: EventType, id: ComponentId, value_js: Option<&str>) {
    let _ = match value_js {
        Some(js) => write!(out, "se(event,{},{},{})", kind.code(), id, js),
        None => write!(out, "se(event,{},{})", kind.code(), id),
    };
}

/// Render a component that the client addresses by id.
///
/// `None` when the id does not resolve (removed, detached or hidden); the
/// client treats the resulting empty body as a silent no-op.
pub fn render_component(registry: &ComponentRegistry, id: ComponentId) -> Option<String> {
    registry.resolve(id)?;
    let mut out = String::new();
    render_node(registry, id, &mut out);
    Some(out)
}

fn render_node(registry: &ComponentRegistry, id: ComponentId, out: &mut String) {
    let Some(component) = registry.component(id) else {
        tracing::debug!(component = %id, "skipping render of unknown component");
        return;
    };

    let start = out.len();
    component.render(id, &mut Writer::new(registry, out));

    let script = envelope_script(component, id);
    if script.is_empty() {
        return;
    }
    // The script goes inside the outermost element so replacing the element
    // on re-render also re-runs it.
    match out[start..].rfind("</") {
        Some(pos) => out.insert_str(start + pos, &script),
        None => out.push_str(&script),
    }
}

fn envelope_script(component: &dyn Component, id: ComponentId) -> String {
    let timer = component.client_timer(id);
    let init = component.init_script(id);
    if timer.is_none() && init.is_none() {
        return String::new();
    }

    let mut script = String::from("<script>");
    if let Some(timer) = timer {
        script.push_str(&timer.setup_call(id));
    }
    if let Some(init) = init {
        script.push_str(&init);
    }
    script.push_str("</script>");
    script
}

/// Encode dispatcher output into the wire response body.
pub fn encode_response(actions: &[ResponseAction]) -> String {
    encode_actions(actions)
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Escape `text` for use in markup text or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}
