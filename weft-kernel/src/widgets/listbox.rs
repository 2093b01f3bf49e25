use weft_api::{ComponentId, EventType};

use crate::component::{Capabilities, Component, ConsumesValue, EnabledState, HasEnabled};
use crate::render::Writer;

/// Selection list rendered as a `<select>`.
///
/// `selected` always has the same length as `values`; setters ignore
/// out-of-range indices instead of growing or panicking.
#[derive(Debug, Clone)]
pub struct ListBox {
    values: Vec<String>,
    selected: Vec<bool>,
    multi: bool,
    rows: u32,
    enabled: EnabledState,
}

impl ListBox {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        Self {
            selected: vec![false; values.len()],
            values,
            multi: false,
            rows: 1,
            enabled: EnabledState::default(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn multi(&self) -> bool {
        self.multi
    }

    pub fn set_multi(&mut self, multi: bool) {
        self.multi = multi;
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn set_rows(&mut self, rows: u32) {
        self.rows = rows;
    }

    /// First selected value, or `""` when nothing is selected.
    pub fn selected_value(&self) -> &str {
        self.selected_values().next().unwrap_or("")
    }

    pub fn selected_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.values
            .iter()
            .zip(&self.selected)
            .filter(|(_, s)| **s)
            .map(|(v, _)| v.as_str())
    }

    /// Whether index `i` is selected. Out of range is never selected.
    pub fn selected(&self, i: usize) -> bool {
        self.selected.get(i).copied().unwrap_or(false)
    }

    /// First selected index.
    pub fn selected_idx(&self) -> Option<usize> {
        self.selected.iter().position(|s| *s)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.then_some(i))
            .collect()
    }

    pub fn set_selected(&mut self, i: usize, selected: bool) {
        match self.selected.get_mut(i) {
            Some(slot) => *slot = selected,
            None => tracing::warn!(
                index = i,
                len = self.values.len(),
                "ignoring out-of-range list box index"
            ),
        }
    }

    /// Replace the selection with exactly `indices`.
    pub fn set_selected_indices(&mut self, indices: &[usize]) {
        self.clear_selected();
        for &i in indices {
            self.set_selected(i, true);
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected.fill(false);
    }
}

impl HasEnabled for ListBox {
    fn enabled(&self) -> bool {
        self.enabled.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled.set_enabled(enabled);
    }
}

impl ConsumesValue for ListBox {
    /// Parse the comma-separated selected indices sent by the client.
    /// An empty value leaves the selection alone; unparsable entries are
    /// skipped.
    fn consume_value(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.clear_selected();
        for part in value.split(',') {
            match part.trim().parse::<usize>() {
                Ok(i) => self.set_selected(i, true),
                Err(_) => tracing::debug!(entry = part, "skipping malformed selection index"),
            }
        }
    }
}

impl Component for ListBox {
    fn render(&self, id: ComponentId, w: &mut Writer<'_>) {
        w.start_tag("select", id, Some("weft-ListBox"));
        if self.multi {
            w.attr("multiple", "multiple");
        }
        w.attr("size", &self.rows.to_string());
        self.enabled.render(w);
        w.event_attrs(id).write(">");

        for (value, selected) in self.values.iter().zip(&self.selected) {
            if *selected {
                w.write("<option selected=\"selected\">");
            } else {
                w.write("<option>");
            }
            w.text(value).write("</option>");
        }
        w.write("</select>");
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ENABLED | Capabilities::EVENTS | Capabilities::CLIENT_VALUE
    }

    fn enabled_state(&self) -> Option<&dyn HasEnabled> {
        Some(&self.enabled)
    }

    fn enabled_state_mut(&mut self) -> Option<&mut dyn HasEnabled> {
        Some(&mut self.enabled)
    }

    fn value_consumer(&mut self) -> Option<&mut dyn ConsumesValue> {
        Some(self)
    }

    fn sync_on(&self) -> &'static [EventType] {
        &[EventType::Change]
    }

    fn value_js(&self) -> Option<&'static str> {
        Some("selIdxs(this)")
    }
}
