//! Demo application: a list box whose selection is echoed by a label, a
//! button clearing the selection, and a session monitor.

use weft_api::EventType;
use weft_kernel::widgets::{Button, Label, ListBox, Panel};
use weft_kernel::{Session, SessionMonitor};

use crate::app::App;

pub const COLORS: [&str; 4] = ["Red", "Green", "Blue", "Yellow"];

#[derive(Debug, Default)]
pub struct DemoApp;

fn describe(list: &ListBox) -> String {
    let selected: Vec<&str> = list.selected_values().collect();
    if selected.is_empty() {
        "Nothing selected".to_string()
    } else {
        format!("Selected: {}", selected.join(", "))
    }
}

impl App for DemoApp {
    fn title(&self) -> &str {
        "Weft demo"
    }

    fn build(&self, session: &mut Session) -> anyhow::Result<()> {
        let period = session.config().monitor_period;
        let registry = session.registry_mut();

        let root = registry.insert(Panel::new());
        registry.set_root(root)?;

        let mut colors = ListBox::new(COLORS);
        colors.set_multi(true);
        colors.set_rows(COLORS.len() as u32);
        let list = registry.insert_child(root, colors)?;
        let label = registry.insert_child(root, Label::new("Nothing selected"))?;
        let clear = registry.insert_child(root, Button::new("Clear"))?;
        registry.insert_child(root, SessionMonitor::new(period))?;

        registry.add_handler(list, EventType::Change, move |ctx| {
            let text = ctx.get::<ListBox>(list).map(describe).unwrap_or_default();
            if let Some(l) = ctx.get_mut::<Label>(label) {
                l.set_text(text);
            }
            ctx.mark_dirty(label);
            Ok(())
        })?;

        registry.add_handler(clear, EventType::Click, move |ctx| {
            if let Some(lb) = ctx.get_mut::<ListBox>(list) {
                lb.clear_selected();
            }
            if let Some(l) = ctx.get_mut::<Label>(label) {
                l.set_text("Nothing selected");
            }
            ctx.mark_dirty(list);
            ctx.mark_dirty(label);
            ctx.focus(list);
            Ok(())
        })?;

        Ok(())
    }
}
