//! Integration tests for event dispatch against a live session tree.
//!
//! Each test builds a small page (panel, list box, label, button) the way an
//! application would, then feeds decoded client events through
//! `Session::dispatch` and checks the directives that come back.

use std::time::Duration;

use weft_api::{
    ComponentId, Event, EventForm, EventType, ResponseAction, decode_actions, protocol::params,
};
use weft_kernel::widgets::{Button, Label, ListBox, Panel};
use weft_kernel::{
    Session, SessionConfig, SessionMonitor, check_session_time_remaining, encode_response,
};

/// A session with a fixed page and the ids tests need to address.
struct PageTest {
    session: Session,
    root: ComponentId,
    list: ComponentId,
    label: ComponentId,
    button: ComponentId,
}

impl PageTest {
    fn new() -> Self {
        let mut session = Session::new(SessionConfig::default());
        let registry = session.registry_mut();
        let root = registry.insert(Panel::new());
        registry.set_root(root).expect("root");
        let list = registry
            .insert_child(root, ListBox::new(["a", "b", "c"]))
            .expect("list");
        let label = registry
            .insert_child(root, Label::new(""))
            .expect("label");
        let button = registry
            .insert_child(root, Button::new("Go"))
            .expect("button");
        Self {
            session,
            root,
            list,
            label,
            button,
        }
    }

    fn send(&mut self, event: Event) -> Vec<ResponseAction> {
        self.session.dispatch(&event)
    }
}

#[test]
fn list_box_value_is_consumed_before_handlers() {
    let mut page = PageTest::new();
    let (list, label) = (page.list, page.label);
    page.session
        .registry_mut()
        .add_handler(list, EventType::Change, move |ctx| {
            let selected = ctx
                .get::<ListBox>(list)
                .map(|lb| lb.selected_value().to_string())
                .unwrap_or_default();
            if let Some(l) = ctx.get_mut::<Label>(label) {
                l.set_text(selected);
            }
            ctx.mark_dirty(label);
            Ok(())
        })
        .expect("handler");

    let actions = page.send(Event::new(EventType::Change, list).with_value("1"));

    let lb = page.session.registry().get::<ListBox>(list).expect("list box");
    assert_eq!(lb.selected_value(), "b");
    assert_eq!(lb.selected_indices(), vec![1]);
    assert_eq!(actions, vec![ResponseAction::MarkDirty(vec![label])]);
    let html = page.session.render(label).expect("label renders");
    assert!(html.contains(">b</span>"));
}

#[test]
fn value_is_consumed_even_without_handlers() {
    let mut page = PageTest::new();
    let actions = page.send(Event::new(EventType::Change, page.list).with_value("2"));
    assert_eq!(actions, vec![ResponseAction::NoAction]);
    let lb = page.session.registry().get::<ListBox>(page.list).expect("list box");
    assert_eq!(lb.selected_value(), "c");
}

#[test]
fn removed_component_degrades_to_no_action() {
    let mut page = PageTest::new();
    let button = page.button;
    page.session
        .registry_mut()
        .add_handler(button, EventType::Click, |ctx| {
            ctx.reload_window();
            Ok(())
        })
        .expect("handler");
    page.session.registry_mut().remove(button).expect("remove");

    let actions = page.send(Event::new(EventType::Click, button));
    assert_eq!(actions, vec![ResponseAction::NoAction]);
    assert_eq!(encode_response(&actions), "0");
    assert!(page.session.render(button).is_none());
}

#[test]
fn dirty_marks_precede_reload() {
    let mut page = PageTest::new();
    let button = page.button;
    let extra: Vec<ComponentId> = (0..4)
        .map(|i| {
            page.session
                .registry_mut()
                .insert_child(page.root, Label::new(format!("extra {}", i)))
                .expect("extra")
        })
        .collect();
    let (first, second) = (extra[0], extra[3]);
    page.session
        .registry_mut()
        .add_handler(button, EventType::Click, move |ctx| {
            ctx.mark_dirty(second);
            ctx.mark_dirty(first);
            ctx.navigate("/app/x");
            Ok(())
        })
        .expect("handler");

    let actions = page.send(Event::new(EventType::Click, button));
    assert_eq!(
        actions,
        vec![
            ResponseAction::MarkDirty(vec![first, second]),
            ResponseAction::ReloadWindow(Some("/app/x".to_string())),
        ]
    );

    let body = encode_response(&actions);
    assert_eq!(body, format!("2,{},{};1,/app/x", first, second));
    assert_eq!(decode_actions(&body).expect("decode"), actions);
}

#[test]
fn dirty_child_is_covered_by_dirty_parent() {
    let mut page = PageTest::new();
    let (root, label, button) = (page.root, page.label, page.button);
    page.session
        .registry_mut()
        .add_handler(button, EventType::Click, move |ctx| {
            ctx.mark_dirty(label);
            ctx.mark_dirty(root);
            Ok(())
        })
        .expect("handler");

    let actions = page.send(Event::new(EventType::Click, button));
    assert_eq!(actions, vec![ResponseAction::MarkDirty(vec![root])]);
}

#[test]
fn hidden_component_is_not_found() {
    let mut page = PageTest::new();
    let button = page.button;
    page.session
        .registry_mut()
        .add_handler(button, EventType::Click, |ctx| {
            ctx.reload_window();
            Ok(())
        })
        .expect("handler");
    page.session
        .registry_mut()
        .set_hidden(button, true)
        .expect("hide");

    let actions = page.send(Event::new(EventType::Click, button));
    assert_eq!(actions, vec![ResponseAction::NoAction]);
}

#[test]
fn handlers_can_restructure_the_tree() {
    let mut page = PageTest::new();
    let (root, button, label) = (page.root, page.button, page.label);
    page.session
        .registry_mut()
        .add_handler(button, EventType::Click, move |ctx| {
            ctx.registry_mut().remove(label)?;
            let fresh = ctx
                .registry_mut()
                .insert_child(root, Label::new("replacement"))?;
            ctx.mark_dirty(root);
            ctx.focus(fresh);
            Ok(())
        })
        .expect("handler");

    let actions = page.send(Event::new(EventType::Click, button));
    let fresh = match actions.as_slice() {
        [ResponseAction::MarkDirty(ids), ResponseAction::FocusComponent(fresh)] => {
            assert_eq!(ids, &vec![root]);
            *fresh
        }
        other => panic!("unexpected actions: {:?}", other),
    };
    assert!(fresh > label);

    let html = page.session.render(root).expect("root renders");
    assert!(html.contains("replacement"));
    assert!(!html.contains(&format!("id=\"{}\"", label)));
}

#[test]
fn events_decode_from_form_fields() {
    let mut page = PageTest::new();
    let form = EventForm {
        event_type: Some(EventType::Change.code().to_string()),
        comp_id: Some(page.list.to_string()),
        comp_value: Some("0".to_string()),
        focused_comp_id: Some(page.list.to_string()),
        mod_keys: Some("not a number".to_string()),
        ..Default::default()
    };
    let event = Event::from_form(&form).expect("valid form");
    assert_eq!(event.target, page.list);
    page.send(event);

    assert_eq!(page.session.focused(), Some(page.list));
    let lb = page.session.registry().get::<ListBox>(page.list).expect("list box");
    assert_eq!(lb.selected_value(), "a");
    assert_eq!(params::COMP_VALUE, "cval");
}

#[tokio::test(start_paused = true)]
async fn session_monitor_reports_remaining_time() {
    let config = SessionConfig::default().with_timeout(Duration::from_secs(60));
    let mut session = Session::new(config);
    let monitor = session.registry_mut().insert(SessionMonitor::default());
    session.set_root(monitor).expect("root");

    tokio::time::advance(Duration::from_secs(15)).await;
    assert!((check_session_time_remaining(&session) - 45.0).abs() < 0.01);

    session.render(monitor).expect("monitor renders");
    assert!((check_session_time_remaining(&session) - 60.0).abs() < 0.01);

    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(check_session_time_remaining(&session) < 0.0);
}
