//! End-to-end tests: a real server on an ephemeral port driven through the
//! reqwest transport, the same way a headless client would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::net::TcpListener;
use weft_api::protocol::AppPaths;
use weft_api::{ComponentId, Event, EventType, ResponseAction, decode_actions};
use weft_client::{ClientRuntime, Document, HttpTransport, Scheduler, SessionStatus, TimerHandle, Transport};
use weft_kernel::widgets::{Button, Label, ListBox, Panel};
use weft_kernel::{Session, SessionMonitor};
use weft_server::{App, AppState, ServerConfig};

// Ids follow insertion order in `TestApp::build`.
const ROOT: ComponentId = ComponentId(1);
const LIST: ComponentId = ComponentId(2);
const LABEL: ComponentId = ComponentId(3);
const SLOW: ComponentId = ComponentId(4);
const MONITOR: ComponentId = ComponentId(5);
const REMOVE: ComponentId = ComponentId(6);

#[derive(Default)]
struct Probe {
    in_flight: AtomicBool,
    overlapped: AtomicBool,
    handled: AtomicUsize,
}

struct TestApp {
    probe: Arc<Probe>,
}

impl App for TestApp {
    fn title(&self) -> &str {
        "e2e"
    }

    fn build(&self, session: &mut Session) -> anyhow::Result<()> {
        let registry = session.registry_mut();
        let root = registry.insert(Panel::new());
        registry.set_root(root)?;
        let list = registry.insert_child(root, ListBox::new(["a", "b", "c"]))?;
        let label = registry.insert_child(root, Label::new(""))?;
        let slow = registry.insert_child(root, Button::new("slow"))?;
        registry.insert_child(root, SessionMonitor::default())?;
        let remove = registry.insert_child(root, Button::new("remove"))?;

        registry.add_handler(list, EventType::Change, move |ctx| {
            let value = ctx
                .get::<ListBox>(list)
                .map(|lb| lb.selected_value().to_string())
                .unwrap_or_default();
            if let Some(l) = ctx.get_mut::<Label>(label) {
                l.set_text(value);
            }
            ctx.mark_dirty(label);
            Ok(())
        })?;

        let probe = Arc::clone(&self.probe);
        registry.add_handler(slow, EventType::Click, move |_| {
            if probe.in_flight.swap(true, Ordering::SeqCst) {
                probe.overlapped.store(true, Ordering::SeqCst);
            }
            std::thread::sleep(Duration::from_millis(20));
            probe.handled.fetch_add(1, Ordering::SeqCst);
            probe.in_flight.store(false, Ordering::SeqCst);
            Ok(())
        })?;

        registry.add_handler(remove, EventType::Click, move |ctx| {
            ctx.registry_mut().remove(label)?;
            ctx.mark_dirty(root);
            ctx.navigate("/app/x");
            Ok(())
        })?;
        Ok(())
    }
}

struct TestServer {
    base_url: String,
    state: AppState,
    probe: Arc<Probe>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let probe = Arc::new(Probe::default());
        let state = AppState::new(
            TestApp {
                probe: Arc::clone(&probe),
            },
            &config,
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let serving = state.clone();
        tokio::spawn(async move {
            weft_server::serve(listener, serving).await.expect("serve");
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
            probe,
        }
    }

    fn client(&self) -> HttpTransport {
        HttpTransport::new(&self.base_url, "/app/").expect("client")
    }

    /// A client with a fresh session already established.
    async fn session(&self) -> (HttpTransport, String) {
        let client = self.client();
        let page = client.load_page().await.expect("page");
        (client, page)
    }
}

#[tokio::test]
async fn page_load_creates_session_and_renders_tree() {
    let server = TestServer::start().await;
    let (client, page) = server.session().await;

    assert!(page.contains("<title>e2e</title>"));
    assert!(page.contains("_pathEvent='/app/e'"));
    assert!(page.contains(&format!("<select id=\"{}\"", LIST)));
    assert!(page.contains("class=\"weft-SessMonitor\""));
    assert!(page.contains(&format!("checkSession({});", MONITOR)));
    assert_eq!(server.state.store().len().await, 1);

    // Loading again reuses the session from the cookie.
    client.load_page().await.expect("reload");
    assert_eq!(server.state.store().len().await, 1);

    let js = client.fetch_runtime().await.expect("runtime");
    assert!(js.contains("function procEresp(text)"));
}

#[tokio::test]
async fn change_event_selects_and_rerenders() {
    let server = TestServer::start().await;
    let (client, _) = server.session().await;

    let event = Event::new(EventType::Change, LIST).with_value("1,");
    let body = client.send_event(&event.to_form()).await.expect("event");
    assert_eq!(
        decode_actions(&body).expect("decode"),
        vec![ResponseAction::MarkDirty(vec![LABEL])]
    );

    let markup = client.render_component(LABEL).await.expect("render");
    assert_eq!(markup, format!("<span id=\"{}\" class=\"weft-Label\">b</span>", LABEL));
}

#[tokio::test]
async fn removed_component_renders_empty_and_events_are_no_ops() {
    let server = TestServer::start().await;
    let (client, _) = server.session().await;

    let body = client
        .send_event(&Event::new(EventType::Click, REMOVE).to_form())
        .await
        .expect("event");
    assert_eq!(body, format!("2,{};1,/app/x", ROOT));

    assert_eq!(client.render_component(LABEL).await.expect("render"), "");
    let body = client
        .send_event(&Event::new(EventType::Change, LABEL).to_form())
        .await
        .expect("event");
    assert_eq!(body, "0");
}

#[tokio::test]
async fn session_check_reports_remaining_time() {
    let server = TestServer::start().await;
    let (client, _) = server.session().await;
    let remaining = client.check_session().await.expect("check");
    assert!(remaining > 1790.0 && remaining <= 1800.0);

    let stranger = server.client();
    assert_eq!(stranger.check_session().await.expect("check"), -1.0);
}

#[tokio::test]
async fn events_without_session_force_reload() {
    let server = TestServer::start().await;
    let stranger = server.client();
    let body = stranger
        .send_event(&Event::new(EventType::Click, SLOW).to_form())
        .await
        .expect("event");
    assert_eq!(body, "1");
    assert_eq!(stranger.render_component(LABEL).await.expect("render"), "");
}

#[tokio::test]
async fn events_for_expired_session_force_reload_and_evict() {
    let server = TestServer::start_with(ServerConfig {
        session_timeout_secs: 1,
        ..ServerConfig::default()
    })
    .await;
    let (client, _) = server.session().await;
    assert!(client.check_session().await.expect("check") > 0.0);

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert!(client.check_session().await.expect("check") < 0.0);

    let body = client
        .send_event(&Event::new(EventType::Click, SLOW).to_form())
        .await
        .expect("event");
    assert_eq!(body, "1");
    assert_eq!(server.probe.handled.load(Ordering::SeqCst), 0);

    assert_eq!(client.check_session().await.expect("check"), -1.0);
    assert!(server.state.store().is_empty().await);
}

#[tokio::test]
async fn malformed_event_is_rejected() {
    let server = TestServer::start().await;
    let (client, _) = server.session().await;
    let mut form = Event::new(EventType::Click, SLOW).to_form();
    form.event_type = Some("77".to_string());
    let err = client.send_event(&form).await.expect_err("bad request");
    assert!(matches!(err, weft_client::ClientError::Status(400)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn events_for_one_session_are_serialized() {
    let server = TestServer::start().await;
    let (client, _) = server.session().await;

    let sends = (0..8).map(|_| {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .send_event(&Event::new(EventType::Click, SLOW).to_form())
                .await
        })
    });
    for send in sends.collect::<Vec<_>>() {
        assert_eq!(send.await.expect("join").expect("event"), "0");
    }

    assert_eq!(server.probe.handled.load(Ordering::SeqCst), 8);
    assert!(!server.probe.overlapped.load(Ordering::SeqCst));
}

#[derive(Default)]
struct Page {
    elements: std::collections::HashMap<ComponentId, String>,
    statuses: Vec<(ComponentId, SessionStatus)>,
    navigations: Vec<String>,
}

impl Document for Page {
    fn contains(&self, id: ComponentId) -> bool {
        self.elements.contains_key(&id)
    }

    fn active_element(&self) -> Option<ComponentId> {
        None
    }

    fn replace_outer_html(&mut self, id: ComponentId, markup: &str) {
        self.elements.insert(id, markup.to_string());
    }

    fn scripts(&self, id: ComponentId) -> Vec<String> {
        self.elements
            .get(&id)
            .map(|m| {
                weft_client::script::extract_scripts(m)
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn focus(&mut self, id: ComponentId) -> bool {
        self.elements.contains_key(&id)
    }

    fn show_session_status(&mut self, id: ComponentId, status: SessionStatus) {
        self.statuses.push((id, status));
    }

    fn navigate(&mut self, path: &str) {
        self.navigations.push(path.to_string());
    }

    fn reload(&mut self) {}

    fn alert(&mut self, message: &str) {
        panic!("unexpected alert: {}", message);
    }
}

#[derive(Default)]
struct Timers(u64);

impl Scheduler for Timers {
    fn start(&mut self, _id: ComponentId, _timeout: Duration, _repeat: bool) -> TimerHandle {
        self.0 += 1;
        TimerHandle(self.0)
    }

    fn cancel(&mut self, _handle: TimerHandle, _repeat: bool) {}
}

#[tokio::test]
async fn client_runtime_round_trip() {
    let server = TestServer::start().await;
    let (client, page_html) = server.session().await;

    let mut page = Page::default();
    for id in [ROOT, LIST, LABEL, SLOW, MONITOR, REMOVE] {
        page.elements.insert(id, String::new());
    }
    let mut runtime = ClientRuntime::new(client, page, Timers::default(), AppPaths::new("/app/"));
    runtime.load(&page_html).await.expect("load");

    assert_eq!(runtime.timers().len(), 1);
    assert!(matches!(
        runtime.document().statuses.as_slice(),
        [(MONITOR, SessionStatus::Minutes(30))]
    ));

    runtime
        .send_event(Event::new(EventType::Change, LIST).with_value("2"))
        .await
        .expect("event");
    assert_eq!(
        runtime.document().elements[&LABEL],
        format!("<span id=\"{}\" class=\"weft-Label\">c</span>", LABEL)
    );

    runtime
        .send_event(Event::new(EventType::Click, REMOVE))
        .await
        .expect("event");
    assert_eq!(runtime.document().navigations, vec!["/app/x".to_string()]);
    // The root re-render re-ran the monitor's inline scripts.
    assert_eq!(runtime.document().statuses.len(), 2);
}
