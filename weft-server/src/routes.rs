//! HTTP routes.

use std::sync::Arc;

use axum::Form;
use axum::Router;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use weft_api::protocol::{AppPaths, SESSION_COOKIE};
use weft_api::{Event, EventForm, RenderForm, ResponseAction};
use weft_kernel::{SessionId, check_session_time_remaining, encode_response};

use crate::app::App;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::page::render_page;
use crate::store::SessionStore;

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<SessionStore>,
    app: Arc<dyn App>,
    paths: Arc<AppPaths>,
    runtime_js: Arc<str>,
}

impl AppState {
    pub fn new(app: impl App, config: &ServerConfig) -> Self {
        Self {
            store: Arc::new(SessionStore::new(config.session_config())),
            app: Arc::new(app),
            paths: Arc::new(config.paths()),
            runtime_js: weft_client::browser::runtime_js().into(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }
}

pub fn router(state: AppState) -> Router {
    let paths = Arc::clone(&state.paths);
    Router::new()
        .route(&paths.app, get(page))
        .route(&paths.event, post(event))
        .route(&paths.render_comp, post(render_comp))
        .route(&paths.session_check, get(session_check))
        .route(&paths.runtime_js, get(runtime_script))
        .with_state(state)
}

fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

fn session_cookie(id: SessionId, paths: &AppPaths) -> Result<HeaderValue, ServerError> {
    let cookie = format!(
        "{}={}; Path={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id, paths.app
    );
    Ok(HeaderValue::from_str(&cookie)?)
}

async fn page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ServerError> {
    let existing = match session_id(&headers) {
        Some(id) => state.store.acquire(id).await,
        None => None,
    };
    let (mut session, created) = match existing {
        Some(session) => (session, false),
        None => (state.store.create(state.app.as_ref()).await?, true),
    };

    session.access();
    let html = render_page(&mut session, &state.paths, state.app.title());
    let mut response = Html(html).into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if created {
        tracing::info!(session = %session.id(), "new session");
        response
            .headers_mut()
            .insert(SET_COOKIE, session_cookie(session.id(), &state.paths)?);
    }
    Ok(response)
}

async fn event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EventForm>,
) -> Result<String, ServerError> {
    let event = Event::from_form(&form)?;
    let session = match session_id(&headers) {
        Some(id) => state.store.acquire(id).await,
        None => None,
    };
    let Some(mut session) = session else {
        tracing::debug!(component = %event.target, "event without live session, forcing reload");
        return Ok(encode_response(&[ResponseAction::ReloadWindow(None)]));
    };

    let actions = session.dispatch(&event);
    Ok(encode_response(&actions))
}

async fn render_comp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RenderForm>,
) -> Result<Html<String>, ServerError> {
    let id = form.component_id()?;
    let session = match session_id(&headers) {
        Some(sid) => state.store.acquire(sid).await,
        None => None,
    };
    let markup = match session {
        Some(mut session) => session.render(id).unwrap_or_default(),
        None => String::new(),
    };
    Ok(Html(markup))
}

/// Remaining seconds for the caller's session. Does not count as activity,
/// and reports the real (negative) value for expired sessions.
async fn session_check(State(state): State<AppState>, headers: HeaderMap) -> String {
    let session = match session_id(&headers) {
        Some(id) => state.store.lookup(id).await,
        None => None,
    };
    let remaining = match session {
        Some(session) => check_session_time_remaining(&*session.lock().await),
        None => -1.0,
    };
    remaining.to_string()
}

async fn runtime_script(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/javascript; charset=utf-8")],
        state.runtime_js.to_string(),
    )
}
