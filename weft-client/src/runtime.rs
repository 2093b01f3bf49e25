//! Client runtime: applies server directives to a document.

use weft_api::protocol::AppPaths;
use weft_api::{ComponentId, Event, ProtocolError, ResponseAction, split_directives};

use crate::document::Document;
use crate::error::ClientError;
use crate::script::{ScriptCall, extract_scripts, parse_script};
use crate::status::SessionStatus;
use crate::timers::{Scheduler, TimerTable};
use crate::transport::Transport;

/// One page's worth of client state: the document, the timer table and the
/// initial focus target. Nothing else is kept between events.
pub struct ClientRuntime<T, D, S> {
    transport: T,
    document: D,
    scheduler: S,
    timers: TimerTable,
    paths: AppPaths,
    initial_focus: Option<ComponentId>,
}

impl<T, D, S> ClientRuntime<T, D, S>
where
    T: Transport,
    D: Document,
    S: Scheduler,
{
    pub fn new(transport: T, document: D, scheduler: S, paths: AppPaths) -> Self {
        Self {
            transport,
            document,
            scheduler,
            timers: TimerTable::new(),
            paths,
            initial_focus: None,
        }
    }

    /// Component focused on page load and used as the fallback focus target
    /// after a re-render.
    pub fn with_initial_focus(mut self, id: Option<ComponentId>) -> Self {
        self.initial_focus = id;
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn timers(&self) -> &TimerTable {
        &self.timers
    }

    /// Page load: run the page's inline scripts, then apply the initial focus.
    pub async fn load(&mut self, page: &str) -> Result<(), ClientError> {
        for script in extract_scripts(page) {
            self.run_script(script).await?;
        }
        if let Some(id) = self.initial_focus {
            self.focus_component(id);
        }
        Ok(())
    }

    /// Page unload: tear down every timer.
    pub fn unload(&mut self) {
        self.timers.clear_all(&mut self.scheduler);
    }

    /// Send an event and apply the response. The currently focused element
    /// is reported unless the event already names one.
    pub async fn send_event(&mut self, mut event: Event) -> Result<Vec<ResponseAction>, ClientError> {
        if event.focused.is_none() {
            event.focused = self.document.active_element();
        }
        let body = self.transport.send_event(&event.to_form()).await?;
        self.process_response(&body).await
    }

    /// Apply a directive list in order. Returns the directives applied.
    ///
    /// An empty body and unknown directive codes are shown to the user; the
    /// remaining directives still run after an unknown code.
    pub async fn process_response(&mut self, body: &str) -> Result<Vec<ResponseAction>, ClientError> {
        let directives = match split_directives(body) {
            Ok(directives) => directives,
            Err(error) => {
                tracing::warn!(%error, "empty event response");
                self.document.alert(&error.to_string());
                return Err(error.into());
            }
        };

        let mut applied = Vec::with_capacity(directives.len());
        for directive in directives {
            match ResponseAction::decode(directive) {
                Ok(action) => {
                    self.apply(&action).await?;
                    applied.push(action);
                }
                Err(error @ ProtocolError::UnknownCode(_)) => {
                    tracing::warn!(%error, "unknown directive");
                    self.document.alert(&error.to_string());
                }
                Err(error) => {
                    tracing::warn!(%error, directive, "skipping malformed directive");
                }
            }
        }
        Ok(applied)
    }

    async fn apply(&mut self, action: &ResponseAction) -> Result<(), ClientError> {
        match action {
            ResponseAction::NoAction => {}
            ResponseAction::MarkDirty(ids) => {
                for id in ids {
                    self.rerender(*id).await?;
                }
            }
            ResponseAction::FocusComponent(id) => {
                self.focus_component(*id);
            }
            ResponseAction::ReloadWindow(Some(path)) => {
                let target = self.paths.resolve_reload(path);
                self.document.navigate(&target);
            }
            ResponseAction::ReloadWindow(None) => self.document.reload(),
        }
        Ok(())
    }

    /// Replace a component with fresh markup from the server.
    ///
    /// Components missing from the page and empty responses are skipped.
    /// Focus returns to the element that had it, or to the initial focus
    /// target; scripts inside the new markup run afterwards.
    pub async fn rerender(&mut self, id: ComponentId) -> Result<bool, ClientError> {
        if !self.document.contains(id) {
            tracing::debug!(component = %id, "re-render target not in page");
            return Ok(false);
        }
        let markup = self.transport.render_component(id).await?;
        if markup.is_empty() {
            tracing::debug!(component = %id, "component gone on server");
            return Ok(false);
        }

        let focused = self.document.active_element().or(self.initial_focus);
        self.document.replace_outer_html(id, &markup);
        if let Some(focused) = focused {
            self.focus_component(focused);
        }

        for script in self.document.scripts(id) {
            self.run_script(&script).await?;
        }
        Ok(true)
    }

    pub fn focus_component(&mut self, id: ComponentId) -> bool {
        self.document.focus(id)
    }

    /// Poll the session and update the monitor `id`. Skipped when the
    /// monitor is not in the page.
    pub async fn check_session(&mut self, id: ComponentId) -> Result<Option<SessionStatus>, ClientError> {
        if !self.document.contains(id) {
            return Ok(None);
        }
        let remaining = self.transport.check_session().await?;
        let status = SessionStatus::from_remaining(remaining);
        self.document.show_session_status(id, status);
        Ok(Some(status))
    }

    /// Evaluate the runtime calls in an inline script.
    pub async fn run_script(&mut self, src: &str) -> Result<(), ClientError> {
        for call in parse_script(src) {
            match call {
                ScriptCall::SetupTimer { id, spec } => {
                    self.timers.setup(&mut self.scheduler, id, spec);
                }
                ScriptCall::CheckSession(id) => {
                    self.check_session(id).await?;
                }
            }
        }
        Ok(())
    }

    /// Run the script of the timer installed for `id`, as the scheduler would
    /// when it fires. Returns false when no timer is installed.
    pub async fn fire_timer(&mut self, id: ComponentId) -> Result<bool, ClientError> {
        let Some(js) = self.timers.get(id).map(|spec| spec.js.clone()) else {
            return Ok(false);
        };
        self.run_script(&js).await?;
        Ok(true)
    }
}
