//! Request transport between the runtime and the server.

use weft_api::{ComponentId, EventForm};

use crate::error::ClientError;

/// The three protocol exchanges.
///
/// `render_component` and `check_session` are awaited by the runtime before
/// it touches the document again, which gives them the ordering of a
/// synchronous call.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Submit an event; returns the raw directive list.
    async fn send_event(&self, form: &EventForm) -> Result<String, ClientError>;

    /// Fetch the markup of one component. Empty when the component is gone.
    async fn render_component(&self, id: ComponentId) -> Result<String, ClientError>;

    /// Remaining session time in seconds, negative when expired.
    async fn check_session(&self) -> Result<f64, ClientError>;
}
