//! HTTP transport backed by reqwest.

use reqwest::{Client, Response};
use weft_api::protocol::AppPaths;
use weft_api::{ComponentId, EventForm, RenderForm};

use crate::error::ClientError;
use crate::transport::Transport;

/// Talks to a weft server the way a browser would, keeping the session
/// cookie between requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    paths: AppPaths,
}

impl HttpTransport {
    /// `base_url` is scheme and authority (e.g. `http://127.0.0.1:8080`);
    /// `app_path` is the application path on that server.
    pub fn new(base_url: impl Into<String>, app_path: &str) -> Result<Self, ClientError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            paths: AppPaths::new(app_path),
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET the application page. Establishes the session cookie.
    pub async fn load_page(&self) -> Result<String, ClientError> {
        let response = self.client.get(self.url(&self.paths.app)).send().await?;
        text(response).await
    }

    /// GET the static runtime script.
    pub async fn fetch_runtime(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .get(self.url(&self.paths.runtime_js))
            .send()
            .await?;
        text(response).await
    }
}

async fn text(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send_event(&self, form: &EventForm) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(&self.paths.event))
            .form(form)
            .send()
            .await?;
        text(response).await
    }

    async fn render_component(&self, id: ComponentId) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(&self.paths.render_comp))
            .form(&RenderForm::new(id))
            .send()
            .await?;
        text(response).await
    }

    async fn check_session(&self) -> Result<f64, ClientError> {
        let response = self
            .client
            .get(self.url(&self.paths.session_check))
            .send()
            .await?;
        let body = text(response).await?;
        match body.trim().parse::<f64>() {
            Ok(secs) => Ok(secs),
            Err(_) => Err(ClientError::InvalidSessionCheck(body)),
        }
    }
}
