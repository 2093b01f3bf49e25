//! Server error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use weft_api::ProtocolError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("application failed to build the session: {0}")]
    App(#[from] anyhow::Error),

    #[error("application did not set a root component")]
    MissingRoot,

    #[error("invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Protocol(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "bad request");
        }
        (status, self.to_string()).into_response()
    }
}
