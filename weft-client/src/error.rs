//! Client error types.

use thiserror::Error;
use weft_api::ProtocolError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("invalid session check response: {0:?}")]
    InvalidSessionCheck(String),
}
