//! Protocol error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("missing form field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for form field {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("No response received!")]
    EmptyResponse,

    #[error("Unknown response code:{0}")]
    UnknownCode(String),

    #[error("malformed directive: {0:?}")]
    MalformedDirective(String),
}
