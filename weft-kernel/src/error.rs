//! Kernel error types.

use thiserror::Error;
use weft_api::ComponentId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("component not found: {0}")]
    ComponentNotFound(ComponentId),

    #[error("component {id} does not accept {capability}")]
    MissingCapability {
        id: ComponentId,
        capability: &'static str,
    },

    #[error("invalid tree operation: {0}")]
    InvalidTree(String),
}
