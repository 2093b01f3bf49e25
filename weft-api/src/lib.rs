//! Weft API - Shared types and wire protocol for the Weft UI runtime.
//!
//! Everything in this crate is schema: the server encoder and the browser
//! runtime decoder both derive their constants from here, so the two halves
//! of the protocol cannot drift apart.

mod action;
mod component_id;
mod error;
mod event;
mod timer;

pub mod protocol;

pub use action::*;
pub use component_id::*;
pub use error::*;
pub use event::*;
pub use timer::*;
