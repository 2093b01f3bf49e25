//! Weft Client - The browser-side half of the protocol.
//!
//! Two renditions of the same runtime live here:
//! - [`browser::runtime_js`], the JavaScript served to real browsers
//! - [`ClientRuntime`], a Rust model of the same decisions driving an
//!   abstract [`Document`] over an abstract [`Transport`]
//!
//! [`HttpTransport`] talks to a real server and is what the end-to-end tests
//! (and any headless client) use.

pub mod browser;
pub mod script;

mod document;
mod error;
mod http;
mod runtime;
mod status;
mod timers;
mod transport;

pub use document::Document;
pub use error::ClientError;
pub use http::HttpTransport;
pub use runtime::ClientRuntime;
pub use status::SessionStatus;
pub use timers::{Scheduler, TimerChange, TimerHandle, TimerTable};
pub use transport::Transport;
