//! Weft Kernel - The server-side UI runtime core.
//!
//! This crate owns everything that happens between a decoded client event
//! and an encoded response:
//! - Component capability traits and the per-session registry
//! - Dirty tracking (at most one render per dirty component per response)
//! - Event dispatch under session-exclusive access
//! - The render pipeline and markup writer
//! - Session liveness and the session monitor component
//! - A small set of built-in widgets

pub mod component;
pub mod dirty;
pub mod dispatch;
pub mod monitor;
pub mod registry;
pub mod render;
pub mod session;
pub mod widgets;

mod config;
mod error;

pub use component::{Capabilities, Component, ConsumesValue, EnabledState, HasEnabled};
pub use config::SessionConfig;
pub use dirty::DirtyTracker;
pub use dispatch::{EventContext, EventHandler, dispatch};
pub use error::KernelError;
pub use monitor::{SessionMonitor, check_session_time_remaining};
pub use registry::ComponentRegistry;
pub use render::{Writer, encode_response, render_component};
pub use session::{Session, SessionId};
