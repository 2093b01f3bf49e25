//! Weft Server - HTTP surface for the Weft UI runtime.
//!
//! Serves the application page, the three protocol endpoints and the
//! static runtime script. Sessions live in a [`SessionStore`]; every request
//! for a session runs under that session's lock.

pub mod demo;

mod app;
mod config;
mod error;
mod page;
mod routes;
mod store;

pub use app::App;
pub use config::ServerConfig;
pub use error::ServerError;
pub use page::render_page;
pub use routes::{AppState, router};
pub use store::SessionStore;

use tokio::net::TcpListener;

/// Serve `state` on `listener` until the server fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, app = %state.paths().app, "serving");
    }
    axum::serve(listener, router(state)).await
}
