//! Weft demo server.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use weft_server::demo::DemoApp;
use weft_server::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::parse();
    let state = AppState::new(DemoApp, &config);

    if let Some(interval) = config.reap_interval() {
        state.store().clone().spawn_reaper(interval);
    }

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("Starting Weft demo at http://{}{}", config.addr, state.paths().app);

    weft_server::serve(listener, state).await?;
    Ok(())
}
