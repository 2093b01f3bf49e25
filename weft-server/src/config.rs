//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use weft_api::protocol::AppPaths;
use weft_kernel::SessionConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "weft-demo")]
#[command(about = "Weft demo application server", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WEFT_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Application path prefix
    #[arg(long, env = "WEFT_APP_PATH", default_value = "/app/")]
    pub app_path: String,

    /// Idle seconds before a session expires
    #[arg(long = "session-timeout", env = "WEFT_SESSION_TIMEOUT", default_value_t = 30 * 60)]
    pub session_timeout_secs: u64,

    /// Seconds between sweeps evicting expired sessions (0 disables)
    #[arg(long = "reap-interval", env = "WEFT_REAP_INTERVAL", default_value_t = 5 * 60)]
    pub reap_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            app_path: "/app/".to_string(),
            session_timeout_secs: 30 * 60,
            reap_interval_secs: 5 * 60,
        }
    }
}

impl ServerConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_timeout(Duration::from_secs(self.session_timeout_secs))
    }

    pub fn reap_interval(&self) -> Option<Duration> {
        (self.reap_interval_secs > 0).then(|| Duration::from_secs(self.reap_interval_secs))
    }

    pub fn paths(&self) -> AppPaths {
        AppPaths::new(&self.app_path)
    }
}
