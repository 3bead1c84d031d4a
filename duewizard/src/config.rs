//! Runtime configuration for the wizard server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::ai::ProviderSettings;

pub const DEFAULT_PORT: u16 = 58240;
pub const DEFAULT_CANVAS_URL: &str = "https://mdc.instructure.com/api/v1";
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 12 * 60;

/// Where wizard sessions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// In process memory; lost on restart.
    Memory,
    /// One JSON file per session under this directory.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub sessions: SessionBackend,
    /// Sessions not saved for this long are dropped.
    pub session_idle: Duration,
    /// Pre-filled into the Canvas URL field on step 3.
    pub canvas_default_url: String,
    pub providers: ProviderSettings,
}

impl ServerConfig {
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Browser-friendly URL for the listening address.
    pub fn url(&self) -> String {
        let host = if self.bind.is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.bind
        };
        format!("http://{}", SocketAddr::new(host, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            sessions: SessionBackend::Memory,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
            canvas_default_url: DEFAULT_CANVAS_URL.to_string(),
            providers: ProviderSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_loopback_for_wildcard_bind() {
        let config = ServerConfig {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };
        assert_eq!(config.url(), "http://127.0.0.1:58240");
        assert_eq!(config.addr().to_string(), "0.0.0.0:58240");
    }
}
