use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::quota::DEFAULT_PAGEVIEW_LIMIT;
use crate::session::DEFAULT_SESSION_TTL;

/// Startup configuration. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub pageview_limit: u32,
    pub session_ttl: Duration,
    /// JSON catalog to load at startup; the built-in demo catalog when `None`.
    pub seed: Option<PathBuf>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            pageview_limit: DEFAULT_PAGEVIEW_LIMIT,
            session_ttl: DEFAULT_SESSION_TTL,
            seed: None,
            debug: false,
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        format!("pageview_gate={level},tower_http={level}")
    }
}
