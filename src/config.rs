//! Server configuration from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_THINKING_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Simulated assistant "thinking" time before a new pipeline appears
    pub thinking_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            thinking_delay: Duration::from_millis(DEFAULT_THINKING_MS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: parse_or("FLOW_ARCHITECT_HOST", &lookup, defaults.host),
            port: parse_or("FLOW_ARCHITECT_PORT", &lookup, defaults.port),
            thinking_delay: Duration::from_millis(parse_or(
                "FLOW_ARCHITECT_THINKING_MS",
                &lookup,
                DEFAULT_THINKING_MS,
            )),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting, using default");
            default
        }),
    }
}
