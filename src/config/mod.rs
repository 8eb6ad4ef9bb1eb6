use std::env;
use std::net::SocketAddr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

use crate::checkin::EngineConfig;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3001);
const DEFAULT_CHECK_IN_WINDOW_HOURS: i64 = 4;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 3000;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Events carry no stored end time; check-in closes this many hours
    /// after the event's start.
    pub check_in_window_hours: i64,
    pub store_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/gatecheck".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR)),
            check_in_window_hours: parse_env("CHECK_IN_WINDOW_HOURS")
                .unwrap_or(DEFAULT_CHECK_IN_WINDOW_HOURS),
            store_timeout_ms: parse_env("STORE_TIMEOUT_MS").unwrap_or(DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            check_in_window: chrono::Duration::hours(self.check_in_window_hours),
            store_timeout: std::time::Duration::from_millis(self.store_timeout_ms),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Config: invalid value for {name}, using default");
            None
        }
    }
}
