//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{ttl_from_parts, MAX_CAPACITY};

const DEFAULT_MAX_ENTRIES: usize = 256;
const DEFAULT_TTL_DAYS: i64 = 1;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of slots in the cache ring
    pub max_entries: usize,
    /// Entry lifetime; zero means entries never expire
    pub ttl: Duration,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Cache capacity in entries (default: 256, clamped to
    ///   `1..=MAX_CAPACITY`)
    /// - `CACHE_TTL_DAYS`, `CACHE_TTL_HOURS`, `CACHE_TTL_MINUTES`,
    ///   `CACHE_TTL_SECONDS` - Summed into the entry TTL (default: 1 day).
    ///   Setting any of them replaces the default; all zero disables expiry.
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let max_entries = parse_var("CACHE_SIZE")
            .unwrap_or(DEFAULT_MAX_ENTRIES)
            .clamp(1, MAX_CAPACITY);

        Self {
            max_entries,
            ttl: ttl_from_env(),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: default_ttl(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn default_ttl() -> Duration {
    Duration::from_secs(DEFAULT_TTL_DAYS as u64 * 24 * 60 * 60)
}

fn ttl_from_env() -> Duration {
    let parts: Vec<Option<i64>> = [
        "CACHE_TTL_DAYS",
        "CACHE_TTL_HOURS",
        "CACHE_TTL_MINUTES",
        "CACHE_TTL_SECONDS",
    ]
    .into_iter()
    .map(parse_var::<i64>)
    .collect();

    if parts.iter().all(Option::is_none) {
        return default_ttl();
    }

    let [days, hours, minutes, seconds] = [0, 1, 2, 3].map(|i| parts[i].unwrap_or(0));
    ttl_from_parts(days, hours, minutes, seconds).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring cache TTL settings");
        default_ttl()
    })
}
