//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// A single key/value pair, returned by lookup, store, delete and pop
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
}

impl EntryResponse {
    /// Creates a new EntryResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for listing the cache (GET /cache)
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    /// Number of entries listed
    pub count: usize,
    /// Entries, most recently used first
    pub entries: Vec<EntryResponse>,
}

impl EntriesResponse {
    pub fn new(entries: Vec<EntryResponse>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Response body for the membership check (GET /cache/{key}/exists)
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for the resize operation (PUT /capacity)
#[derive(Debug, Clone, Serialize)]
pub struct ResizeResponse {
    /// Capacity after the resize
    pub capacity: usize,
    /// Entries that survived the resize
    pub population: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of lazily expired entries
    pub expirations: u64,
    /// Number of slots
    pub capacity: usize,
    /// Current number of entries in cache
    pub population: usize,
    /// Entry lifetime in seconds, 0 for none
    pub ttl_seconds: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            capacity: stats.capacity,
            population: stats.population,
            ttl_seconds: stats.ttl.as_secs(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
