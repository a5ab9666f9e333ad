//! Ringcache - fixed-capacity caches with lazy expiration
//!
//! Provides a recency-ring LRU cache with TTL, a lazily refreshed single
//! value cache, and a small HTTP server exposing the ring cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheStats, LazyValue, RingCache};
pub use config::Config;
pub use error::CacheError;
