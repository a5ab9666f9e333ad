//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::RingCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, EntriesResponse, EntryResponse, ExistsResponse, HealthResponse, PutRequest,
    ResizeRequest, ResizeResponse, StatsResponse,
};

/// Cache type served over HTTP.
pub type SharedCache = RingCache<String, String>;

/// Application state shared across all handlers.
///
/// The cache is not synchronized on its own, so every handler holds the
/// lock for the whole operation. Lookups change recency order and need the
/// write side; only `contains`, listing and stats can share the read side.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<SharedCache>>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: SharedCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = RingCache::new(config.max_entries, config.ttl)?;
        Ok(Self::new(cache))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /cache/{key}
///
/// Stores a value, evicting the least recently used entry if the cache is full.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutRequest>,
) -> Result<Json<EntryResponse>> {
    check_key(&key)?;
    if let Some(msg) = req.validate() {
        return Err(CacheError::InvalidRequest(msg));
    }

    let mut cache = state.cache.write().await;
    cache.insert_or_update(key.clone(), req.value.clone());

    Ok(Json(EntryResponse::new(key, req.value)))
}

/// Handler for GET /cache/{key}
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    check_key(&key)?;
    // Write lock: a hit reorders the ring and an expired entry is removed
    let mut cache = state.cache.write().await;
    let value = cache.lookup(&key)?.clone();

    Ok(Json(EntryResponse::new(key, value)))
}

/// Handler for DELETE /cache/{key}
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    check_key(&key)?;
    let mut cache = state.cache.write().await;
    let value = cache.delete(&key)?;

    Ok(Json(EntryResponse::new(key, value)))
}

/// Handler for GET /cache/{key}/exists
///
/// State-only check: does not refresh recency or expire the entry.
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let cache = state.cache.read().await;
    let exists = cache.contains(&key);

    Json(ExistsResponse { key, exists })
}

/// Handler for GET /cache
///
/// Lists entries from most to least recently used.
pub async fn list_handler(State(state): State<AppState>) -> Json<EntriesResponse> {
    let cache = state.cache.read().await;
    let entries = cache
        .iter()
        .map(|(key, value)| EntryResponse::new(key.as_str(), value.as_str()))
        .collect();

    Json(EntriesResponse::new(entries))
}

/// Handler for POST /pop
///
/// Removes and returns the most recently used entry.
pub async fn pop_handler(State(state): State<AppState>) -> Result<Json<EntryResponse>> {
    let mut cache = state.cache.write().await;
    let (key, value) = cache.pop_most_recent()?;

    Ok(Json(EntryResponse::new(key, value)))
}

/// Handler for PUT /capacity
///
/// Shrinking below the current population evicts least recently used entries.
pub async fn resize_handler(
    State(state): State<AppState>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<ResizeResponse>> {
    if let Some(msg) = req.validate() {
        return Err(CacheError::InvalidRequest(msg));
    }

    let mut cache = state.cache.write().await;
    cache.resize(req.capacity)?;

    Ok(Json(ResizeResponse {
        capacity: cache.capacity(),
        population: cache.len(),
    }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
