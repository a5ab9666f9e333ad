//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caches and the HTTP surface around them.
///
/// Every operation that returns one of these has left the cache untouched
/// or fully consistent; there is no partial-failure state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key absent, or present but expired
    #[error("Key not found")]
    NotFound,

    /// `pop_most_recent` on a cache with no live entries
    #[error("Cache is empty")]
    EmptyCache,

    /// Construction or resize with a capacity outside `1..=MAX_CAPACITY`
    #[error("Invalid capacity: {0} (must be between 1 and {max})", max = crate::cache::MAX_CAPACITY)]
    InvalidCapacity(usize),

    /// TTL components that do not add up to a non-negative duration
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound | CacheError::EmptyCache => StatusCode::NOT_FOUND,
            CacheError::InvalidCapacity(_)
            | CacheError::InvalidTtl(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
