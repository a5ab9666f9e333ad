//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /cache` - List entries, most recently used first
//! - `GET|PUT|DELETE /cache/:key` - Look up, store or delete a key
//! - `GET /cache/:key/exists` - Membership check
//! - `POST /pop` - Remove the most recently used entry
//! - `PUT /capacity` - Resize the cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
