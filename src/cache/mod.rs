//! Cache Module
//!
//! Provides a fixed-capacity recency-ring cache with lazy TTL expiration,
//! and a single-value cache refreshed on read.

mod clock;
mod lazy;
mod ring;
mod slot;
mod stats;
mod store;


// Re-export public types
pub use clock::{is_expired, ttl_from_parts, Clock, MockClock, SystemClock};
pub use lazy::LazyValue;
pub use stats::CacheStats;
pub use store::{Iter, RingCache};

// == Public Constants ==
/// Maximum number of slots; every slot is allocated up front
pub const MAX_CAPACITY: usize = 1 << 20;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
