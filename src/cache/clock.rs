//! Clock Module
//!
//! Time source abstraction and the TTL comparison shared by both caches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == Clock ==
/// Source of monotonic timestamps.
///
/// Caches take a clock type parameter so tests can drive time by hand.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time via `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Mock Clock ==
/// Manually advanced clock.
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the cache.
#[derive(Debug, Clone)]
pub struct MockClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a clock frozen at the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

// == Expiration Check ==
/// Returns true when an item stamped at `touched` is stale at `now`.
///
/// A zero `ttl` never expires. Otherwise the boundary is inclusive: once
/// the full TTL has elapsed the item is expired.
pub fn is_expired(touched: Instant, now: Instant, ttl: Duration) -> bool {
    !ttl.is_zero() && now.saturating_duration_since(touched) >= ttl
}

// == TTL Construction ==
/// Builds a TTL from calendar components, the way cache lifetimes are
/// configured ("1 day", "29 days", "12 hours").
///
/// Components may be mixed and individually negative as long as the total
/// is non-negative.
pub fn ttl_from_parts(days: i64, hours: i64, minutes: i64, seconds: i64) -> Result<Duration> {
    let overflow = || CacheError::InvalidTtl("duration out of range".to_string());

    let total = [
        chrono::Duration::try_days(days),
        chrono::Duration::try_hours(hours),
        chrono::Duration::try_minutes(minutes),
        chrono::Duration::try_seconds(seconds),
    ]
    .into_iter()
    .try_fold(chrono::Duration::zero(), |acc, part| {
        part.and_then(|part| acc.checked_add(&part))
    })
    .ok_or_else(overflow)?;

    total
        .to_std()
        .map_err(|_| CacheError::InvalidTtl(format!("negative duration: {total}")))
}
