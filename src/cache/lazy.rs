//! Lazy Value Module
//!
//! Single memoized value recomputed on read once its TTL has elapsed.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::clock::{is_expired, Clock, SystemClock};

// == Lazy Value ==
/// Memoizes the result of one expensive computation, such as fetching an
/// auth token.
///
/// The producer runs on the first [`get`](Self::get) and again on any `get`
/// after `ttl` has elapsed since the last successful run. A zero `ttl`
/// computes once and keeps the value forever.
pub struct LazyValue<T, F, C = SystemClock> {
    producer: F,
    /// Last successful result and when it was produced
    slot: Option<(T, Instant)>,
    ttl: Duration,
    clock: C,
}

impl<T, E, F> LazyValue<T, F, SystemClock>
where
    F: FnMut() -> Result<T, E>,
{
    // == Constructor ==
    /// Binds `producer` to a new, empty lazy value.
    pub fn new(ttl: Duration, producer: F) -> Self {
        Self::with_clock(ttl, producer, SystemClock)
    }
}

impl<T, F, C> LazyValue<T, F, C> {
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Invalidate ==
    /// Forgets the stored value so the next `get` recomputes it.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

impl<T, F, C, E> LazyValue<T, F, C>
where
    F: FnMut() -> Result<T, E>,
    C: Clock,
{
    /// Creates a lazy value reading time from `clock`.
    pub fn with_clock(ttl: Duration, producer: F, clock: C) -> Self {
        Self {
            producer,
            slot: None,
            ttl,
            clock,
        }
    }

    // == Get ==
    /// Returns the stored value, running the producer first if there is none
    /// or it has expired.
    ///
    /// A producer error is returned unchanged. The previous value and its
    /// timestamp are kept, so the next call retries.
    pub fn get(&mut self) -> Result<&T, E> {
        let now = self.clock.now();
        let entry = match self.slot.take() {
            Some(entry) if !is_expired(entry.1, now, self.ttl) => entry,
            stale => match (self.producer)() {
                Ok(value) => {
                    debug!("refreshed lazy value");
                    (value, now)
                }
                Err(err) => {
                    self.slot = stale;
                    return Err(err);
                }
            },
        };
        Ok(&self.slot.insert(entry).0)
    }

    // == Is Fresh ==
    /// True if a value is stored and has not expired. Never runs the producer.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(self.clock.now())
    }

    fn is_fresh_at(&self, now: Instant) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|(_, refreshed)| !is_expired(*refreshed, now, self.ttl))
    }
}

impl<T: fmt::Debug, F, C> fmt::Debug for LazyValue<T, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("value", &self.slot.as_ref().map(|(value, _)| value))
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
