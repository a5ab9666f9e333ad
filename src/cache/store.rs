//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency ring and lazy
//! TTL expiration.

use std::borrow::Borrow;
use std::convert::Infallible;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::clock::{is_expired, Clock, SystemClock};
use crate::cache::ring::Ring;
use crate::cache::{CacheStats, MAX_CAPACITY};
use crate::error::{CacheError, Result};

// == Ring Cache ==
/// Fixed-capacity LRU cache with lazy TTL expiration.
///
/// All slots are allocated up front (or on [`resize`](Self::resize)), so
/// lookups, inserts and deletes never allocate ring storage. Expired entries
/// are only noticed when an operation that returns a value touches them.
///
/// Not internally synchronized: share it behind a lock if needed.
#[derive(Debug)]
pub struct RingCache<K, V, C = SystemClock> {
    /// Key to slot index
    index: HashMap<K, usize>,
    /// Slot storage and recency order
    ring: Ring<K, V>,
    /// Zero means entries never expire
    ttl: Duration,
    /// Performance statistics
    stats: CacheStats,
    clock: C,
}

impl<K, V> RingCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, each living for
    /// `ttl` after its last write (zero disables expiry).
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is 0 or
    /// above [`MAX_CAPACITY`].
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, ttl, SystemClock)
    }
}

impl<K, V, C> RingCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Result<Self> {
        check_capacity(capacity)?;
        let ring = Ring::new(capacity, clock.now());
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            ring,
            ttl,
            stats: CacheStats::new(capacity, ttl),
            clock,
        })
    }

    // == Live Slot ==
    /// Resolves `key` to the slot of a live entry and marks it most recently
    /// used. Records the hit or miss; an expired entry is removed on the way.
    fn live_slot<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.is_stale(idx) {
            self.expire(idx);
            self.stats.record_miss();
            return None;
        }

        self.ring.move_to_front(idx);
        self.stats.record_hit();
        Some(idx)
    }

    fn is_stale(&self, idx: usize) -> bool {
        is_expired(self.ring.slot(idx).touched(), self.clock.now(), self.ttl)
    }

    fn expire(&mut self, idx: usize) {
        if self.remove_slot(idx).is_some() {
            self.stats.record_expiration();
            debug!(population = self.index.len(), "expired cache entry");
        }
    }

    /// Empties the slot at `idx`, drops its index entry and parks it at
    /// the reuse position.
    fn remove_slot(&mut self, idx: usize) -> Option<(K, V)> {
        let (key, value) = self.ring.slot_mut(idx).vacate()?;
        self.index.remove(&key);
        self.ring.park(idx);
        Some((key, value))
    }

    // == Lookup ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// Fails with [`CacheError::NotFound`] if the key is absent or expired;
    /// an expired entry is removed.
    pub fn lookup<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.live_slot(key).ok_or(CacheError::NotFound)?;
        self.ring.slot(idx).value().ok_or(CacheError::NotFound)
    }

    // == Insert Or Update ==
    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// A new key takes the reuse position: an empty slot if any, otherwise
    /// the least recently used entry, which is evicted.
    pub fn insert_or_update(&mut self, key: K, value: V) {
        self.store(key, value);
    }

    /// Writes the entry and returns its slot, now the most recently used.
    fn store(&mut self, key: K, value: V) -> usize {
        let now = self.clock.now();

        if let Some(&idx) = self.index.get(&key) {
            self.ring.slot_mut(idx).occupy(key, value, now);
            self.ring.move_to_front(idx);
            return idx;
        }

        let idx = self.acquire_slot_for_new_key();
        self.index.insert(key.clone(), idx);
        self.ring.slot_mut(idx).occupy(key, value, now);
        self.ring.advance_to(idx);
        idx
    }

    /// Frees the reuse position, evicting its entry if it holds one.
    fn acquire_slot_for_new_key(&mut self) -> usize {
        let idx = self.ring.reuse_position();
        if let Some((evicted, _)) = self.ring.slot_mut(idx).vacate() {
            self.index.remove(&evicted);
            self.stats.record_eviction();
            debug!(capacity = self.ring.len(), "evicted least recently used entry");
        }
        idx
    }

    // == Get Or Insert ==
    /// Returns the live value for `key`, computing and caching it with
    /// `fetch` on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, fetch: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        match self.try_get_or_insert_with(key, |k| Ok::<_, Infallible>(fetch(k))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// An error from `fetch` is returned unchanged and nothing is cached.
    pub fn try_get_or_insert_with<F, E>(&mut self, key: K, fetch: F) -> std::result::Result<&V, E>
    where
        F: FnOnce(&K) -> std::result::Result<V, E>,
    {
        let idx = match self.live_slot(&key) {
            Some(idx) => idx,
            None => {
                let value = fetch(&key)?;
                self.store(key, value)
            }
        };
        let Some(value) = self.ring.slot(idx).value() else {
            unreachable!("slot {idx} was just resolved to a live entry");
        };
        Ok(value)
    }

    // == Delete ==
    /// Removes `key` and returns its value.
    ///
    /// The freed slot is reused by the next new key before any live entry
    /// is evicted. An expired entry is removed but reported as
    /// [`CacheError::NotFound`]. Hit and miss counters are not touched.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key).ok_or(CacheError::NotFound)?;
        if self.is_stale(idx) {
            self.expire(idx);
            return Err(CacheError::NotFound);
        }
        self.remove_slot(idx)
            .map(|(_, value)| value)
            .ok_or(CacheError::NotFound)
    }

    // == Pop ==
    /// Like [`delete`](Self::delete), but returns `default` instead of
    /// failing when the key is absent.
    pub fn pop<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.delete(key).unwrap_or(default)
    }

    // == Pop Most Recent ==
    /// Removes and returns the most recently used live entry.
    ///
    /// Fails with [`CacheError::EmptyCache`] when no live entry remains.
    pub fn pop_most_recent(&mut self) -> Result<(K, V)> {
        while !self.index.is_empty() {
            let idx = self.ring.current();
            debug_assert!(self.ring.slot(idx).is_occupied());
            if self.is_stale(idx) {
                self.expire(idx);
                continue;
            }
            return self.remove_slot(idx).ok_or(CacheError::EmptyCache);
        }
        Err(CacheError::EmptyCache)
    }

    // == Contains ==
    /// Checks whether `key` is indexed. Does not touch recency, counters
    /// or expiry.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Resize ==
    /// Changes the number of slots.
    ///
    /// Growing adds empty slots and keeps every entry. Shrinking removes
    /// slots from the reuse position, so empty slots go first and then the
    /// least recently used entries are evicted until the new capacity holds.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        check_capacity(new_capacity)?;

        let old_capacity = self.ring.len();
        if new_capacity > old_capacity {
            let now = self.clock.now();
            for _ in old_capacity..new_capacity {
                self.ring.grow(now);
            }
        } else {
            for _ in new_capacity..old_capacity {
                if let Some((evicted, _)) = self.ring.shrink() {
                    self.index.remove(&evicted);
                    self.stats.record_eviction();
                }
            }
        }

        info!(
            old_capacity,
            new_capacity,
            population = self.index.len(),
            "resized cache"
        );
        Ok(())
    }

    // == Clear ==
    /// Drops every entry. Capacity and statistics are kept.
    pub fn clear(&mut self) {
        for (_, idx) in self.index.drain() {
            self.ring.slot_mut(idx).vacate();
        }
    }
}

impl<K, V, C> RingCache<K, V, C> {
    // == Length ==
    /// Returns the number of entries, expired ones not yet noticed included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.ring.len(),
            population: self.index.len(),
            ..self.stats.clone()
        }
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            walk: self.ring.walk(self.index.len()),
        }
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.ring
            .walk(self.index.len())
            .filter_map(|slot| slot.key())
    }

    /// Iterates values from most to least recently used.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if (1..=MAX_CAPACITY).contains(&capacity) {
        Ok(())
    } else {
        Err(CacheError::InvalidCapacity(capacity))
    }
}

// == Iter ==
/// Borrowing iterator over a [`RingCache`], most recently used first.
pub struct Iter<'a, K, V> {
    walk: crate::cache::ring::Walk<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.walk
            .next()
            .and_then(|slot| slot.entry())
            .map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a RingCache<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
