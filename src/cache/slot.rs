//! Slot Module
//!
//! One fixed position in the recency ring.

use std::time::Instant;

// == Entry ==
/// The key/value pair held by an occupied slot.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

// == Slot ==
/// A ring position. Its arena index never changes while it is linked;
/// only the contents do.
///
/// `next` points toward the least recently used side, `prev` toward the
/// most recently used side.
#[derive(Debug)]
pub(crate) struct Slot<K, V> {
    entry: Option<Entry<K, V>>,
    touched: Instant,
    pub next: usize,
    pub prev: usize,
}

impl<K, V> Slot<K, V> {
    /// Creates an unoccupied slot linked to itself.
    pub fn vacant(index: usize, now: Instant) -> Self {
        Self {
            entry: None,
            touched: now,
            next: index,
            prev: index,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.entry.is_some()
    }

    pub fn touched(&self) -> Instant {
        self.touched
    }

    pub fn entry(&self) -> Option<&Entry<K, V>> {
        self.entry.as_ref()
    }

    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|e| &e.key)
    }

    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|e| &e.value)
    }

    // == Occupy ==
    /// Stores `key`/`value` stamped at `now`, replacing whatever was here.
    pub fn occupy(&mut self, key: K, value: V, now: Instant) -> &mut V {
        self.touched = now;
        &mut self.entry.insert(Entry { key, value }).value
    }

    // == Vacate ==
    /// Clears the slot, handing back its previous contents.
    pub fn vacate(&mut self) -> Option<(K, V)> {
        self.entry.take().map(|e| (e.key, e.value))
    }
}
