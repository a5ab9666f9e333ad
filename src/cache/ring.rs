//! Ring Module
//!
//! Circular doubly-linked list of slots, stored in an arena and addressed
//! by index.
//!
//! Walking from `current` along `next` visits the occupied slots from most
//! to least recently used, then the unoccupied ones. The slot just before
//! `current` (its `prev`) is therefore always the next one to reuse: an
//! empty slot if there is one, otherwise the least recently used entry.

use std::time::Instant;

use crate::cache::slot::Slot;

// == Ring ==
#[derive(Debug)]
pub(crate) struct Ring<K, V> {
    slots: Vec<Slot<K, V>>,
    /// Arena positions unlinked by a shrink, reused by the next grow
    detached: Vec<usize>,
    current: usize,
    len: usize,
}

impl<K, V> Ring<K, V> {
    // == Constructor ==
    /// Builds a ring of `capacity` unoccupied slots. `capacity` must be at
    /// least 1; the owning cache checks that.
    pub fn new(capacity: usize, now: Instant) -> Self {
        let mut ring = Self {
            slots: vec![Slot::vacant(0, now)],
            detached: Vec::new(),
            current: 0,
            len: 1,
        };
        for _ in 1..capacity {
            ring.grow(now);
        }
        ring
    }

    /// Number of linked slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// The slot that the next new key will land in.
    pub fn reuse_position(&self) -> usize {
        self.slots[self.current].prev
    }

    pub fn slot(&self, idx: usize) -> &Slot<K, V> {
        &self.slots[idx]
    }

    pub fn slot_mut(&mut self, idx: usize) -> &mut Slot<K, V> {
        &mut self.slots[idx]
    }

    /// Makes `idx` the most recently used position without relinking.
    /// Only valid for the reuse position, which already sits right before
    /// `current` in the circle.
    pub fn advance_to(&mut self, idx: usize) {
        debug_assert_eq!(idx, self.reuse_position());
        self.current = idx;
    }

    // == Splicing ==
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    /// Links `idx` between `current.prev` and `current`.
    fn link_before_current(&mut self, idx: usize) {
        let current = self.current;
        let prev = self.slots[current].prev;
        self.slots[idx].prev = prev;
        self.slots[idx].next = current;
        self.slots[prev].next = idx;
        self.slots[current].prev = idx;
    }

    // == Move To Front ==
    /// Makes `idx` the most recently used slot. No-op if it already is.
    pub fn move_to_front(&mut self, idx: usize) {
        if idx == self.current {
            return;
        }
        self.unlink(idx);
        self.link_before_current(idx);
        self.current = idx;
    }

    // == Park ==
    /// Moves `idx` to the reuse position while leaving every other slot's
    /// recency unchanged. Used for slots that were just emptied.
    pub fn park(&mut self, idx: usize) {
        self.move_to_front(idx);
        self.current = self.slots[idx].next;
    }

    // == Grow ==
    /// Adds one unoccupied slot at the reuse position.
    pub fn grow(&mut self, now: Instant) {
        let idx = match self.detached.pop() {
            Some(idx) => {
                self.slots[idx] = Slot::vacant(idx, now);
                idx
            }
            None => {
                self.slots.push(Slot::vacant(self.slots.len(), now));
                self.slots.len() - 1
            }
        };
        self.link_before_current(idx);
        self.len += 1;
    }

    // == Shrink ==
    /// Unlinks the slot at the reuse position and returns whatever it held.
    ///
    /// The ring never drops below one slot; on a single-slot ring this
    /// returns `None` and changes nothing.
    pub fn shrink(&mut self) -> Option<(K, V)> {
        if self.len <= 1 {
            return None;
        }
        let idx = self.reuse_position();
        self.unlink(idx);
        self.len -= 1;
        self.detached.push(idx);
        self.slots[idx].vacate()
    }

    // == Walk ==
    /// Iterates the first `count` slots from `current` toward the LRU side.
    pub fn walk(&self, count: usize) -> Walk<'_, K, V> {
        Walk {
            ring: self,
            next: self.current,
            remaining: count.min(self.len),
        }
    }
}

// == Walk Iterator ==
pub(crate) struct Walk<'a, K, V> {
    ring: &'a Ring<K, V>,
    next: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = &'a Slot<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.ring.slots[self.next];
        self.next = slot.next;
        self.remaining -= 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Walk<'_, K, V> {}
