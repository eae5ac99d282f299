//! Journal of pending insertions.

use std::cmp::Ordering;

use crate::types::InsertionOrder;

/// A pending insertion.
#[derive(Clone, Debug)]
pub struct PendingAdd<T> {
    /// Tie-break for items that compare equal.
    pub order: InsertionOrder,
    pub item: T,
}

/// Queue of items waiting to be merged into the master sequence.
#[derive(Debug)]
pub struct AddJournal<T> {
    entries: Vec<PendingAdd<T>>,
    /// Next insertion counter. Never reset, so ties stay FIFO across clears.
    next_order: u64,
}

impl<T> AddJournal<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next_order: 0,
        }
    }

    /// Enqueue an item, assigning it the next insertion counter.
    pub fn push(&mut self, item: T) -> InsertionOrder {
        let order = InsertionOrder(self.next_order);
        self.next_order += 1;
        self.entries.push(PendingAdd { order, item });
        order
    }

    /// Take all entries sorted by `(cmp, order)`.
    pub fn drain_sorted<F>(&mut self, cmp: F) -> Vec<PendingAdd<T>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let mut entries = std::mem::take(&mut self.entries);
        // Insertion counters are unique, so an unstable sort is deterministic.
        entries.sort_unstable_by(|a, b| cmp(&a.item, &b.item).then(a.order.cmp(&b.order)));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all pending entries. The insertion counter keeps running.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: PartialEq> AddJournal<T> {
    /// Cancel the oldest pending add of `item`. Returns false if none is pending.
    pub fn cancel(&mut self, item: &T) -> bool {
        match self.entries.iter().position(|entry| entry.item == *item) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for AddJournal<T> {
    fn default() -> Self {
        Self::new()
    }
}
