//! Core types for the ordered view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion counter assigned when an item is journaled for merging.
///
/// Only used to break ties between items that compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InsertionOrder(pub u64);

impl fmt::Debug for InsertionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order({})", self.0)
    }
}

/// Diagnostics snapshot of a view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    /// Items in the master sequence, including ones scheduled for removal.
    pub len: usize,
    /// Items in the filtered cache (0 while the cache is stale and cleared).
    pub filtered: usize,
    /// Adds waiting to be merged.
    pub pending_adds: usize,
    /// Master indices waiting to be removed.
    pub pending_removals: usize,
    /// Whether the filtered cache reflects the current master sequence.
    pub cache_valid: bool,
    /// Number of reconciliations performed.
    pub reconciliations: u64,
    /// Items merged into the master sequence, over the view's lifetime.
    pub merged: u64,
    /// Items removed from the master sequence, over the view's lifetime.
    pub removed: u64,
}
