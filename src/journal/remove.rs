//! Journal of pending removals.

/// Master-sequence indices scheduled for removal.
///
/// Indices are recorded against the master sequence as it stands between two
/// reconciliations; the master sequence only changes during reconciliation,
/// so they stay valid until drained.
#[derive(Debug, Default)]
pub struct RemoveJournal {
    indices: Vec<usize>,
}

impl RemoveJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, index: usize) {
        debug_assert!(
            !self.indices.contains(&index),
            "index {index} scheduled for removal twice"
        );
        self.indices.push(index);
    }

    /// Take all indices, highest first.
    pub fn drain_descending(&mut self) -> Vec<usize> {
        let mut indices = std::mem::take(&mut self.indices);
        indices.sort_unstable_by(|a, b| b.cmp(a));
        debug_assert!(
            indices.windows(2).all(|w| w[0] > w[1]),
            "duplicate removal index"
        );
        indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
