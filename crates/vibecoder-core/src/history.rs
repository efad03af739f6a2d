//! Linear undo history of committed batches.

use crate::operation::Operation;
use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The section list as it stood after a committed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub sections: Vec<Section>,
}

/// One undo step: the snapshot after the batch plus the batch's inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub snapshot: HistorySnapshot,
    pub inverse: Vec<Operation>,
    pub committed_at: String,
}

/// Baseline snapshot plus a bounded stack of committed batches.
///
/// The stack is appended only after a batch commits. When it grows past
/// `max_entries`, the oldest entry becomes the new baseline.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    baseline: HistorySnapshot,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl HistoryStack {
    pub fn new(baseline: Vec<Section>, max_entries: usize) -> Self {
        Self {
            baseline: HistorySnapshot { sections: baseline },
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn push(&mut self, sections: Vec<Section>, inverse: Vec<Operation>) {
        self.entries.push_back(HistoryEntry {
            snapshot: HistorySnapshot { sections },
            inverse,
            committed_at: crate::now_timestamp(),
        });
        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.entries.pop_front() {
                self.baseline = oldest.snapshot;
            }
        }
    }

    /// Removes the newest entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    /// Puts back an entry taken by [`pop`](Self::pop).
    pub fn restore(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
    }

    /// Snapshot of the newest state, or the baseline.
    pub fn current(&self) -> &HistorySnapshot {
        self.entries
            .back()
            .map(|e| &e.snapshot)
            .unwrap_or(&self.baseline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drops every entry and restarts from `baseline`.
    pub fn reset(&mut self, baseline: Vec<Section>) {
        self.baseline = HistorySnapshot { sections: baseline };
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::text_section;

    #[test]
    fn test_pop_falls_back_to_baseline() {
        let mut history = HistoryStack::new(vec![text_section("a")], 10);
        history.push(vec![text_section("a"), text_section("b")], Vec::new());

        assert_eq!(history.current().sections.len(), 2);
        assert!(history.pop().is_some());
        assert_eq!(history.current().sections.len(), 1);
        assert!(!history.can_undo());
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_overflow_moves_baseline_forward() {
        let mut history = HistoryStack::new(Vec::new(), 2);
        for id in ["a", "b", "c"] {
            history.push(vec![text_section(id)], Vec::new());
        }

        assert_eq!(history.len(), 2);
        history.pop();
        history.pop();
        assert_eq!(history.current().sections[0].id, "a");
    }
}
