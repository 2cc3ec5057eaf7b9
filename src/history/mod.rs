//! Linear undo/redo history over graph snapshots.
//!
//! The history owns a bounded list of snapshots and a cursor into it. A
//! new commit truncates everything after the cursor before appending, and
//! the oldest entry is evicted from the head once capacity is exceeded.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{events::HistoryPosition, graph::GraphSnapshot};

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<GraphSnapshot>,
    cursor: usize,
    capacity: usize,
    dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(GraphSnapshot::default(), DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// History holding `initial` as its only entry. A capacity of zero is
    /// treated as one.
    pub fn new(
        initial: GraphSnapshot,
        capacity: usize,
    ) -> Self {
        Self {
            entries: VecDeque::from([initial]),
            cursor: 0,
            capacity: capacity.max(1),
            dirty: false,
        }
    }

    /// Appends `snapshot` unless it is structurally equal to the current
    /// one. Returns whether an entry was added.
    pub fn commit(
        &mut self,
        snapshot: GraphSnapshot,
    ) -> bool {
        if self.current() == &snapshot {
            trace!("history::commit skipped, snapshot unchanged");
            return false;
        }
        self.push(snapshot);
        debug!("history::commit(cursor: {}, len: {})", self.cursor, self.entries.len());
        true
    }

    /// Appends `snapshot` unconditionally.
    pub fn reset(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        self.push(snapshot);
        debug!("history::reset(cursor: {}, len: {})", self.cursor, self.entries.len());
    }

    /// Steps back one entry. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&GraphSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        trace!("history::undo(cursor: {})", self.cursor);
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&GraphSnapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        trace!("history::redo(cursor: {})", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> &GraphSnapshot {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn position(&self) -> HistoryPosition {
        HistoryPosition {
            cursor: self.cursor,
            len: self.entries.len(),
        }
    }

    /// Set by every commit and reset; undo and redo leave it alone.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledges that the current state has been saved.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn push(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::{Node, NodeData, NodeKind, Position};

    fn snapshot(n: usize) -> GraphSnapshot {
        let nodes = (0..n)
            .map(|i| {
                Node::new(
                    format!("tool-{i}"),
                    NodeKind::Tool,
                    Position::new(i as f64, 0.0),
                    NodeData {
                        label: format!("Tool {i}"),
                        ..Default::default()
                    },
                )
            })
            .collect();
        GraphSnapshot::new(nodes, vec![])
    }

    #[test]
    fn test_new_history_has_one_entry() {
        let history = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.is_dirty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_identical_commit_is_noop() {
        let mut history = History::default();
        assert!(history.commit(snapshot(1)));
        assert!(!history.commit(snapshot(1)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_undo_redo_at_boundaries() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.commit(snapshot(1));
        assert_eq!(history.undo().unwrap(), &snapshot(0));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().unwrap(), &snapshot(1));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo_branch() {
        let mut history = History::default();
        history.commit(snapshot(1));
        history.commit(snapshot(2));
        history.commit(snapshot(3));
        history.undo();
        history.undo();

        assert!(history.commit(snapshot(5)));
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo().unwrap(), &snapshot(1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(snapshot(0), 3);
        for n in 1..=5 {
            history.commit(snapshot(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current(), &snapshot(5));

        history.undo();
        assert_eq!(history.undo().unwrap(), &snapshot(3));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_reset_pushes_even_when_equal() {
        let mut history = History::default();
        history.reset(GraphSnapshot::default());
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_dirty_flag() {
        let mut history = History::default();
        history.commit(snapshot(1));
        assert!(history.is_dirty());

        history.undo();
        assert!(history.is_dirty());

        history.mark_saved();
        assert!(!history.is_dirty());
        history.redo();
        assert!(!history.is_dirty());

        history.reset(snapshot(0));
        assert!(history.is_dirty());
    }

    proptest! {
        #[test]
        fn prop_length_never_exceeds_capacity(capacity in 1usize..60, commits in 0usize..200) {
            let mut history = History::new(snapshot(0), capacity);
            for n in 1..=commits {
                history.commit(snapshot(n));
                prop_assert!(history.len() <= capacity);
                prop_assert_eq!(history.cursor(), history.len() - 1);
            }
            prop_assert_eq!(history.current(), &snapshot(commits));
        }

        #[test]
        fn prop_undo_then_redo_restores_current(commits in 1usize..50, steps in 0usize..50) {
            let mut history = History::default();
            for n in 1..=commits {
                history.commit(snapshot(n));
            }
            let steps = steps.min(commits);
            let before = history.current().clone();

            for _ in 0..steps {
                prop_assert!(history.undo().is_some());
            }
            prop_assert_eq!(history.cursor(), commits - steps);
            for _ in 0..steps {
                prop_assert!(history.redo().is_some());
            }
            prop_assert_eq!(history.current(), &before);
        }
    }
}
