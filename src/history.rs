//! Registry history (undo/redo) over whole-registry snapshots
//!
//! Callers push a snapshot *before* running a mutating command, so one user
//! action is one undo step no matter how many entries it touches.

use crate::model::RegistrySnapshot;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Bounded undo/redo stacks of registry snapshots
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<RegistrySnapshot>,
    redo_stack: Vec<RegistrySnapshot>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new history with the default depth
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_DEPTH)
    }

    /// Create a new history keeping at most `max_size` undo steps
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record the state before a mutation (clears the redo side)
    pub fn push(&mut self, snapshot: RegistrySnapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);

        // Evict oldest once over the bound
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Step back: returns the snapshot to restore, remembering `current` for redo
    pub fn undo(&mut self, current: RegistrySnapshot) -> Option<RegistrySnapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Step forward: returns the snapshot to restore, remembering `current` for undo
    pub fn redo(&mut self, current: RegistrySnapshot) -> Option<RegistrySnapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchMode;
    use crate::model::{HighlightEntry, HighlightSource, Registry};
    use crate::theme::ColorKey;

    fn snapshot(patterns: &[&str], cycle: usize) -> RegistrySnapshot {
        let mut registry = Registry::new();
        for (i, p) in patterns.iter().enumerate() {
            registry.insert(
                HighlightEntry::new(
                    *p,
                    ColorKey::Palette(i),
                    MatchMode::Text,
                    HighlightSource::Manual,
                )
                .unwrap(),
            );
        }
        RegistrySnapshot {
            registry,
            color_cycle_index: cycle,
        }
    }

    #[test]
    fn test_undo_on_empty_history_is_none() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(history.undo(snapshot(&[], 0)).is_none());
        // Failed undo must not leave anything to redo
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_round_trip() {
        let mut history = History::new();
        let s0 = snapshot(&["a"], 1);
        let s1 = snapshot(&["a", "b"], 2);

        history.push(s0.clone());
        let restored = history.undo(s1.clone()).unwrap();
        assert_eq!(restored, s0);
        assert!(history.can_redo());

        let restored = history.redo(s0.clone()).unwrap();
        assert_eq!(restored, s1);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        history.push(snapshot(&[], 0));
        history.undo(snapshot(&["a"], 1));
        assert!(history.can_redo());

        history.push(snapshot(&[], 0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_max_size_evicts_oldest() {
        let mut history = History::with_max_size(3);
        for i in 0..5 {
            history.push(snapshot(&[], i));
        }
        assert_eq!(history.undo_count(), 3);

        // Oldest surviving snapshot is #2
        let mut last = None;
        while let Some(s) = history.undo(snapshot(&[], 99)) {
            last = Some(s);
        }
        assert_eq!(last.unwrap().color_cycle_index, 2);
    }

    #[test]
    fn test_zero_depth_is_raised_to_one() {
        let history = History::with_max_size(0);
        assert_eq!(history.max_size(), 1);
    }
}
