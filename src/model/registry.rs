//! Ordered pattern → entry mapping
//!
//! Insertion order only drives palette cycling; rendering does not depend on it.
//! Lookups by pattern go through an index kept in step with the entry list.

use std::collections::{HashMap, HashSet};

use super::entry::HighlightEntry;

/// Live set of highlight entries, keyed by pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<HighlightEntry>,
    /// pattern -> position in `entries`
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pattern: &str) -> Option<&HighlightEntry> {
        self.position(pattern).map(|idx| &self.entries[idx])
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.position(pattern).is_some()
    }

    /// Store `entry` under its own pattern, returning the entry it replaced
    ///
    /// A replaced entry keeps its position.
    pub fn insert(&mut self, entry: HighlightEntry) -> Option<HighlightEntry> {
        match self.position(entry.pattern()) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx], entry)),
            None => {
                self.index
                    .insert(entry.pattern().to_string(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn remove(&mut self, pattern: &str) -> Option<HighlightEntry> {
        let idx = self.position(pattern)?;
        let removed = self.entries.remove(idx);
        self.reindex();
        Some(removed)
    }

    /// Remove every entry matching `remove`, returning the removed entries
    pub fn drain_where<F>(&mut self, mut remove: F) -> Vec<HighlightEntry>
    where
        F: FnMut(&HighlightEntry) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| remove(e));
        self.entries = kept;
        if !removed.is_empty() {
            self.reindex();
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut HighlightEntry> {
        self.entries.iter_mut()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern())
    }

    /// Palette slots currently held by entries other than `except`
    pub fn used_palette_slots(&self, except: Option<&str>) -> HashSet<usize> {
        self.entries
            .iter()
            .filter(|e| Some(e.pattern()) != except)
            .filter_map(|e| e.color.palette_slot())
            .collect()
    }

    fn position(&self, pattern: &str) -> Option<usize> {
        self.index.get(pattern).copied()
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.pattern().to_string(), idx))
            .collect();
    }
}

/// Deep copy of the registry plus the color-cycle counter, for undo/redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub registry: Registry,
    pub color_cycle_index: usize,
}
