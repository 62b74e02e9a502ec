//! Engine model - the complete highlight state of a session
//!
//! One `EngineState` exists per session and is passed explicitly to every
//! update function. Registry mutations live here so the invariants
//! (pattern keys, provenance defaults, palette cycling, modified tracking)
//! are enforced in one place.

pub mod document;
pub mod entry;
pub mod registry;

pub use document::{Document, DocumentId, DocumentSet};
pub use entry::{AddOptions, HighlightEntry, HighlightSource};
pub use registry::{Registry, RegistrySnapshot};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::History;
use crate::theme::{ColorKey, ThemeKind, PALETTE};

/// Which documents get decorated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeMode {
    /// Only the focused document
    #[default]
    SingleDocument,
    /// Every visible document
    AllOpenDocuments,
}

impl ScopeMode {
    pub fn toggled(self) -> Self {
        match self {
            ScopeMode::SingleDocument => ScopeMode::AllOpenDocuments,
            ScopeMode::AllOpenDocuments => ScopeMode::SingleDocument,
        }
    }
}

/// How a highlight is painted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleMode {
    /// Translucent background, no border
    Fill,
    /// Border only; text color is never overridden
    Box,
    /// Translucent background plus a thin border
    #[default]
    Hybrid,
}

impl StyleMode {
    /// Next mode in Fill → Box → Hybrid → Fill order
    pub fn cycled(self) -> Self {
        match self {
            StyleMode::Fill => StyleMode::Box,
            StyleMode::Box => StyleMode::Hybrid,
            StyleMode::Hybrid => StyleMode::Fill,
        }
    }
}

/// Whether highlighted text gets a forced legible foreground
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContrastMode {
    /// Keep the syntax-highlighted text color
    #[default]
    Auto,
    /// Paint text black or white per highlight color
    Force,
}

impl ContrastMode {
    pub fn toggled(self) -> Self {
        match self {
            ContrastMode::Auto => ContrastMode::Force,
            ContrastMode::Force => ContrastMode::Auto,
        }
    }
}

/// Settings that shape decoration styles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualSettings {
    pub style: StyleMode,
    pub opacity: f32,
    pub contrast: ContrastMode,
    pub theme: ThemeKind,
}

/// The complete engine state
#[derive(Debug, Clone)]
pub struct EngineState {
    pub registry: Registry,
    pub scope_mode: ScopeMode,
    pub style_mode: StyleMode,
    /// Monotonic counter for palette assignment
    pub color_cycle_index: usize,
    /// Profile currently open for editing
    pub active_profile: Option<String>,
    /// Profiles merged into the rendered view
    pub enabled_profiles: BTreeSet<String>,
    /// Visibility kill-switch; data is kept
    pub highlights_disabled: bool,
    pub history: History,
    pub theme: ThemeKind,
    pub opacity: f32,
    pub contrast: ContrastMode,
    /// Documents with more lines than this are only scanned around the viewport
    pub large_file_line_threshold: usize,
    /// Host documents, focus and viewports
    pub documents: DocumentSet,
    modified_profiles: BTreeSet<String>,
    next_binding_revision: u64,
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineState {
    /// Fresh session state with default settings
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Fresh session state seeded from persisted settings
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            registry: Registry::new(),
            scope_mode: config.scope,
            style_mode: config.style,
            color_cycle_index: 0,
            active_profile: None,
            enabled_profiles: BTreeSet::new(),
            highlights_disabled: false,
            history: History::with_max_size(config.history_depth),
            theme: ThemeKind::default(),
            opacity: config.opacity.clamp(0.0, 1.0),
            contrast: config.contrast,
            large_file_line_threshold: config.large_file_line_threshold,
            documents: DocumentSet::new(),
            modified_profiles: BTreeSet::new(),
            next_binding_revision: 0,
        }
    }

    pub fn visual_settings(&self) -> VisualSettings {
        VisualSettings {
            style: self.style_mode,
            opacity: self.opacity,
            contrast: self.contrast,
            theme: self.theme,
        }
    }

    // === Registry operations ===

    /// Add (or overwrite) a highlight for `pattern`
    ///
    /// Compilation happens first; on failure nothing is mutated. The previous
    /// entry for the same pattern, if any, is replaced and its render binding
    /// invalidated.
    pub fn add_highlight(&mut self, pattern: &str, options: AddOptions) -> Result<()> {
        let source = options.source.unwrap_or_else(|| self.default_source());
        // Validate before touching the color counter
        let mut entry = HighlightEntry::new(pattern, ColorKey::Palette(0), options.mode, source)?;
        entry.color = match options.color {
            Some(color) => color,
            None => self.next_palette_color(Some(pattern)),
        };
        self.insert_entry(entry);
        Ok(())
    }

    /// Remove the highlight for `pattern`; returns whether one existed
    pub fn remove_highlight(&mut self, pattern: &str) -> bool {
        match self.registry.remove(pattern) {
            Some(entry) => {
                self.mark_source_modified(&entry.source);
                tracing::debug!("Removed highlight {:?}", pattern);
                true
            }
            None => false,
        }
    }

    /// Remove the highlight if present, otherwise add it
    ///
    /// Returns `true` when the pattern ends up highlighted.
    pub fn toggle_highlight(&mut self, pattern: &str, options: AddOptions) -> Result<bool> {
        if self.remove_highlight(pattern) {
            return Ok(false);
        }
        self.add_highlight(pattern, options)?;
        Ok(true)
    }

    /// Remove manual entries and entries owned by the active profile
    ///
    /// Entries belonging to other enabled profiles are preserved.
    pub fn clear_active_or_manual(&mut self) -> usize {
        let active = self.active_profile.clone();
        let removed = self.registry.drain_where(|e| match &e.source {
            HighlightSource::Manual => true,
            HighlightSource::Profile { name } => active.as_deref() == Some(name.as_str()),
        });
        for entry in &removed {
            self.mark_source_modified(&entry.source);
        }
        removed.len()
    }

    /// Remove every entry owned by `profile`, without marking it modified
    pub fn strip_profile(&mut self, profile: &str) -> usize {
        self.registry
            .drain_where(|e| e.source.is_owned_by(profile))
            .len()
    }

    /// Invalidate every render binding, keeping colors and provenance
    pub fn refresh_all(&mut self) {
        for entry in self.registry.iter_mut() {
            self.next_binding_revision += 1;
            entry.binding_revision = self.next_binding_revision;
        }
    }

    /// Store an already-built entry as-is (profile loading path)
    pub fn insert_entry(&mut self, mut entry: HighlightEntry) {
        self.next_binding_revision += 1;
        entry.binding_revision = self.next_binding_revision;
        self.mark_source_modified(&entry.source);
        tracing::debug!(
            "Highlight {:?} ({}, {})",
            entry.pattern(),
            entry.mode().label(),
            entry.color
        );
        self.registry.insert(entry);
    }

    /// Load persisted entries for `profile`, replacing same-pattern entries
    ///
    /// Loaded entries are not modifications, so the profile stays clean.
    pub fn merge_profile_entries(
        &mut self,
        profile: &str,
        entries: impl IntoIterator<Item = HighlightEntry>,
    ) -> usize {
        let was_modified = self.modified_profiles.contains(profile);
        let mut count = 0;
        for mut entry in entries {
            entry.source = HighlightSource::profile(profile);
            self.insert_entry(entry);
            count += 1;
        }
        if !was_modified {
            self.modified_profiles.remove(profile);
        }
        count
    }

    // === Snapshots & history ===

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            registry: self.registry.clone(),
            color_cycle_index: self.color_cycle_index,
        }
    }

    /// Replace the live registry wholesale
    pub fn restore(&mut self, snapshot: RegistrySnapshot) {
        self.registry = snapshot.registry;
        self.color_cycle_index = snapshot.color_cycle_index;
        self.refresh_all();
    }

    /// Push the current registry before a mutating command
    pub fn push_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    // === Profile bookkeeping ===

    pub fn is_profile_modified(&self, profile: &str) -> bool {
        self.modified_profiles.contains(profile)
    }

    pub(crate) fn clear_profile_modified(&mut self, profile: &str) {
        self.modified_profiles.remove(profile);
    }

    pub fn is_profile_enabled(&self, profile: &str) -> bool {
        self.enabled_profiles.contains(profile)
    }

    pub fn is_profile_active(&self, profile: &str) -> bool {
        self.active_profile.as_deref() == Some(profile)
    }

    /// Entries owned by `profile`, in registry order
    pub fn profile_entries<'a>(
        &'a self,
        profile: &'a str,
    ) -> impl Iterator<Item = &'a HighlightEntry> + 'a {
        self.registry
            .iter()
            .filter(move |e| e.source.is_owned_by(profile))
    }

    /// Provenance for a new highlight with no explicit source
    fn default_source(&self) -> HighlightSource {
        match &self.active_profile {
            Some(name) => HighlightSource::profile(name.clone()),
            None => HighlightSource::Manual,
        }
    }

    fn mark_source_modified(&mut self, source: &HighlightSource) {
        if let Some(name) = source.profile_name() {
            if self.is_profile_active(name) || self.is_profile_enabled(name) {
                self.modified_profiles.insert(name.to_string());
            }
        }
    }

    /// Next palette slot not held by another entry, cycling round-robin
    ///
    /// Once every slot is in use, slots are reused in cycle order.
    pub(crate) fn next_palette_color(&mut self, replacing: Option<&str>) -> ColorKey {
        let used = self.registry.used_palette_slots(replacing);
        let len = PALETTE.len();
        for offset in 0..len {
            let slot = (self.color_cycle_index + offset) % len;
            if !used.contains(&slot) {
                self.color_cycle_index += offset + 1;
                return ColorKey::Palette(slot);
            }
        }
        let slot = self.color_cycle_index % len;
        self.color_cycle_index += 1;
        ColorKey::Palette(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::matcher::MatchMode;

    #[test]
    fn test_new_state_defaults() {
        let state = EngineState::new();
        assert!(state.registry.is_empty());
        assert_eq!(state.scope_mode, ScopeMode::SingleDocument);
        assert_eq!(state.style_mode, StyleMode::Hybrid);
        assert_eq!(state.color_cycle_index, 0);
        assert!(state.active_profile.is_none());
        assert!(!state.highlights_disabled);
    }

    #[test]
    fn test_add_defaults_to_manual_text() {
        let mut state = EngineState::new();
        state.add_highlight("foo", AddOptions::default()).unwrap();
        let entry = state.registry.get("foo").unwrap();
        assert_eq!(entry.mode(), MatchMode::Text);
        assert_eq!(entry.source, HighlightSource::Manual);
        assert_eq!(entry.color, ColorKey::Palette(0));
    }

    #[test]
    fn test_add_uses_active_profile_as_source() {
        let mut state = EngineState::new();
        state.active_profile = Some("Review".to_string());
        state.enabled_profiles.insert("Review".to_string());
        state.add_highlight("foo", AddOptions::default()).unwrap();
        assert_eq!(
            state.registry.get("foo").unwrap().source,
            HighlightSource::profile("Review")
        );
        assert!(state.is_profile_modified("Review"));
    }

    #[test]
    fn test_invalid_pattern_leaves_state_untouched() {
        let mut state = EngineState::new();
        state.add_highlight("ok", AddOptions::default()).unwrap();
        let before = state.snapshot();

        let err = state
            .add_highlight("(bad", AddOptions::with_mode(MatchMode::Regex))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { .. }));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_palette_cycles_through_unused_slots() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state.add_highlight("b", AddOptions::default()).unwrap();
        assert_eq!(state.registry.get("a").unwrap().color, ColorKey::Palette(0));
        assert_eq!(state.registry.get("b").unwrap().color, ColorKey::Palette(1));

        // Freed slot 0 is skipped while the cycle moves forward
        state.remove_highlight("a");
        state.add_highlight("c", AddOptions::default()).unwrap();
        assert_eq!(state.registry.get("c").unwrap().color, ColorKey::Palette(2));
    }

    #[test]
    fn test_palette_reuses_slots_when_exhausted() {
        let mut state = EngineState::new();
        for i in 0..PALETTE.len() {
            state
                .add_highlight(&format!("p{}", i), AddOptions::default())
                .unwrap();
        }
        state.add_highlight("extra", AddOptions::default()).unwrap();
        assert_eq!(
            state.registry.get("extra").unwrap().color,
            ColorKey::Palette(0)
        );
        assert_eq!(state.registry.len(), PALETTE.len() + 1);
    }

    #[test]
    fn test_explicit_color_does_not_advance_cycle() {
        let mut state = EngineState::new();
        state
            .add_highlight("a", AddOptions::default().color(ColorKey::Palette(7)))
            .unwrap();
        assert_eq!(state.color_cycle_index, 0);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut state = EngineState::new();
        assert!(state.toggle_highlight("x", AddOptions::default()).unwrap());
        assert!(state.registry.contains("x"));
        assert!(!state.toggle_highlight("x", AddOptions::default()).unwrap());
        assert!(!state.registry.contains("x"));
    }

    #[test]
    fn test_readding_pattern_replaces_binding() {
        let mut state = EngineState::new();
        state.add_highlight("x", AddOptions::default()).unwrap();
        let first = state.registry.get("x").unwrap().binding_revision;
        state
            .add_highlight("x", AddOptions::with_mode(MatchMode::WholeWord))
            .unwrap();
        let entry = state.registry.get("x").unwrap();
        assert_ne!(entry.binding_revision, first);
        assert_eq!(entry.mode(), MatchMode::WholeWord);
        assert_eq!(state.registry.len(), 1);
    }

    #[test]
    fn test_clear_active_or_manual_with_active_profile() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state
            .add_highlight(
                "b",
                AddOptions::default().source(HighlightSource::profile("X")),
            )
            .unwrap();
        state.active_profile = Some("X".to_string());

        assert_eq!(state.clear_active_or_manual(), 2);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn test_clear_active_or_manual_without_active_profile() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state
            .add_highlight(
                "b",
                AddOptions::default().source(HighlightSource::profile("X")),
            )
            .unwrap();

        assert_eq!(state.clear_active_or_manual(), 1);
        assert!(!state.registry.contains("a"));
        assert!(state.registry.contains("b"));
    }

    #[test]
    fn test_refresh_all_keeps_color_and_source() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state
            .add_highlight(
                "b",
                AddOptions::default().source(HighlightSource::profile("P")),
            )
            .unwrap();
        let before: Vec<_> = state
            .registry
            .iter()
            .map(|e| (e.color, e.source.clone(), e.binding_revision))
            .collect();
        let cycle = state.color_cycle_index;

        state.opacity = 0.75;
        state.refresh_all();

        for (entry, (color, source, revision)) in state.registry.iter().zip(before) {
            assert_eq!(entry.color, color);
            assert_eq!(entry.source, source);
            assert_ne!(entry.binding_revision, revision);
        }
        assert_eq!(state.color_cycle_index, cycle);
    }

    #[test]
    fn test_undo_redo_restores_registry() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        let s0 = state.snapshot();

        state.push_snapshot();
        state.add_highlight("b", AddOptions::default()).unwrap();
        state.remove_highlight("a");
        let s1 = state.snapshot();

        assert!(state.undo());
        assert_eq!(state.snapshot(), s0);
        assert!(state.redo());
        assert_eq!(state.snapshot(), s1);
        assert!(!state.redo());
    }

    #[test]
    fn test_merge_profile_entries_forces_provenance_and_stays_clean() {
        let mut state = EngineState::new();
        state.enabled_profiles.insert("P".to_string());
        let entry = HighlightEntry::new(
            "x",
            ColorKey::Palette(4),
            MatchMode::Text,
            HighlightSource::profile("Stale"),
        )
        .unwrap();
        assert_eq!(state.merge_profile_entries("P", vec![entry]), 1);
        assert_eq!(
            state.registry.get("x").unwrap().source,
            HighlightSource::profile("P")
        );
        assert!(!state.is_profile_modified("P"));
    }

    #[test]
    fn test_style_and_scope_cycles() {
        assert_eq!(StyleMode::Fill.cycled(), StyleMode::Box);
        assert_eq!(StyleMode::Hybrid.cycled(), StyleMode::Fill);
        assert_eq!(
            ScopeMode::SingleDocument.toggled(),
            ScopeMode::AllOpenDocuments
        );
        assert_eq!(ContrastMode::Auto.toggled(), ContrastMode::Force);
    }
}
