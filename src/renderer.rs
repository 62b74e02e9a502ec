//! Host renderer seam and decoration bindings
//!
//! The engine never paints. It binds one style per pattern, then hands each
//! document the ranges for that style. `DecorationBindings` keeps the
//! at-most-one-handle-per-pattern bookkeeping in sync with the registry.

use std::collections::HashMap;
use std::ops::Range;

use crate::model::{DocumentId, Registry, VisualSettings};
use crate::overlay::DecorationStyle;

/// Opaque handle returned by the host for a bound style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationHandle(pub u64);

/// Decoration primitives provided by the host editor
pub trait Renderer {
    /// Create a decoration type for `pattern` with `style`
    fn bind_style(&mut self, pattern: &str, style: &DecorationStyle) -> DecorationHandle;

    /// Replace the ranges decorated by `handle` in `document`
    ///
    /// An empty slice clears the decoration from that document.
    fn apply_ranges(
        &mut self,
        document: DocumentId,
        handle: DecorationHandle,
        ranges: &[Range<usize>],
    );

    /// Release a decoration type; its ranges disappear from every document
    fn dispose(&mut self, handle: DecorationHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    handle: DecorationHandle,
    revision: u64,
}

/// Live render bindings, at most one per pattern
#[derive(Debug, Default)]
pub struct DecorationBindings {
    bindings: HashMap<String, Binding>,
}

impl DecorationBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn handle(&self, pattern: &str) -> Option<DecorationHandle> {
        self.bindings.get(pattern).map(|b| b.handle)
    }

    /// Bring bindings in line with the registry
    ///
    /// Bindings whose entry is gone or was re-created (new revision) are
    /// disposed first; every entry without a binding then gets one.
    pub fn reconcile(
        &mut self,
        registry: &Registry,
        settings: &VisualSettings,
        renderer: &mut dyn Renderer,
    ) {
        let mut stale = Vec::new();
        for (pattern, binding) in &self.bindings {
            let current = registry.get(pattern).map(|e| e.binding_revision);
            if current != Some(binding.revision) {
                stale.push(pattern.clone());
            }
        }
        for pattern in stale {
            if let Some(binding) = self.bindings.remove(&pattern) {
                renderer.dispose(binding.handle);
            }
        }

        for entry in registry.iter() {
            if self.bindings.contains_key(entry.pattern()) {
                continue;
            }
            let style = DecorationStyle::derive(entry.color, settings);
            let handle = renderer.bind_style(entry.pattern(), &style);
            tracing::trace!("Bound {:?} as {:?}", entry.pattern(), handle);
            self.bindings.insert(
                entry.pattern().to_string(),
                Binding {
                    handle,
                    revision: entry.binding_revision,
                },
            );
        }
    }

    /// Remove every decoration from `document`, keeping the bindings
    pub fn clear_document(&self, document: DocumentId, renderer: &mut dyn Renderer) {
        for binding in self.bindings.values() {
            renderer.apply_ranges(document, binding.handle, &[]);
        }
    }

    /// Release every binding
    pub fn dispose_all(&mut self, renderer: &mut dyn Renderer) {
        for (_, binding) in self.bindings.drain() {
            renderer.dispose(binding.handle);
        }
    }
}

/// In-memory renderer for headless runs and tests
///
/// Keeps the styles and ranges the host would currently be showing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    styles: HashMap<DecorationHandle, (String, DecorationStyle)>,
    ranges: HashMap<(DocumentId, DecorationHandle), Vec<Range<usize>>>,
    bind_count: usize,
    dispose_count: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (bound, not disposed) handles
    pub fn live_count(&self) -> usize {
        self.styles.len()
    }

    /// Total `bind_style` calls so far
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }

    /// Total `dispose` calls so far
    pub fn dispose_count(&self) -> usize {
        self.dispose_count
    }

    pub fn style(&self, handle: DecorationHandle) -> Option<&DecorationStyle> {
        self.styles.get(&handle).map(|(_, style)| style)
    }

    /// Live handle bound for `pattern`
    pub fn handle_for(&self, pattern: &str) -> Option<DecorationHandle> {
        self.styles
            .iter()
            .find(|(_, (p, _))| p == pattern)
            .map(|(handle, _)| *handle)
    }

    /// Style currently bound for `pattern`
    pub fn style_for(&self, pattern: &str) -> Option<&DecorationStyle> {
        self.handle_for(pattern).and_then(|h| self.style(h))
    }

    /// Ranges shown for `pattern` in `document`
    pub fn ranges_for(&self, document: DocumentId, pattern: &str) -> Vec<Range<usize>> {
        self.handle_for(pattern)
            .and_then(|h| self.ranges.get(&(document, h)))
            .cloned()
            .unwrap_or_default()
    }

    /// Every non-empty decoration in `document`, sorted by pattern
    pub fn decorations(&self, document: DocumentId) -> Vec<(String, Vec<Range<usize>>)> {
        let mut result: Vec<_> = self
            .ranges
            .iter()
            .filter(|((doc, _), ranges)| *doc == document && !ranges.is_empty())
            .filter_map(|((_, handle), ranges)| {
                self.styles
                    .get(handle)
                    .map(|(pattern, _)| (pattern.clone(), ranges.clone()))
            })
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    /// Whether `document` currently shows any decoration
    pub fn is_decorated(&self, document: DocumentId) -> bool {
        self.ranges
            .iter()
            .any(|((doc, _), ranges)| *doc == document && !ranges.is_empty())
    }
}

impl Renderer for RecordingRenderer {
    fn bind_style(&mut self, pattern: &str, style: &DecorationStyle) -> DecorationHandle {
        self.next_handle += 1;
        self.bind_count += 1;
        let handle = DecorationHandle(self.next_handle);
        self.styles.insert(handle, (pattern.to_string(), *style));
        handle
    }

    fn apply_ranges(
        &mut self,
        document: DocumentId,
        handle: DecorationHandle,
        ranges: &[Range<usize>],
    ) {
        if !self.styles.contains_key(&handle) {
            tracing::warn!("apply_ranges on disposed handle {:?}", handle);
            return;
        }
        if ranges.is_empty() {
            self.ranges.remove(&(document, handle));
        } else {
            self.ranges.insert((document, handle), ranges.to_vec());
        }
    }

    fn dispose(&mut self, handle: DecorationHandle) {
        self.dispose_count += 1;
        self.styles.remove(&handle);
        self.ranges.retain(|(_, h), _| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddOptions, EngineState};

    #[test]
    fn test_reconcile_binds_each_entry_once() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state.add_highlight("b", AddOptions::default()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let mut bindings = DecorationBindings::new();

        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);
        assert_eq!(renderer.bind_count(), 2);
        assert_eq!(renderer.live_count(), 2);
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_reconcile_disposes_removed_and_replaced() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        state.add_highlight("b", AddOptions::default()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let mut bindings = DecorationBindings::new();
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);
        let old_a = bindings.handle("a").unwrap();

        state.remove_highlight("b");
        state.add_highlight("a", AddOptions::default()).unwrap();
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);

        assert_eq!(renderer.dispose_count(), 2);
        assert_eq!(renderer.live_count(), 1);
        assert_ne!(bindings.handle("a"), Some(old_a));
        assert!(bindings.handle("b").is_none());
    }

    #[test]
    fn test_refresh_all_rebinds_with_new_style() {
        let mut state = EngineState::new();
        state.add_highlight("a", AddOptions::default()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let mut bindings = DecorationBindings::new();
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);
        let before = *renderer.style_for("a").unwrap();

        state.opacity = 0.75;
        state.refresh_all();
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);
        let after = *renderer.style_for("a").unwrap();

        assert_ne!(before.background, after.background);
        assert_eq!(before.border, after.border);
        assert_eq!(renderer.live_count(), 1);
    }

    #[test]
    fn test_recording_renderer_tracks_ranges() {
        let mut state = EngineState::new();
        state.add_highlight("x", AddOptions::default()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let mut bindings = DecorationBindings::new();
        bindings.reconcile(&state.registry, &state.visual_settings(), &mut renderer);

        let doc = DocumentId(1);
        let handle = bindings.handle("x").unwrap();
        renderer.apply_ranges(doc, handle, &[0..1, 4..5]);
        assert_eq!(renderer.ranges_for(doc, "x"), vec![0..1, 4..5]);
        assert!(renderer.is_decorated(doc));

        bindings.clear_document(doc, &mut renderer);
        assert!(!renderer.is_decorated(doc));

        bindings.dispose_all(&mut renderer);
        assert!(bindings.is_empty());
        assert_eq!(renderer.live_count(), 0);
    }
}
