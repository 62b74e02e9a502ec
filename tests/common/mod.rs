//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::Instant;

use hilite::matcher::MatchMode;
use hilite::messages::{DocumentMsg, HighlightMsg};
use hilite::model::{AddOptions, DocumentId, HighlightSource};
use hilite::persistence::{ProfileMetadata, StoredHighlight};
use hilite::{Engine, EngineConfig, FileProfileStore, ProfileScope, ProfileStore, RecordingRenderer};
use tempfile::TempDir;

pub type TestEngine = Engine<RecordingRenderer, FileProfileStore>;

/// Profile store with both scopes rooted in a temp dir
pub fn temp_store() -> (TempDir, FileProfileStore) {
    let dir = TempDir::new().expect("create temp dir");
    let store = FileProfileStore::new(
        Some(dir.path().join("workspace")),
        Some(dir.path().join("global")),
    );
    (dir, store)
}

/// Engine backed by a temp profile store and a recording renderer
pub fn test_engine() -> (TempDir, TestEngine) {
    let (dir, store) = temp_store();
    let engine = Engine::new(RecordingRenderer::new(), store, EngineConfig::default());
    (dir, engine)
}

/// Write a workspace profile with text-mode highlights
pub fn write_profile(store: &mut FileProfileStore, name: &str, patterns: &[(&str, &str)]) {
    write_profile_in(store, ProfileScope::Workspace, name, patterns);
}

pub fn write_profile_in(
    store: &mut FileProfileStore,
    scope: ProfileScope,
    name: &str,
    patterns: &[(&str, &str)],
) {
    let highlights: Vec<StoredHighlight> = patterns
        .iter()
        .map(|(pattern, color)| StoredHighlight {
            pattern: pattern.to_string(),
            color: color.to_string(),
            mode: MatchMode::Text,
            source: Some(HighlightSource::profile(name)),
        })
        .collect();
    store
        .save_profile(scope, name, &ProfileMetadata::new_now(), &highlights)
        .expect("write profile");
}

pub fn open(engine: &mut TestEngine, id: u64, text: &str) -> DocumentId {
    let id = DocumentId(id);
    engine.dispatch_at(
        DocumentMsg::Opened {
            id,
            text: text.to_string(),
            path: None,
        },
        Instant::now(),
    );
    id
}

pub fn add(engine: &mut TestEngine, pattern: &str) {
    add_with(engine, pattern, AddOptions::default());
}

pub fn add_with(engine: &mut TestEngine, pattern: &str, options: AddOptions) {
    engine.dispatch(HighlightMsg::Add {
        pattern: pattern.to_string(),
        options,
    });
}

/// Patterns in the registry, sorted
pub fn patterns(engine: &TestEngine) -> Vec<String> {
    let mut patterns: Vec<String> = engine
        .state()
        .registry
        .patterns()
        .map(str::to_string)
        .collect();
    patterns.sort();
    patterns
}

/// Owning profile of `pattern`, `None` for manual entries
pub fn owner(engine: &TestEngine, pattern: &str) -> Option<String> {
    engine
        .state()
        .registry
        .get(pattern)
        .and_then(|e| e.source.profile_name().map(str::to_string))
}
