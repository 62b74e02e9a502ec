//! Engine runtime - owns the state and executes commands
//!
//! ```text
//! host event → Msg → update() → Cmd → process_cmd()
//!                                        ├─ RenderNow      → render pass
//!                                        ├─ ScheduleRender → debounce timer ─ tick() → render pass
//!                                        ├─ SaveConfig     → config.yaml
//!                                        └─ Notify         → notification queue
//! ```
//!
//! Render passes never call back into `update`, so a mutation can never be
//! re-entered from inside rendering.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::commands::{Cmd, Notification};
use crate::config::EngineConfig;
use crate::messages::Msg;
use crate::model::{DocumentId, EngineState, ScopeMode};
use crate::overlay;
use crate::persistence::ProfileStore;
use crate::renderer::{DecorationBindings, Renderer};
use crate::scheduler::RenderScheduler;
use crate::update::update;

pub struct Engine<R: Renderer, S: ProfileStore> {
    state: EngineState,
    store: S,
    renderer: R,
    bindings: DecorationBindings,
    scheduler: RenderScheduler,
    /// Documents that received ranges in the last pass
    decorated: BTreeSet<DocumentId>,
    config: EngineConfig,
    config_path: Option<PathBuf>,
    notifications: Vec<Notification>,
}

impl<R: Renderer, S: ProfileStore> Engine<R, S> {
    pub fn new(renderer: R, store: S, config: EngineConfig) -> Self {
        Self {
            state: EngineState::from_config(&config),
            store,
            renderer,
            bindings: DecorationBindings::new(),
            scheduler: RenderScheduler::new(Duration::from_millis(config.debounce_ms)),
            decorated: BTreeSet::new(),
            config,
            config_path: None,
            notifications: Vec::new(),
        }
    }

    /// Persist view settings to `path` whenever they change
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn bindings(&self) -> &DecorationBindings {
        &self.bindings
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Documents currently carrying decorations
    pub fn decorated_documents(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.decorated.iter().copied()
    }

    /// Drain queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn dispatch(&mut self, msg: impl Into<Msg>) {
        self.dispatch_at(msg, Instant::now());
    }

    /// Update then process, with an explicit clock for debounce timing
    pub fn dispatch_at(&mut self, msg: impl Into<Msg>, now: Instant) {
        if let Some(cmd) = update(&mut self.state, &mut self.store, msg.into()) {
            self.process_cmd(cmd, now);
        }
    }

    pub fn process_cmd(&mut self, cmd: Cmd, now: Instant) {
        match cmd {
            Cmd::RenderNow => {
                self.scheduler.render_now();
                self.render_pass();
            }
            Cmd::ScheduleRender => self.scheduler.request(now),
            Cmd::SaveConfig => self.save_config(),
            Cmd::Notify(notification) => {
                match &notification {
                    Notification::Info(message) => tracing::info!("{}", message),
                    Notification::Error(message) => tracing::warn!("{}", message),
                    Notification::Profiles(listings) => {
                        tracing::debug!("Listed {} profiles", listings.len())
                    }
                }
                self.notifications.push(notification);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd, now);
                }
            }
        }
    }

    /// Fire the debounce timer if due; returns whether a render ran
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.render_pass();
            true
        } else {
            false
        }
    }

    /// Release every render binding (session end)
    pub fn shutdown(&mut self) {
        self.bindings.dispose_all(&mut self.renderer);
        self.decorated.clear();
        tracing::debug!("Engine shut down");
    }

    fn render_pass(&mut self) {
        if self.state.highlights_disabled {
            self.bindings.dispose_all(&mut self.renderer);
            self.decorated.clear();
            tracing::debug!("Render pass skipped: highlights hidden");
            return;
        }

        let settings = self.state.visual_settings();
        self.bindings
            .reconcile(&self.state.registry, &settings, &mut self.renderer);

        let in_scope: BTreeSet<DocumentId> = match self.state.scope_mode {
            ScopeMode::SingleDocument => self
                .state
                .documents
                .focused()
                .filter(|d| d.visible)
                .map(|d| d.id)
                .into_iter()
                .collect(),
            ScopeMode::AllOpenDocuments => self.state.documents.visible().map(|d| d.id).collect(),
        };

        // Narrowed scope must not leave stale decorations behind
        for id in self.decorated.difference(&in_scope) {
            if self.state.documents.get(*id).is_some() {
                self.bindings.clear_document(*id, &mut self.renderer);
            }
        }

        let mut range_count = 0;
        for id in &in_scope {
            let Some(doc) = self.state.documents.get(*id) else {
                continue;
            };
            for resolved in overlay::resolve(&self.state, doc) {
                if let Some(handle) = self.bindings.handle(resolved.pattern) {
                    range_count += resolved.ranges.len();
                    self.renderer.apply_ranges(*id, handle, &resolved.ranges);
                }
            }
        }

        tracing::debug!(
            "Render pass: {} documents, {} patterns, {} ranges",
            in_scope.len(),
            self.bindings.len(),
            range_count
        );
        self.decorated = in_scope;
    }

    fn save_config(&mut self) {
        self.config.update_from_state(&self.state);
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::warn!("{}", e);
            self.notifications.push(Notification::Error(e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{DocumentMsg, HighlightMsg, ViewMsg};
    use crate::model::AddOptions;
    use crate::persistence::FileProfileStore;
    use crate::renderer::RecordingRenderer;

    fn engine() -> Engine<RecordingRenderer, FileProfileStore> {
        Engine::new(
            RecordingRenderer::new(),
            FileProfileStore::new(None, None),
            EngineConfig::default(),
        )
    }

    fn open(engine: &mut Engine<RecordingRenderer, FileProfileStore>, id: u64, text: &str) {
        engine.dispatch(DocumentMsg::Opened {
            id: DocumentId(id),
            text: text.to_string(),
            path: None,
        });
    }

    fn add(engine: &mut Engine<RecordingRenderer, FileProfileStore>, pattern: &str) {
        engine.dispatch(HighlightMsg::Add {
            pattern: pattern.to_string(),
            options: AddOptions::default(),
        });
    }

    #[test]
    fn test_add_renders_focused_document() {
        let mut engine = engine();
        open(&mut engine, 1, "foo bar foo");
        add(&mut engine, "foo");
        assert_eq!(
            engine.renderer().ranges_for(DocumentId(1), "foo"),
            vec![0..3, 8..11]
        );
    }

    #[test]
    fn test_edits_debounce_into_one_pass() {
        let mut engine = engine();
        open(&mut engine, 1, "x");
        add(&mut engine, "x");
        let passes = engine.scheduler().passes();

        let start = Instant::now();
        for i in 0..5u64 {
            engine.dispatch_at(
                DocumentMsg::Changed {
                    id: DocumentId(1),
                    text: "x".repeat(i as usize + 2),
                },
                start + Duration::from_millis(i * 10),
            );
        }
        assert!(!engine.tick(start + Duration::from_millis(60)));
        assert!(engine.tick(start + Duration::from_millis(40 + 75)));
        assert_eq!(engine.scheduler().passes(), passes + 1);
        assert_eq!(engine.renderer().ranges_for(DocumentId(1), "x").len(), 6);
    }

    #[test]
    fn test_hiding_disposes_and_showing_rebinds() {
        let mut engine = engine();
        open(&mut engine, 1, "a");
        add(&mut engine, "a");
        engine.dispatch(ViewMsg::ToggleVisibility);
        assert_eq!(engine.renderer().live_count(), 0);
        assert_eq!(engine.state().registry.len(), 1);

        engine.dispatch(ViewMsg::ToggleVisibility);
        assert_eq!(engine.renderer().ranges_for(DocumentId(1), "a"), vec![0..1]);
    }

    #[test]
    fn test_shutdown_releases_bindings() {
        let mut engine = engine();
        add(&mut engine, "a");
        add(&mut engine, "b");
        engine.shutdown();
        assert_eq!(engine.renderer().live_count(), 0);
        assert!(engine.bindings().is_empty());
    }
}
