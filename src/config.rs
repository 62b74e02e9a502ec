//! Engine configuration persistence
//!
//! Stores view preferences in `~/.config/hilite/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::model::{ContrastMode, EngineState, ScopeMode, StyleMode};

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Background opacity for Fill and Hybrid styles (0.0 - 1.0)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    #[serde(default)]
    pub contrast: ContrastMode,

    #[serde(default)]
    pub style: StyleMode,

    #[serde(default)]
    pub scope: ScopeMode,

    /// Documents longer than this are only scanned around the viewport
    #[serde(default = "default_large_file_line_threshold")]
    pub large_file_line_threshold: usize,

    /// Quiet period before a burst of edits is rendered
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of undo steps
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_opacity() -> f32 {
    0.35
}

fn default_large_file_line_threshold() -> usize {
    5000
}

fn default_debounce_ms() -> u64 {
    crate::scheduler::DEFAULT_DEBOUNCE_MS
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            contrast: ContrastMode::default(),
            style: StyleMode::default(),
            scope: ScopeMode::default(),
            large_file_line_threshold: default_large_file_line_threshold(),
            debounce_ms: default_debounce_ms(),
            history_depth: default_history_depth(),
        }
    }
}

impl EngineConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Capture the view settings of a running session
    pub fn update_from_state(&mut self, state: &EngineState) {
        self.opacity = state.opacity;
        self.contrast = state.contrast;
        self.style = state.style_mode;
        self.scope = state.scope_mode;
    }
}
