//! hilite - layered, profile-based pattern highlighting
//!
//! This crate provides the highlight overlay engine: a registry of
//! pattern→style bindings, grouped into named profiles that can be layered,
//! resolved into per-document ranges and handed to a host renderer. It
//! follows the Elm Architecture pattern (model, messages, update, commands).

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod controller;
pub mod engine;
pub mod error;
pub mod history;
pub mod matcher;
pub mod messages;
pub mod model;
pub mod overlay;
pub mod persistence;
pub mod renderer;
pub mod scheduler;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::{Cmd, Notification};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use matcher::MatchMode;
pub use messages::Msg;
pub use model::EngineState;
pub use persistence::{FileProfileStore, ProfileScope, ProfileStore};
pub use renderer::{RecordingRenderer, Renderer};
