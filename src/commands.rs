//! Commands for the Elm-style architecture
//!
//! Commands describe side effects to perform after an update.

use crate::controller::ProfileListing;

/// User-facing message produced by a command
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Info(String),
    /// A command failed; the engine is still usable
    Error(String),
    /// Result of a profile listing
    Profiles(Vec<ProfileListing>),
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Reconcile bindings and decorate in-scope documents right away
    RenderNow,
    /// Debounced render; replaces any pending one
    ScheduleRender,
    /// Persist view settings
    SaveConfig,
    Notify(Notification),
    /// Multiple commands in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Cmd::Notify(Notification::Info(message.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Cmd::Notify(Notification::Error(message.into()))
    }

    /// Render now, then report `message`
    pub fn render_with_info(message: impl Into<String>) -> Self {
        Cmd::Batch(vec![Cmd::RenderNow, Cmd::info(message)])
    }

    /// Whether this command (or any batched one) renders immediately
    pub fn renders_now(&self) -> bool {
        match self {
            Cmd::RenderNow => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.renders_now()),
            _ => false,
        }
    }

    /// Notifications carried by this command, in order
    pub fn notifications(&self) -> Vec<&Notification> {
        match self {
            Cmd::Notify(n) => vec![n],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.notifications()).collect(),
            _ => Vec::new(),
        }
    }
}
