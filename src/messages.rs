//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::ops::Range;
use std::path::PathBuf;

use crate::model::{AddOptions, DocumentId, StyleMode};
use crate::persistence::ProfileScope;
use crate::theme::ColorKey;

/// Highlight registry commands
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightMsg {
    /// Add or overwrite a highlight
    Add { pattern: String, options: AddOptions },
    /// Remove a highlight (no-op if absent)
    Remove { pattern: String },
    /// Remove if present, otherwise add
    Toggle { pattern: String, options: AddOptions },
    /// Remove manual and active-profile highlights
    ClearAll,
}

/// Profile lifecycle commands
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileMsg {
    Activate { name: String },
    Enable { name: String },
    Disable { name: String },
    /// Save the named profile, or the active one
    Save {
        name: Option<String>,
        scope: Option<ProfileScope>,
    },
    Delete {
        name: String,
        scope: Option<ProfileScope>,
    },
    Duplicate {
        from: String,
        to: String,
        scope: Option<ProfileScope>,
    },
    Merge { from: String, into: String },
    /// Set (or clear) a profile's UI color
    SetColor { name: String, color: Option<ColorKey> },
    List,
}

/// Undo/redo over registry snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMsg {
    Undo,
    Redo,
}

/// Presentation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMsg {
    /// Background opacity, clamped to 0.0..=1.0
    SetOpacity(f32),
    ToggleContrast,
    ToggleScope,
    CycleStyle,
    SetStyle(StyleMode),
    /// Host switched between light and dark themes
    ThemeChanged { is_light: bool },
    /// Show/hide every highlight without touching data
    ToggleVisibility,
}

/// Host document notifications
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentMsg {
    Opened {
        id: DocumentId,
        text: String,
        path: Option<PathBuf>,
    },
    /// Buffer contents after an edit
    Changed { id: DocumentId, text: String },
    Closed(DocumentId),
    Focused(DocumentId),
    /// Visible line range (end exclusive)
    ViewportChanged { id: DocumentId, lines: Range<usize> },
    /// No longer shown in any pane
    Hidden(DocumentId),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Highlight(HighlightMsg),
    Profile(ProfileMsg),
    History(HistoryMsg),
    View(ViewMsg),
    Document(DocumentMsg),
}

impl From<HighlightMsg> for Msg {
    fn from(msg: HighlightMsg) -> Self {
        Msg::Highlight(msg)
    }
}

impl From<ProfileMsg> for Msg {
    fn from(msg: ProfileMsg) -> Self {
        Msg::Profile(msg)
    }
}

impl From<HistoryMsg> for Msg {
    fn from(msg: HistoryMsg) -> Self {
        Msg::History(msg)
    }
}

impl From<ViewMsg> for Msg {
    fn from(msg: ViewMsg) -> Self {
        Msg::View(msg)
    }
}

impl From<DocumentMsg> for Msg {
    fn from(msg: DocumentMsg) -> Self {
        Msg::Document(msg)
    }
}
