//! Error taxonomy for engine operations
//!
//! Every variant is recoverable: the command that produced it is aborted
//! and reported, and the engine keeps running.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by registry, profile and persistence operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Whole-word or regex pattern failed to compile
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern must not be empty")]
    EmptyPattern,

    /// Workspace-scoped profile requested with no workspace open
    #[error("no workspace folder is open; workspace profiles are unavailable")]
    NoWorkspace,

    /// Referenced profile has no backing record
    #[error("profile `{name}` not found")]
    ProfileNotFound { name: String },

    /// Persisted profile is neither a bare array nor a `{ highlights: [...] }` object
    #[error("profile file {} is malformed: {reason}", path.display())]
    MalformedProfile { path: PathBuf, reason: String },

    /// Target of a duplicate already exists
    #[error("profile `{name}` already exists")]
    ProfileExists { name: String },

    /// Empty name, or one that would escape the profile directory
    #[error("invalid profile name `{name}`")]
    InvalidProfileName { name: String },

    /// Save requested without a name while no profile is active
    #[error("no active profile; a profile name is required")]
    NoActiveProfile,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
