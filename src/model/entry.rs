//! Highlight entries: one pattern bound to a color, a match mode and a source

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::matcher::{find_matches, CompiledMatcher, MatchMode};
use crate::theme::ColorKey;
use std::ops::Range;

/// Where a highlight came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HighlightSource {
    /// Added by hand while no profile was active
    #[default]
    Manual,
    /// Owned by a named profile
    Profile {
        #[serde(rename = "profileName")]
        name: String,
    },
}

impl HighlightSource {
    pub fn profile(name: impl Into<String>) -> Self {
        HighlightSource::Profile { name: name.into() }
    }

    /// Owning profile name, if any
    pub fn profile_name(&self) -> Option<&str> {
        match self {
            HighlightSource::Manual => None,
            HighlightSource::Profile { name } => Some(name),
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, HighlightSource::Manual)
    }

    pub fn is_owned_by(&self, profile: &str) -> bool {
        self.profile_name() == Some(profile)
    }
}

/// Optional settings for adding a highlight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOptions {
    /// Explicit color; next free palette slot when `None`
    pub color: Option<ColorKey>,
    pub mode: MatchMode,
    /// Explicit provenance; derived from the active profile when `None`
    pub source: Option<HighlightSource>,
}

impl AddOptions {
    pub fn with_mode(mode: MatchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn color(mut self, color: ColorKey) -> Self {
        self.color = Some(color);
        self
    }

    pub fn source(mut self, source: HighlightSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// A pattern-to-style binding plus provenance
///
/// The compiled matcher is derived from `pattern` and `mode` at construction
/// and is `Some` exactly when the mode needs one.
#[derive(Debug, Clone)]
pub struct HighlightEntry {
    pattern: String,
    mode: MatchMode,
    matcher: Option<CompiledMatcher>,
    pub color: ColorKey,
    pub source: HighlightSource,
    /// Bumped whenever the render binding for this entry must be recreated
    pub(crate) binding_revision: u64,
}

impl HighlightEntry {
    /// Build an entry, compiling its matcher
    ///
    /// Fails on an empty pattern or one that does not compile; nothing
    /// partial is ever returned.
    pub fn new(
        pattern: impl Into<String>,
        color: ColorKey,
        mode: MatchMode,
        source: HighlightSource,
    ) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(EngineError::EmptyPattern);
        }
        let matcher = CompiledMatcher::compile(&pattern, mode)?;
        Ok(Self {
            pattern,
            mode,
            matcher,
            color,
            source,
            binding_revision: 0,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn matcher(&self) -> Option<&CompiledMatcher> {
        self.matcher.as_ref()
    }

    /// Same entry with a different match mode, recompiled
    pub fn with_mode(&self, mode: MatchMode) -> Result<Self> {
        let mut entry = Self::new(self.pattern.clone(), self.color, mode, self.source.clone())?;
        entry.binding_revision = self.binding_revision;
        Ok(entry)
    }

    /// Byte ranges of this entry's pattern within `text`
    pub fn find_in(&self, text: &str) -> Vec<Range<usize>> {
        find_matches(text, &self.pattern, self.mode, self.matcher.as_ref())
    }
}

// Binding revisions are render bookkeeping, not part of the entry's identity.
impl PartialEq for HighlightEntry {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.mode == other.mode
            && self.color == other.color
            && self.source == other.source
    }
}

impl Eq for HighlightEntry {}
