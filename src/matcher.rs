//! Pattern matching for highlight entries
//!
//! Pure functions over a text slice. Offsets are byte offsets into the
//! scanned text, ascending and non-overlapping. Zero-length matches are
//! never emitted.

use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How a pattern is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Case-sensitive literal substring
    #[default]
    Text,
    /// Literal bounded by word boundaries on both sides
    WholeWord,
    /// Pattern compiled verbatim
    Regex,
}

impl MatchMode {
    /// Whether this mode needs a compiled matcher
    pub fn needs_compilation(self) -> bool {
        !matches!(self, MatchMode::Text)
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchMode::Text => "text",
            MatchMode::WholeWord => "whole word",
            MatchMode::Regex => "regex",
        }
    }
}

/// Compiled form of a whole-word or regex pattern
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
}

impl CompiledMatcher {
    /// Compile `pattern` for `mode`
    ///
    /// Returns `Ok(None)` for [`MatchMode::Text`], which scans literally.
    pub fn compile(pattern: &str, mode: MatchMode) -> Result<Option<Self>> {
        let source = match mode {
            MatchMode::Text => return Ok(None),
            MatchMode::WholeWord => format!(r"\b{}\b", regex::escape(pattern)),
            MatchMode::Regex => pattern.to_string(),
        };

        Regex::new(&source)
            .map(|regex| Some(Self { regex }))
            .map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.range().is_empty())
            .map(|m| m.range())
            .collect()
    }
}

// Regex identity is its source; the compiled automaton carries no extra state.
impl PartialEq for CompiledMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for CompiledMatcher {}

/// Find every match of `pattern` in `text`
///
/// `compiled` must be the matcher produced for the same pattern and mode;
/// it is ignored in [`MatchMode::Text`].
pub fn find_matches(
    text: &str,
    pattern: &str,
    mode: MatchMode,
    compiled: Option<&CompiledMatcher>,
) -> Vec<Range<usize>> {
    match (mode, compiled) {
        (MatchMode::Text, _) => find_literal(text, pattern),
        (_, Some(matcher)) => matcher.find_all(text),
        (_, None) => {
            // Construction guarantees a compiled matcher for these modes.
            debug_assert!(false, "{} pattern without compiled matcher", mode.label());
            Vec::new()
        }
    }
}

/// Literal forward scan, resuming at the end of each match
fn find_literal(text: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    let mut start = 0;
    while let Some(pos) = text[start..].find(needle) {
        let match_start = start + pos;
        let match_end = match_start + needle.len();
        results.push(match_start..match_end);
        start = match_end;
    }
    results
}
