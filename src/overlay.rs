//! Overlay resolution - registry entries to per-document ranges and styles
//!
//! The registry already holds the merged view of the active profile and
//! every enabled profile, so resolution is a straight scan: one pattern
//! match per entry over the document's scan window.

use std::ops::Range;

use crate::model::{ContrastMode, Document, EngineState, StyleMode, VisualSettings};
use crate::theme::{Color, ColorKey};

/// Extra lines scanned above and below the viewport of a large document
pub const VIEWPORT_MARGIN_LINES: usize = 5;

/// Solid border drawn around a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub width_px: u32,
    pub color: Color,
}

/// Style descriptor handed to the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationStyle {
    /// `None` is a transparent background
    pub background: Option<Color>,
    pub border: Option<Border>,
    /// Forced text color; `None` keeps the syntax color
    pub foreground: Option<Color>,
    /// Mark color in the scrollbar overview
    pub overview_ruler: Color,
}

impl DecorationStyle {
    /// Derive the decoration for `color` under the current view settings
    pub fn derive(color: ColorKey, settings: &VisualSettings) -> Self {
        let base = color.resolve(settings.theme);
        let solid = base.with_alpha(0xFF);
        let translucent = base.with_opacity(settings.opacity);

        let (background, border) = match settings.style {
            StyleMode::Fill => (Some(translucent), None),
            StyleMode::Box => (
                None,
                Some(Border {
                    width_px: 2,
                    color: solid,
                }),
            ),
            StyleMode::Hybrid => (
                Some(translucent),
                Some(Border {
                    width_px: 1,
                    color: solid,
                }),
            ),
        };

        // Box never overrides the underlying text color
        let foreground = match (settings.contrast, settings.style) {
            (ContrastMode::Force, StyleMode::Fill | StyleMode::Hybrid) => {
                Some(color.foreground(settings.theme))
            }
            _ => None,
        };

        Self {
            background,
            border,
            foreground,
            overview_ruler: solid,
        }
    }
}

/// One pattern's decoration for one document
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHighlight<'a> {
    pub pattern: &'a str,
    /// Absolute byte ranges, ascending and non-overlapping
    pub ranges: Vec<Range<usize>>,
    pub style: DecorationStyle,
}

/// Portion of a document to scan, with its absolute start offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWindow {
    pub start_byte: usize,
    pub text: String,
}

impl ScanWindow {
    /// Whole document, or the viewport plus margin when the document is large
    ///
    /// A large document with no reported viewport is scanned in full.
    pub fn for_document(doc: &Document, large_file_line_threshold: usize) -> Self {
        let line_count = doc.line_count();
        let viewport = match &doc.viewport {
            Some(viewport) if line_count > large_file_line_threshold => viewport.clone(),
            _ => {
                return Self {
                    start_byte: 0,
                    text: doc.buffer.to_string(),
                }
            }
        };

        let first_line = viewport
            .start
            .saturating_sub(VIEWPORT_MARGIN_LINES)
            .min(line_count);
        let end_line = viewport
            .end
            .saturating_add(VIEWPORT_MARGIN_LINES)
            .min(line_count);

        let start_char = doc.buffer.line_to_char(first_line);
        let end_char = if end_line >= line_count {
            doc.buffer.len_chars()
        } else {
            doc.buffer.line_to_char(end_line)
        };
        let end_char = end_char.max(start_char);

        Self {
            start_byte: doc.buffer.char_to_byte(start_char),
            text: doc.buffer.slice(start_char..end_char).to_string(),
        }
    }
}

/// Compute the final decorations for `doc`
///
/// Returns nothing while highlights are globally disabled; the registry is
/// left untouched either way.
pub fn resolve<'a>(state: &'a EngineState, doc: &Document) -> Vec<ResolvedHighlight<'a>> {
    if state.highlights_disabled {
        return Vec::new();
    }

    let window = ScanWindow::for_document(doc, state.large_file_line_threshold);
    let settings = state.visual_settings();

    state
        .registry
        .iter()
        .map(|entry| {
            let ranges = entry
                .find_in(&window.text)
                .into_iter()
                .map(|r| (r.start + window.start_byte)..(r.end + window.start_byte))
                .collect();
            ResolvedHighlight {
                pattern: entry.pattern(),
                ranges,
                style: DecorationStyle::derive(entry.color, &settings),
            }
        })
        .collect()
}
