//! Document mirror - the engine's view of the host's open documents
//!
//! The host owns the real buffers. It reports opens, edits, focus and
//! viewport changes; the engine keeps a rope per document to scan.

use ropey::Rope;
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::PathBuf;

/// Unique identifier for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// An open document as last reported by the host
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for untitled buffers)
    pub file_path: Option<PathBuf>,
    /// Visible line range (end exclusive), when the host reported one
    pub viewport: Option<Range<usize>>,
    /// Whether the document is shown in some editor pane
    pub visible: bool,
    /// Incremented on each reported edit
    pub revision: u64,
}

impl Document {
    pub fn new(id: DocumentId, text: &str) -> Self {
        Self {
            id,
            buffer: Rope::from_str(text),
            file_path: None,
            viewport: None,
            visible: true,
            revision: 0,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Replace the whole buffer after an edit
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        self.revision += 1;
    }

    /// Display name for logs and CLI output
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("untitled-{}", self.id.0))
    }

    /// (line, column) of a byte offset, both 0-based; column counts chars
    pub fn line_col(&self, byte_offset: usize) -> (usize, usize) {
        let byte_offset = byte_offset.min(self.buffer.len_bytes());
        let char_idx = self.buffer.byte_to_char(byte_offset);
        let line = self.buffer.char_to_line(char_idx);
        let column = char_idx - self.buffer.line_to_char(line);
        (line, column)
    }
}

/// All documents the host has open, plus which one has focus
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: BTreeMap<DocumentId, Document>,
    focused: Option<DocumentId>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a document; the first one opened takes focus
    pub fn open(&mut self, document: Document) {
        let id = document.id;
        self.documents.insert(id, document);
        if self.focused.is_none() {
            self.focused = Some(id);
        }
    }

    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        let doc = self.documents.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        doc
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn focus(&mut self, id: DocumentId) -> bool {
        match self.documents.get_mut(&id) {
            Some(doc) => {
                doc.visible = true;
                self.focused = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn focused(&self) -> Option<&Document> {
        self.focused.and_then(|id| self.documents.get(&id))
    }

    pub fn focused_id(&self) -> Option<DocumentId> {
        self.focused
    }

    /// Documents currently shown in some pane, in id order
    pub fn visible(&self) -> impl Iterator<Item = &Document> {
        self.documents.values().filter(|d| d.visible)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Smallest id not yet in use
    pub fn next_id(&self) -> DocumentId {
        DocumentId(
            self.documents
                .keys()
                .next_back()
                .map(|id| id.0 + 1)
                .unwrap_or(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_opened_document_takes_focus() {
        let mut docs = DocumentSet::new();
        docs.open(Document::new(DocumentId(1), "a"));
        docs.open(Document::new(DocumentId(2), "b"));
        assert_eq!(docs.focused_id(), Some(DocumentId(1)));
        assert!(docs.focus(DocumentId(2)));
        assert_eq!(docs.focused_id(), Some(DocumentId(2)));
        assert!(!docs.focus(DocumentId(9)));
    }

    #[test]
    fn test_close_clears_focus() {
        let mut docs = DocumentSet::new();
        docs.open(Document::new(DocumentId(1), "a"));
        assert!(docs.close(DocumentId(1)).is_some());
        assert!(docs.focused().is_none());
        assert!(docs.is_empty());
    }

    #[test]
    fn test_visible_filters_hidden_documents() {
        let mut docs = DocumentSet::new();
        docs.open(Document::new(DocumentId(1), "a"));
        let mut hidden = Document::new(DocumentId(2), "b");
        hidden.visible = false;
        docs.open(hidden);
        let ids: Vec<_> = docs.visible().map(|d| d.id).collect();
        assert_eq!(ids, vec![DocumentId(1)]);
    }

    #[test]
    fn test_set_text_bumps_revision() {
        let mut doc = Document::new(DocumentId(1), "one");
        doc.set_text("one\ntwo");
        assert_eq!(doc.revision, 1);
        assert_eq!(doc.line_count(), 2);
    }

    #[test]
    fn test_line_col() {
        let doc = Document::new(DocumentId(1), "ab\nçd\n");
        assert_eq!(doc.line_col(0), (0, 0));
        assert_eq!(doc.line_col(3), (1, 0));
        // 'ç' is two bytes; 'd' starts at byte 5
        assert_eq!(doc.line_col(5), (1, 1));
    }

    #[test]
    fn test_next_id() {
        let mut docs = DocumentSet::new();
        assert_eq!(docs.next_id(), DocumentId(1));
        docs.open(Document::new(DocumentId(4), ""));
        assert_eq!(docs.next_id(), DocumentId(5));
    }
}
