//! Host document notification handlers
//!
//! Edits and scrolling are debounced; focus and close render immediately so
//! the visible state never lags a user action.

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::{Document, EngineState, ScopeMode};

pub fn update_document(state: &mut EngineState, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::Opened { id, text, path } => {
            let mut doc = Document::new(id, &text);
            if let Some(path) = path {
                doc = doc.with_path(path);
            }
            tracing::debug!("Opened {} ({} lines)", doc.display_name(), doc.line_count());
            state.documents.open(doc);
            Some(Cmd::RenderNow)
        }

        DocumentMsg::Changed { id, text } => {
            let doc = state.documents.get_mut(id)?;
            doc.set_text(&text);
            in_scope(state, id).then_some(Cmd::ScheduleRender)
        }

        DocumentMsg::ViewportChanged { id, lines } => {
            let threshold = state.large_file_line_threshold;
            let doc = state.documents.get_mut(id)?;
            doc.viewport = Some(lines);
            // Small documents are scanned in full; scrolling changes nothing
            let windowed = doc.line_count() > threshold;
            (windowed && in_scope(state, id)).then_some(Cmd::ScheduleRender)
        }

        DocumentMsg::Focused(id) => {
            if !state.documents.focus(id) {
                return None;
            }
            Some(Cmd::RenderNow)
        }

        DocumentMsg::Hidden(id) => {
            let doc = state.documents.get_mut(id)?;
            doc.visible = false;
            Some(Cmd::RenderNow)
        }

        DocumentMsg::Closed(id) => {
            state.documents.close(id)?;
            Some(Cmd::RenderNow)
        }
    }
}

/// Whether `id` is decorated under the current scope
fn in_scope(state: &EngineState, id: crate::model::DocumentId) -> bool {
    match state.scope_mode {
        ScopeMode::SingleDocument => state.documents.focused_id() == Some(id),
        ScopeMode::AllOpenDocuments => state.documents.get(id).is_some_and(|d| d.visible),
    }
}
