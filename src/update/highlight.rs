//! Highlight registry and history message handlers

use crate::commands::Cmd;
use crate::messages::{HighlightMsg, HistoryMsg};
use crate::model::EngineState;

use super::report;

/// Handle registry edits; each successful edit is one undo step
pub fn update_highlight(state: &mut EngineState, msg: HighlightMsg) -> Option<Cmd> {
    // Captured before mutation, recorded only once the edit succeeds
    let before = state.snapshot();

    match msg {
        HighlightMsg::Add { pattern, options } => match state.add_highlight(&pattern, options) {
            Ok(()) => {
                state.history.push(before);
                Some(Cmd::RenderNow)
            }
            Err(e) => report("Add highlight", e),
        },

        HighlightMsg::Remove { pattern } => {
            if !state.registry.contains(&pattern) {
                return None;
            }
            state.history.push(before);
            state.remove_highlight(&pattern);
            Some(Cmd::RenderNow)
        }

        HighlightMsg::Toggle { pattern, options } => {
            match state.toggle_highlight(&pattern, options) {
                Ok(_) => {
                    state.history.push(before);
                    Some(Cmd::RenderNow)
                }
                Err(e) => report("Toggle highlight", e),
            }
        }

        HighlightMsg::ClearAll => {
            let removed = state.clear_active_or_manual();
            if removed == 0 {
                return Some(Cmd::info("No highlights to clear"));
            }
            state.history.push(before);
            Some(Cmd::render_with_info(format!(
                "Cleared {} highlight{}",
                removed,
                if removed == 1 { "" } else { "s" }
            )))
        }
    }
}

/// Handle undo/redo
pub fn update_history(state: &mut EngineState, msg: HistoryMsg) -> Option<Cmd> {
    match msg {
        HistoryMsg::Undo => {
            if state.undo() {
                Some(Cmd::RenderNow)
            } else {
                Some(Cmd::info("Nothing to undo"))
            }
        }
        HistoryMsg::Redo => {
            if state.redo() {
                Some(Cmd::RenderNow)
            } else {
                Some(Cmd::info("Nothing to redo"))
            }
        }
    }
}
