//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Failures are
//! recovered here and reported as notifications; none of them leave the
//! engine unusable.

mod document;
mod highlight;
mod profile;
mod view;

use crate::commands::Cmd;
use crate::error::EngineError;
use crate::messages::Msg;
use crate::model::EngineState;
use crate::persistence::ProfileStore;

pub use document::update_document;
pub use highlight::{update_highlight, update_history};
pub use profile::update_profile;
pub use view::update_view;

/// Main update function - dispatches to sub-handlers
pub fn update(state: &mut EngineState, store: &mut dyn ProfileStore, msg: Msg) -> Option<Cmd> {
    tracing::trace!(?msg, "update");
    match msg {
        Msg::Highlight(m) => update_highlight(state, m),
        Msg::Profile(m) => update_profile(state, store, m),
        Msg::History(m) => update_history(state, m),
        Msg::View(m) => update_view(state, m),
        Msg::Document(m) => update_document(state, m),
    }
}

/// Report a failed command; the state was left as it was
pub(crate) fn report(context: &str, err: EngineError) -> Option<Cmd> {
    tracing::warn!("{} failed: {}", context, err);
    Some(Cmd::error(err.to_string()))
}
