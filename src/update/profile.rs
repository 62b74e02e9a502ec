//! Profile lifecycle message handlers

use crate::commands::{Cmd, Notification};
use crate::controller;
use crate::messages::ProfileMsg;
use crate::model::EngineState;
use crate::persistence::ProfileStore;

use super::report;

pub fn update_profile(
    state: &mut EngineState,
    store: &mut dyn ProfileStore,
    msg: ProfileMsg,
) -> Option<Cmd> {
    match msg {
        ProfileMsg::Activate { name } => match controller::activate(state, &*store, &name) {
            Ok(count) => Some(Cmd::render_with_info(format!(
                "Profile '{}' active ({} highlights)",
                name, count
            ))),
            Err(e) => report("Activate profile", e),
        },

        ProfileMsg::Enable { name } => match controller::enable(state, &*store, &name) {
            Ok(count) => Some(Cmd::render_with_info(format!(
                "Profile '{}' enabled ({} highlights)",
                name, count
            ))),
            Err(e) => report("Enable profile", e),
        },

        ProfileMsg::Disable { name } => {
            let removed = controller::disable(state, &name);
            Some(Cmd::render_with_info(format!(
                "Profile '{}' disabled ({} highlights hidden)",
                name, removed
            )))
        }

        ProfileMsg::Save { name, scope } => {
            match controller::save(state, store, name.as_deref(), scope) {
                Ok(outcome) => Some(Cmd::info(format!(
                    "{} {} profile '{}' ({} highlights)",
                    if outcome.created { "Created" } else { "Saved" },
                    outcome.scope,
                    outcome.name,
                    outcome.highlight_count
                ))),
                Err(e) => report("Save profile", e),
            }
        }

        ProfileMsg::Delete { name, scope } => {
            match controller::delete(state, store, &name, scope) {
                Ok(scope) => Some(Cmd::render_with_info(format!(
                    "Deleted {} profile '{}'",
                    scope, name
                ))),
                Err(e) => report("Delete profile", e),
            }
        }

        ProfileMsg::Duplicate { from, to, scope } => {
            match controller::duplicate(store, &from, &to, scope) {
                Ok(scope) => Some(Cmd::info(format!(
                    "Duplicated '{}' as {} profile '{}'",
                    from, scope, to
                ))),
                Err(e) => report("Duplicate profile", e),
            }
        }

        ProfileMsg::Merge { from, into } => {
            let before = state.snapshot();
            let into_active = state.is_profile_active(&into);
            match controller::merge(state, store, &from, &into) {
                Ok(added) => {
                    if into_active {
                        state.history.push(before);
                    }
                    Some(Cmd::render_with_info(format!(
                        "Merged '{}' into '{}' ({} added)",
                        from, into, added
                    )))
                }
                Err(e) => report("Merge profiles", e),
            }
        }

        ProfileMsg::SetColor { name, color } => {
            match controller::set_color(store, &name, color) {
                Ok(()) => Some(Cmd::info(match color {
                    Some(color) => format!("Profile '{}' color set to {}", name, color),
                    None => format!("Profile '{}' color cleared", name),
                })),
                Err(e) => report("Set profile color", e),
            }
        }

        ProfileMsg::List => match controller::list(state, &*store) {
            Ok(listings) => Some(Cmd::Notify(Notification::Profiles(listings))),
            Err(e) => report("List profiles", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::FileProfileStore;
    use tempfile::TempDir;

    #[test]
    fn test_missing_profile_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut store = FileProfileStore::new(None, Some(dir.path().to_path_buf()));
        let mut state = EngineState::new();

        let cmd = update_profile(
            &mut state,
            &mut store,
            ProfileMsg::Activate {
                name: "missing".to_string(),
            },
        )
        .unwrap();
        assert!(cmd.notifications()[0].is_error());
        assert!(state.active_profile.is_none());
    }

    #[test]
    fn test_save_without_workspace_falls_back_to_global() {
        let dir = TempDir::new().unwrap();
        let mut store = FileProfileStore::new(None, Some(dir.path().to_path_buf()));
        let mut state = EngineState::new();

        let cmd = update_profile(
            &mut state,
            &mut store,
            ProfileMsg::Save {
                name: Some("P".to_string()),
                scope: None,
            },
        )
        .unwrap();
        assert_eq!(
            cmd,
            Cmd::info("Created global profile 'P' (0 highlights)")
        );
        assert!(dir.path().join("P.json").exists());
    }

    #[test]
    fn test_save_to_workspace_without_workspace_errors() {
        let dir = TempDir::new().unwrap();
        let mut store = FileProfileStore::new(None, Some(dir.path().to_path_buf()));
        let mut state = EngineState::new();

        let cmd = update_profile(
            &mut state,
            &mut store,
            ProfileMsg::Save {
                name: Some("P".to_string()),
                scope: Some(crate::persistence::ProfileScope::Workspace),
            },
        )
        .unwrap();
        assert!(cmd.notifications()[0].is_error());
        assert!(state.active_profile.is_none());
    }
}
