//! Undo/redo tests driven through engine messages

mod common;

use common::{add, add_with, open, patterns, test_engine, write_profile};
use hilite::matcher::MatchMode;
use hilite::messages::{HighlightMsg, HistoryMsg, ProfileMsg};
use hilite::model::AddOptions;
use hilite::{Engine, EngineConfig, Notification, RecordingRenderer};

#[test]
fn test_undo_redo_walks_registry_states() {
    let (_dir, mut engine) = test_engine();
    add(&mut engine, "a");
    add(&mut engine, "b");

    engine.dispatch(HistoryMsg::Undo);
    assert_eq!(patterns(&engine), vec!["a"]);
    engine.dispatch(HistoryMsg::Undo);
    assert!(patterns(&engine).is_empty());

    engine.dispatch(HistoryMsg::Redo);
    engine.dispatch(HistoryMsg::Redo);
    assert_eq!(patterns(&engine), vec!["a", "b"]);
}

#[test]
fn test_empty_history_reports_info() {
    let (_dir, mut engine) = test_engine();
    engine.dispatch(HistoryMsg::Undo);
    engine.dispatch(HistoryMsg::Redo);
    let notes = engine.take_notifications();
    assert_eq!(
        notes,
        vec![
            Notification::Info("Nothing to undo".to_string()),
            Notification::Info("Nothing to redo".to_string()),
        ]
    );
}

#[test]
fn test_new_edit_discards_redo() {
    let (_dir, mut engine) = test_engine();
    add(&mut engine, "a");
    engine.dispatch(HistoryMsg::Undo);
    add(&mut engine, "b");

    assert!(!engine.state().history.can_redo());
    engine.dispatch(HistoryMsg::Redo);
    assert_eq!(patterns(&engine), vec!["b"]);
}

#[test]
fn test_failed_add_is_not_an_undo_step() {
    let (_dir, mut engine) = test_engine();
    add(&mut engine, "ok");
    add_with(&mut engine, "(", AddOptions::with_mode(MatchMode::Regex));
    add(&mut engine, "");

    assert_eq!(engine.state().history.undo_count(), 1);
    let errors = engine
        .take_notifications()
        .into_iter()
        .filter(|n| n.is_error())
        .count();
    assert_eq!(errors, 2);
}

#[test]
fn test_removing_missing_pattern_is_not_an_undo_step() {
    let (_dir, mut engine) = test_engine();
    add(&mut engine, "a");
    engine.dispatch(HighlightMsg::Remove {
        pattern: "zzz".to_string(),
    });
    assert_eq!(engine.state().history.undo_count(), 1);
}

#[test]
fn test_clear_all_is_one_step() {
    let (_dir, mut engine) = test_engine();
    add(&mut engine, "a");
    add(&mut engine, "b");
    add(&mut engine, "c");
    engine.dispatch(HighlightMsg::ClearAll);
    assert!(patterns(&engine).is_empty());

    engine.dispatch(HistoryMsg::Undo);
    assert_eq!(patterns(&engine), vec!["a", "b", "c"]);
}

#[test]
fn test_undo_restores_colors_and_rerenders() {
    let (_dir, mut engine) = test_engine();
    let doc = open(&mut engine, 1, "a b");
    add(&mut engine, "a");
    let color = engine.state().registry.get("a").unwrap().color;
    engine.dispatch(HighlightMsg::Remove {
        pattern: "a".to_string(),
    });
    assert!(!engine.renderer().is_decorated(doc));

    engine.dispatch(HistoryMsg::Undo);
    assert_eq!(engine.state().registry.get("a").unwrap().color, color);
    assert_eq!(engine.renderer().ranges_for(doc, "a"), vec![0..1]);
}

#[test]
fn test_history_depth_is_bounded() {
    let (_dir, store) = common::temp_store();
    let config = EngineConfig {
        history_depth: 3,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(RecordingRenderer::new(), store, config);
    for pattern in ["a", "b", "c", "d", "e"] {
        add(&mut engine, pattern);
    }
    for _ in 0..5 {
        engine.dispatch(HistoryMsg::Undo);
    }
    assert_eq!(patterns(&engine), vec!["a", "b"]);
}

#[test]
fn test_activation_resets_history() {
    let (_dir, mut engine) = test_engine();
    write_profile(engine.store_mut(), "P", &[("p", "red")]);
    add(&mut engine, "a");
    engine.dispatch(ProfileMsg::Activate {
        name: "P".to_string(),
    });

    assert!(!engine.state().history.can_undo());
    engine.dispatch(HistoryMsg::Undo);
    assert_eq!(patterns(&engine), vec!["p"]);
}

#[test]
fn test_undo_after_enable_keeps_overlay() {
    let (_dir, mut engine) = test_engine();
    write_profile(engine.store_mut(), "P", &[("p", "red")]);
    add(&mut engine, "m");
    engine.dispatch(ProfileMsg::Enable {
        name: "P".to_string(),
    });

    engine.dispatch(HistoryMsg::Undo);
    assert!(engine.state().is_profile_enabled("P"));
    assert_eq!(patterns(&engine), vec!["m", "p"]);
}

#[test]
fn test_undo_after_disable_does_not_restore_overlay() {
    let (_dir, mut engine) = test_engine();
    write_profile(engine.store_mut(), "P", &[("p", "red")]);
    engine.dispatch(ProfileMsg::Enable {
        name: "P".to_string(),
    });
    add(&mut engine, "m");
    engine.dispatch(ProfileMsg::Disable {
        name: "P".to_string(),
    });

    engine.dispatch(HistoryMsg::Undo);
    assert!(!engine.state().is_profile_enabled("P"));
    assert_eq!(patterns(&engine), vec!["m"]);
}

#[test]
fn test_merge_into_enabled_overlay_survives_undo() {
    let (_dir, mut engine) = test_engine();
    write_profile(engine.store_mut(), "From", &[("extra", "green")]);
    write_profile(engine.store_mut(), "Overlay", &[("base", "blue")]);
    engine.dispatch(ProfileMsg::Enable {
        name: "Overlay".to_string(),
    });
    add(&mut engine, "m");
    engine.dispatch(ProfileMsg::Merge {
        from: "From".to_string(),
        into: "Overlay".to_string(),
    });

    engine.dispatch(HistoryMsg::Undo);
    assert_eq!(patterns(&engine), vec!["base", "extra", "m"]);
}
