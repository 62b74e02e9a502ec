//! hilite - highlight patterns across files with layered profiles
//!
//! Runs the engine headless: files become open documents, every pattern
//! and profile flag becomes a message, and the recorded decorations are
//! printed as `path:line:col: pattern`.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hilite::commands::Notification;
use hilite::controller::modified_ago;
use hilite::messages::{DocumentMsg, HighlightMsg, ProfileMsg, ViewMsg};
use hilite::model::{AddOptions, DocumentId, ScopeMode};
use hilite::{Engine, EngineConfig, FileProfileStore, RecordingRenderer};

use cli::CliArgs;

type CliEngine = Engine<RecordingRenderer, FileProfileStore>;

fn main() -> Result<()> {
    hilite::tracing::init();

    let args = CliArgs::parse();
    let workspace = args.workspace_root();
    let store = FileProfileStore::for_workspace(workspace.as_deref());

    // The CLI never writes view settings back
    let mut engine = Engine::new(RecordingRenderer::new(), store, EngineConfig::load());

    if args.list_profiles {
        engine.dispatch(ProfileMsg::List);
        return report(&mut engine);
    }

    if engine.state().scope_mode != ScopeMode::AllOpenDocuments {
        engine.dispatch(ViewMsg::ToggleScope);
    }

    let mut opened: Vec<(DocumentId, PathBuf)> = Vec::new();
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let id = engine.state().documents.next_id();
        engine.dispatch(DocumentMsg::Opened {
            id,
            text,
            path: Some(path.clone()),
        });
        opened.push((id, path.clone()));
    }

    for name in &args.enable {
        engine.dispatch(ProfileMsg::Enable { name: name.clone() });
    }
    if let Some(name) = &args.profile {
        engine.dispatch(ProfileMsg::Activate { name: name.clone() });
    }
    for pattern in &args.patterns {
        engine.dispatch(HighlightMsg::Add {
            pattern: pattern.clone(),
            options: AddOptions::with_mode(args.mode.into()),
        });
    }
    if let Some(name) = &args.save_as {
        engine.dispatch(ProfileMsg::Save {
            name: Some(name.clone()),
            scope: None,
        });
    }

    print_matches(&engine, &opened);
    engine.shutdown();
    report(&mut engine)
}

/// Print every decorated range, ordered by position
fn print_matches(engine: &CliEngine, opened: &[(DocumentId, PathBuf)]) {
    for (id, path) in opened {
        let Some(doc) = engine.state().documents.get(*id) else {
            continue;
        };
        let mut hits: Vec<(usize, String)> = engine
            .renderer()
            .decorations(*id)
            .into_iter()
            .flat_map(|(pattern, ranges)| {
                ranges
                    .into_iter()
                    .map(move |range| (range.start, pattern.clone()))
            })
            .collect();
        hits.sort();
        for (offset, pattern) in hits {
            let (line, col) = doc.line_col(offset);
            println!("{}:{}:{}: {}", path.display(), line + 1, col + 1, pattern);
        }
    }
}

/// Print notifications; fail if any command failed
fn report(engine: &mut CliEngine) -> Result<()> {
    let mut failures = 0;
    for notification in engine.take_notifications() {
        match notification {
            Notification::Info(message) => eprintln!("{}", message),
            Notification::Error(message) => {
                failures += 1;
                eprintln!("error: {}", message);
            }
            Notification::Profiles(listings) => {
                if listings.is_empty() {
                    println!("No profiles found");
                }
                for listing in listings {
                    let summary = &listing.summary;
                    let color = summary
                        .metadata
                        .color
                        .map(|c| format!(" [{}]", c))
                        .unwrap_or_default();
                    println!(
                        "{:<24} {:<9} {:>4} highlights  saved {}{}",
                        summary.name,
                        summary.scope.to_string(),
                        summary.highlight_count,
                        modified_ago(&summary.metadata),
                        color
                    );
                }
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{} command{} failed", failures, if failures == 1 { "" } else { "s" });
    }
    Ok(())
}
