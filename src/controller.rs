//! Profile lifecycle: activate, enable, disable, save, delete, duplicate, merge
//!
//! The registry is always the merged view. Profiles are loaded into it at
//! mutation time, tagged with their owner, and stripped back out by owner.
//! When two profiles share a pattern the one loaded last wins.

use std::collections::HashSet;

use crate::error::{EngineError, Result};
use crate::model::{EngineState, HighlightEntry, HighlightSource};
use crate::persistence::{
    now_epoch_secs, validate_profile_name, ProfileMetadata, ProfileRecord, ProfileScope,
    ProfileStore, ProfileSummary, StoredHighlight,
};
use crate::theme::ColorKey;

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub name: String,
    pub scope: ProfileScope,
    pub highlight_count: usize,
    /// Whether the profile was created by this save
    pub created: bool,
}

/// A stored profile plus its session state
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileListing {
    pub summary: ProfileSummary,
    pub active: bool,
    pub enabled: bool,
    pub modified: bool,
}

/// Find `name`, workspace scope first
pub fn find_profile(store: &dyn ProfileStore, name: &str) -> Result<ProfileRecord> {
    validate_profile_name(name)?;
    for scope in ProfileScope::PRIORITY {
        match store.load_profile(scope, name) {
            Ok(record) => return Ok(record),
            Err(EngineError::ProfileNotFound { .. } | EngineError::NoWorkspace) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(EngineError::ProfileNotFound {
        name: name.to_string(),
    })
}

/// Scope that already holds `name`, if any
fn existing_scope(store: &dyn ProfileStore, name: &str) -> Option<ProfileScope> {
    ProfileScope::PRIORITY
        .into_iter()
        .find(|scope| store.load_profile(*scope, name).is_ok())
}

/// Scope for a profile that does not exist yet
fn default_scope(store: &dyn ProfileStore) -> ProfileScope {
    if store.is_available(ProfileScope::Workspace) {
        ProfileScope::Workspace
    } else {
        ProfileScope::Global
    }
}

/// Turn persisted highlights into entries owned by `profile`
///
/// Entries that do not compile are skipped and unknown colors are replaced
/// by the next palette color; neither aborts the load.
pub fn entries_from_record(
    state: &mut EngineState,
    profile: &str,
    highlights: &[StoredHighlight],
) -> Vec<HighlightEntry> {
    let mut entries = Vec::with_capacity(highlights.len());
    for stored in highlights {
        let color = match ColorKey::parse(&stored.color) {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(
                    "Profile {}: pattern {:?} has unknown color {:?} ({}), recoloring",
                    profile,
                    stored.pattern,
                    stored.color,
                    e
                );
                state.next_palette_color(Some(&stored.pattern))
            }
        };
        match HighlightEntry::new(
            stored.pattern.clone(),
            color,
            stored.mode,
            HighlightSource::profile(profile),
        ) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Profile {}: skipping highlight: {}", profile, e),
        }
    }
    entries
}

fn load_into_registry(state: &mut EngineState, record: &ProfileRecord) -> usize {
    let entries = entries_from_record(state, &record.name, &record.highlights);
    let count = state.merge_profile_entries(&record.name, entries);
    state.clear_profile_modified(&record.name);
    count
}

/// Make `name` the profile being edited
///
/// A previously active profile stays enabled. Manual and previously-active
/// entries are cleared, every enabled profile is reloaded, and `name` is
/// loaded last so its bindings win any collision.
pub fn activate(state: &mut EngineState, store: &dyn ProfileStore, name: &str) -> Result<usize> {
    let record = find_profile(store, name)?;

    if let Some(previous) = state.active_profile.take() {
        state.enabled_profiles.insert(previous.clone());
        state.registry.drain_where(|e| match &e.source {
            HighlightSource::Manual => true,
            HighlightSource::Profile { name: owner } => *owner == previous,
        });
    } else {
        state.registry.drain_where(|e| e.source.is_manual());
    }

    state.active_profile = Some(name.to_string());
    state.enabled_profiles.insert(name.to_string());

    let others: Vec<String> = state
        .enabled_profiles
        .iter()
        .filter(|p| p.as_str() != name)
        .cloned()
        .collect();
    for other in others {
        match find_profile(store, &other) {
            Ok(other_record) => {
                load_into_registry(state, &other_record);
            }
            Err(e) => tracing::warn!("Could not reload enabled profile {}: {}", other, e),
        }
    }

    let count = load_into_registry(state, &record);
    // Snapshots from before the switch belong to another editing context
    state.history.clear();
    tracing::info!(
        "Activated profile {} ({} highlights, {} enabled)",
        name,
        count,
        state.enabled_profiles.len()
    );
    Ok(count)
}

/// Merge `name` into the rendered view without making it active
///
/// Clears undo history.
pub fn enable(state: &mut EngineState, store: &dyn ProfileStore, name: &str) -> Result<usize> {
    if state.is_profile_active(name) {
        return Ok(0);
    }
    let record = find_profile(store, name)?;
    state.enabled_profiles.insert(name.to_string());
    let count = load_into_registry(state, &record);
    state.history.clear();
    tracing::info!("Enabled profile {} ({} highlights)", name, count);
    Ok(count)
}

/// Remove `name` from the view; deactivates it if it was active
///
/// Returns the number of registry entries stripped. Clears undo history.
pub fn disable(state: &mut EngineState, name: &str) -> usize {
    state.enabled_profiles.remove(name);
    if state.is_profile_active(name) {
        state.active_profile = None;
    }
    state.history.clear();
    let removed = state.strip_profile(name);
    state.clear_profile_modified(name);
    tracing::info!("Disabled profile {} ({} highlights removed)", name, removed);
    removed
}

/// Persist a profile
///
/// A profile in the rendered view saves the entries it owns. When saving the
/// active profile, or when no profile is active, manual entries are adopted
/// into it. A stored profile that is not loaded is never overwritten with
/// the view alone: the entries being saved (the active profile's, or manual
/// ones) are layered over its persisted highlights. Saving with no active
/// profile activates the saved one.
pub fn save(
    state: &mut EngineState,
    store: &mut dyn ProfileStore,
    name: Option<&str>,
    scope: Option<ProfileScope>,
) -> Result<SaveOutcome> {
    let name = match name {
        Some(name) => name.to_string(),
        None => state
            .active_profile
            .clone()
            .ok_or(EngineError::NoActiveProfile)?,
    };
    validate_profile_name(&name)?;

    let scope = scope
        .or_else(|| existing_scope(&*store, &name))
        .unwrap_or_else(|| default_scope(&*store));

    let existing = match store.load_profile(scope, &name) {
        Ok(record) => Some(record),
        Err(EngineError::ProfileNotFound { .. }) => None,
        Err(EngineError::MalformedProfile { path, reason }) => {
            tracing::warn!(
                "Overwriting malformed profile {}: {}",
                path.display(),
                reason
            );
            None
        }
        Err(e) => return Err(e),
    };
    let created = existing.is_none();

    let loaded = state.is_profile_active(&name) || state.is_profile_enabled(&name);
    let adopt_manual = state.active_profile.is_none() || state.is_profile_active(&name);
    // Saving another name while editing copies the active profile into it
    let copy_from = state.active_profile.clone().filter(|_| !loaded);

    let mut highlights: Vec<StoredHighlight> = state
        .registry
        .iter()
        .filter(|e| {
            e.source.is_owned_by(&name)
                || ((adopt_manual || copy_from.is_some()) && e.source.is_manual())
                || copy_from
                    .as_deref()
                    .is_some_and(|active| e.source.is_owned_by(active))
        })
        .map(|e| StoredHighlight::from_entry(e).owned_by(&name))
        .collect();

    let (metadata, kept) = match existing {
        Some(record) => {
            let kept: Vec<StoredHighlight> = if loaded {
                Vec::new()
            } else {
                let saved: HashSet<&str> =
                    highlights.iter().map(|h| h.pattern.as_str()).collect();
                record
                    .highlights
                    .into_iter()
                    .filter(|h| !saved.contains(h.pattern.as_str()))
                    .map(|h| h.owned_by(&name))
                    .collect()
            };
            (record.metadata.touched(), kept)
        }
        None => (ProfileMetadata::new_now(), Vec::new()),
    };
    if !kept.is_empty() {
        tracing::debug!(
            "Profile {} is not loaded, keeping {} stored highlights",
            name,
            kept.len()
        );
        let mut merged = kept.clone();
        merged.extend(highlights);
        highlights = merged;
    }

    store.save_profile(scope, &name, &metadata, &highlights)?;

    if adopt_manual {
        for entry in state.registry.iter_mut() {
            if entry.source.is_manual() {
                entry.source = HighlightSource::profile(name.clone());
            }
        }
    }
    if state.active_profile.is_none() {
        state.active_profile = Some(name.clone());
        state.enabled_profiles.insert(name.clone());
        let entries = entries_from_record(state, &name, &kept);
        state.merge_profile_entries(&name, entries);
        state.history.clear();
    }
    state.clear_profile_modified(&name);

    Ok(SaveOutcome {
        name,
        scope,
        highlight_count: highlights.len(),
        created,
    })
}

/// Delete a stored profile and strip its entries from the registry
pub fn delete(
    state: &mut EngineState,
    store: &mut dyn ProfileStore,
    name: &str,
    scope: Option<ProfileScope>,
) -> Result<ProfileScope> {
    validate_profile_name(name)?;
    let scope = match scope {
        Some(scope) => scope,
        None => existing_scope(&*store, name).ok_or_else(|| EngineError::ProfileNotFound {
            name: name.to_string(),
        })?,
    };
    store.delete_profile(scope, name)?;
    disable(state, name);
    tracing::info!("Deleted {} profile {}", scope, name);
    Ok(scope)
}

/// Copy profile `from` to a new profile `to`
///
/// The copy's highlights are re-owned by `to`; the registry is untouched.
pub fn duplicate(
    store: &mut dyn ProfileStore,
    from: &str,
    to: &str,
    scope: Option<ProfileScope>,
) -> Result<ProfileScope> {
    validate_profile_name(to)?;
    let source = find_profile(&*store, from)?;
    let scope = scope.unwrap_or(source.scope);

    match store.load_profile(scope, to) {
        Ok(_) => {
            return Err(EngineError::ProfileExists {
                name: to.to_string(),
            })
        }
        Err(EngineError::ProfileNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    let metadata = ProfileMetadata {
        color: source.metadata.color,
        ..ProfileMetadata::new_now()
    };
    let highlights: Vec<StoredHighlight> = source
        .highlights
        .into_iter()
        .map(|h| h.owned_by(to))
        .collect();
    store.save_profile(scope, to, &metadata, &highlights)?;
    tracing::info!("Duplicated profile {} as {} ({})", from, to, scope);
    Ok(scope)
}

/// Merge profile `from` into profile `into`, returning how many highlights were added
///
/// `into` keeps its own binding when both define a pattern. If `into` is in
/// the rendered view, the merged result is reloaded into the registry.
pub fn merge(
    state: &mut EngineState,
    store: &mut dyn ProfileStore,
    from: &str,
    into: &str,
) -> Result<usize> {
    let source = find_profile(&*store, from)?;
    let target = find_profile(&*store, into)?;

    let existing: HashSet<&str> = target
        .highlights
        .iter()
        .map(|h| h.pattern.as_str())
        .collect();
    let additions: Vec<StoredHighlight> = source
        .highlights
        .iter()
        .filter(|h| !existing.contains(h.pattern.as_str()))
        .cloned()
        .map(|h| h.owned_by(into))
        .collect();
    let added = additions.len();

    let mut merged: Vec<StoredHighlight> = target
        .highlights
        .iter()
        .cloned()
        .map(|h| h.owned_by(into))
        .collect();
    merged.extend(additions);

    store.save_profile(target.scope, into, &target.metadata.touched(), &merged)?;

    if state.is_profile_enabled(into) || state.is_profile_active(into) {
        let record = ProfileRecord {
            highlights: merged,
            ..target
        };
        load_into_registry(state, &record);
        // Only a merge into the active profile is an undo step
        if !state.is_profile_active(into) {
            state.history.clear();
        }
    }
    tracing::info!("Merged {} into {} ({} added)", from, into, added);
    Ok(added)
}

/// Set or clear the UI color of a stored profile
pub fn set_color(
    store: &mut dyn ProfileStore,
    name: &str,
    color: Option<ColorKey>,
) -> Result<()> {
    let record = find_profile(&*store, name)?;
    let metadata = ProfileMetadata {
        color,
        ..record.metadata.touched()
    };
    store.save_profile(record.scope, name, &metadata, &record.highlights)
}

/// Every stored profile, workspace scope first
pub fn list(state: &EngineState, store: &dyn ProfileStore) -> Result<Vec<ProfileListing>> {
    let mut listings = Vec::new();
    for scope in ProfileScope::PRIORITY {
        for summary in store.list_profiles(scope)? {
            let name = summary.name.clone();
            listings.push(ProfileListing {
                summary,
                active: state.is_profile_active(&name),
                enabled: state.is_profile_enabled(&name),
                modified: state.is_profile_modified(&name),
            });
        }
    }
    Ok(listings)
}

/// Age of a profile's last save, for listings
pub fn modified_ago(metadata: &ProfileMetadata) -> String {
    let diff = now_epoch_secs().saturating_sub(metadata.modified);
    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} min ago", diff / 60)
    } else if diff < 86400 {
        format!("{} h ago", diff / 3600)
    } else {
        format!("{} d ago", diff / 86400)
    }
}
