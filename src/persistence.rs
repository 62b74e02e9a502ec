//! Profile persistence
//!
//! One JSON file per profile:
//!
//! ```json
//! { "metadata": { "version": 1, "created": 1700000000, "modified": 1700000100, "color": "blue" },
//!   "highlights": [ { "pattern": "TODO", "color": "yellow", "mode": "wholeWord",
//!                     "source": { "kind": "profile", "profileName": "Review" } } ] }
//! ```
//!
//! A bare array of highlights is the legacy format and still loads.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::matcher::MatchMode;
use crate::model::{HighlightEntry, HighlightSource};
use crate::theme::ColorKey;

/// Where a profile is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileScope {
    /// Next to the open workspace
    Workspace,
    /// In the user config directory
    Global,
}

impl ProfileScope {
    /// Lookup order for unqualified profile names
    pub const PRIORITY: [ProfileScope; 2] = [ProfileScope::Workspace, ProfileScope::Global];
}

impl fmt::Display for ProfileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileScope::Workspace => write!(f, "workspace"),
            ProfileScope::Global => write!(f, "global"),
        }
    }
}

/// Persisted profile descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Schema version for forward compatibility
    #[serde(default = "default_version")]
    pub version: u32,
    /// Creation time (Unix epoch seconds)
    #[serde(default)]
    pub created: u64,
    /// Last save time (Unix epoch seconds)
    #[serde(default)]
    pub modified: u64,
    /// Color shown for the profile in pickers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorKey>,
}

fn default_version() -> u32 {
    ProfileMetadata::CURRENT_VERSION
}

impl Default for ProfileMetadata {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            created: 0,
            modified: 0,
            color: None,
        }
    }
}

impl ProfileMetadata {
    pub const CURRENT_VERSION: u32 = 1;

    /// Metadata for a profile saved for the first time now
    pub fn new_now() -> Self {
        let now = now_epoch_secs();
        Self {
            created: now,
            modified: now,
            ..Default::default()
        }
    }

    /// Keep creation time and color, refresh the modification time
    pub fn touched(&self) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            created: self.created,
            modified: now_epoch_secs(),
            color: self.color,
        }
    }
}

/// One persisted highlight
///
/// The color is kept as text so an unknown palette name does not make the
/// whole profile unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHighlight {
    pub pattern: String,
    pub color: String,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<HighlightSource>,
}

impl StoredHighlight {
    pub fn from_entry(entry: &HighlightEntry) -> Self {
        Self {
            pattern: entry.pattern().to_string(),
            color: entry.color.to_string(),
            mode: entry.mode(),
            source: Some(entry.source.clone()),
        }
    }

    /// Same highlight, owned by `profile`
    pub fn owned_by(mut self, profile: &str) -> Self {
        self.source = Some(HighlightSource::profile(profile));
        self
    }
}

/// On-disk shape of a profile file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    metadata: ProfileMetadata,
    highlights: Vec<StoredHighlight>,
}

/// Current and legacy layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Current(ProfileFile),
    Legacy(Vec<StoredHighlight>),
}

/// A loaded profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub name: String,
    pub scope: ProfileScope,
    pub metadata: ProfileMetadata,
    pub highlights: Vec<StoredHighlight>,
}

/// Listing entry for a stored profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub scope: ProfileScope,
    pub metadata: ProfileMetadata,
    pub highlight_count: usize,
}

/// Storage backend for profiles
pub trait ProfileStore {
    /// Whether `scope` has a backing location
    fn is_available(&self, scope: ProfileScope) -> bool;

    fn load_profile(&self, scope: ProfileScope, name: &str) -> Result<ProfileRecord>;

    fn save_profile(
        &mut self,
        scope: ProfileScope,
        name: &str,
        metadata: &ProfileMetadata,
        highlights: &[StoredHighlight],
    ) -> Result<()>;

    /// Profiles in `scope`, sorted by name; an unavailable scope lists nothing
    fn list_profiles(&self, scope: ProfileScope) -> Result<Vec<ProfileSummary>>;

    fn delete_profile(&mut self, scope: ProfileScope, name: &str) -> Result<()>;
}

/// Profile names become file names: no separators, no dot-only names
pub fn validate_profile_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(EngineError::InvalidProfileName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Parse profile file contents, accepting the legacy bare-array layout
pub fn parse_profile(path: &Path, contents: &str) -> Result<(ProfileMetadata, Vec<StoredHighlight>)> {
    let malformed = |reason: String| EngineError::MalformedProfile {
        path: path.to_path_buf(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))?;

    let shape_ok = match &value {
        serde_json::Value::Array(_) => true,
        serde_json::Value::Object(map) => map.get("highlights").is_some_and(|h| h.is_array()),
        _ => false,
    };
    if !shape_ok {
        return Err(malformed(
            "expected an array of highlights or an object with a `highlights` array".to_string(),
        ));
    }

    match serde_json::from_value::<ProfileDocument>(value) {
        Ok(ProfileDocument::Current(file)) => Ok((file.metadata, file.highlights)),
        Ok(ProfileDocument::Legacy(highlights)) => Ok((ProfileMetadata::default(), highlights)),
        Err(_) => Err(malformed(
            "highlight entries need a string `pattern` and `color` and a known `mode`".to_string(),
        )),
    }
}

/// Profiles stored as `<dir>/<name>.json`
#[derive(Debug, Clone, Default)]
pub struct FileProfileStore {
    workspace_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileProfileStore {
    pub fn new(workspace_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            workspace_dir,
            global_dir,
        }
    }

    /// Store rooted at the standard locations for an optional workspace
    pub fn for_workspace(workspace_root: Option<&Path>) -> Self {
        Self::new(
            workspace_root.map(crate::config_paths::workspace_profiles_dir),
            crate::config_paths::global_profiles_dir(),
        )
    }

    pub fn dir(&self, scope: ProfileScope) -> Result<&Path> {
        let dir = match scope {
            ProfileScope::Workspace => self.workspace_dir.as_deref(),
            ProfileScope::Global => self.global_dir.as_deref(),
        };
        dir.ok_or(EngineError::NoWorkspace)
    }

    pub fn profile_path(&self, scope: ProfileScope, name: &str) -> Result<PathBuf> {
        validate_profile_name(name)?;
        Ok(self.dir(scope)?.join(format!("{}.json", name)))
    }
}

impl ProfileStore for FileProfileStore {
    fn is_available(&self, scope: ProfileScope) -> bool {
        self.dir(scope).is_ok()
    }

    fn load_profile(&self, scope: ProfileScope, name: &str) -> Result<ProfileRecord> {
        let path = self.profile_path(scope, name)?;
        let contents = std::fs::read_to_string(&path).map_err(|e| not_found_or_io(e, name))?;
        let (metadata, highlights) = parse_profile(&path, &contents)?;
        tracing::debug!(
            "Loaded profile {} ({} highlights) from {}",
            name,
            highlights.len(),
            path.display()
        );
        Ok(ProfileRecord {
            name: name.to_string(),
            scope,
            metadata,
            highlights,
        })
    }

    fn save_profile(
        &mut self,
        scope: ProfileScope,
        name: &str,
        metadata: &ProfileMetadata,
        highlights: &[StoredHighlight],
    ) -> Result<()> {
        let path = self.profile_path(scope, name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ProfileFile {
            metadata: metadata.clone(),
            highlights: highlights.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&file).map_err(io::Error::from)?;
        std::fs::write(&path, contents)?;
        tracing::info!(
            "Saved profile {} ({} highlights) to {}",
            name,
            highlights.len(),
            path.display()
        );
        Ok(())
    }

    fn list_profiles(&self, scope: ProfileScope) -> Result<Vec<ProfileSummary>> {
        let Ok(dir) = self.dir(scope) else {
            return Ok(Vec::new());
        };
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|n| n.to_str()) else {
                continue;
            };
            match self.load_profile(scope, name) {
                Ok(record) => summaries.push(ProfileSummary {
                    name: record.name,
                    scope,
                    metadata: record.metadata,
                    highlight_count: record.highlights.len(),
                }),
                Err(e) => tracing::warn!("Skipping profile {}: {}", path.display(), e),
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    fn delete_profile(&mut self, scope: ProfileScope, name: &str) -> Result<()> {
        let path = self.profile_path(scope, name)?;
        std::fs::remove_file(&path).map_err(|e| not_found_or_io(e, name))?;
        tracing::info!("Deleted profile {} from {}", name, path.display());
        Ok(())
    }
}

fn not_found_or_io(e: io::Error, name: &str) -> EngineError {
    if e.kind() == io::ErrorKind::NotFound {
        EngineError::ProfileNotFound {
            name: name.to_string(),
        }
    } else {
        EngineError::Io(e)
    }
}

pub(crate) fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
