//! Where hilite keeps its files
//!
//! ```text
//! <config dir>/config.yaml        view settings (EngineConfig)
//! <config dir>/profiles/*.json    global profiles
//! <config dir>/logs/hilite.log.*  daily rolling log
//! <workspace>/.hilite/profiles/   workspace profiles
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME/hilite`, `~/.config/hilite`, or
//! `%APPDATA%\hilite` on Windows.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "hilite";

/// Per-workspace directory name
pub const WORKSPACE_DIR: &str = ".hilite";

/// Root of the user-level hilite directory, if a home can be found
pub fn config_dir() -> Option<PathBuf> {
    user_config_root().map(|root| root.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn user_config_root() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn user_config_root() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn global_profiles_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("profiles"))
}

pub fn workspace_profiles_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_DIR).join("profiles")
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the log directory (and its parents), returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create log directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
