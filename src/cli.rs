//! Command-line argument parsing for the hilite binary
//!
//! Supports:
//! - Highlighting patterns across files
//! - Activating and enabling stored profiles
//! - Saving the resulting highlight set as a profile
//! - Listing stored profiles

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use hilite::MatchMode;

/// Match mode as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Text,
    WholeWord,
    Regex,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => MatchMode::Text,
            ModeArg::WholeWord => MatchMode::WholeWord,
            ModeArg::Regex => MatchMode::Regex,
        }
    }
}

/// Layered pattern highlighting for text files
#[derive(Parser, Debug)]
#[command(
    name = "hilite",
    version,
    about = "Layered, profile-based pattern highlighting"
)]
pub struct CliArgs {
    /// Files to highlight
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Pattern to highlight (repeatable)
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// How --pattern values are matched
    #[arg(long, value_enum, default_value_t = ModeArg::Text)]
    pub mode: ModeArg,

    /// Profile to activate before adding patterns
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Profile to layer in read-only (repeatable)
    #[arg(long = "enable", value_name = "NAME")]
    pub enable: Vec<String>,

    /// Workspace root for workspace-scoped profiles
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// List stored profiles and exit
    #[arg(long)]
    pub list_profiles: bool,

    /// Save the active highlights as a profile
    #[arg(long, value_name = "NAME")]
    pub save_as: Option<String>,
}

impl CliArgs {
    /// Workspace root: explicit flag, else the current directory
    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }
}
