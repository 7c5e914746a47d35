//! Traversal configuration.
//!
//! A [`LensConfig`] carries everything a lens visitor needs at construction
//! time. One config describes one file; callers build a fresh visitor per file.

use std::path::{Path, PathBuf};

/// Construction input for one code-lens traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensConfig {
    /// Workspace root. Run commands are expressed relative to it and the
    /// base-command probes look for `bin/rspec` and `Gemfile.lock` here.
    pub workspace_root: PathBuf,
    /// File being analyzed. Must be located under `workspace_root`.
    pub file_path: PathBuf,
    /// Explicit base command, used verbatim when set.
    pub command_override: Option<String>,
    /// Emit one diagnostic line per processed call.
    pub debug: bool,
}

impl LensConfig {
    /// Create a config for `file_path` inside `workspace_root` with defaults.
    pub fn new(workspace_root: impl Into<PathBuf>, file_path: impl Into<PathBuf>) -> Self {
        LensConfig {
            workspace_root: workspace_root.into(),
            file_path: file_path.into(),
            command_override: None,
            debug: false,
        }
    }

    /// Set an explicit base command.
    pub fn with_command_override(mut self, command: impl Into<String>) -> Self {
        self.command_override = Some(command.into());
        self
    }

    /// Enable or disable per-call diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Workspace root as a path.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}
