//! Base command resolution and run command construction.
//!
//! ## Resolution Order
//!
//! The base command used for terminal runs is resolved once per traversal:
//! 1. Explicit override (CLI `--command` or [`LensConfig::command_override`])
//! 2. `bin/rspec` exists in the working directory → `bin/rspec`
//! 3. Otherwise → `rspec`
//!
//! When `Gemfile.lock` exists in the working directory, rules 2 and 3 are
//! prefixed with `bundle exec `. An override is never prefixed.
//!
//! ## Commands
//!
//! For a spec at `path` starting on 1-indexed `line`:
//! - terminal command: `{base} {path}:{line}`
//! - runner command: `bundle exec rspec {path}:{line}`, independent of the base
//!
//! Paths are not quoted or escaped.
//!
//! [`LensConfig::command_override`]: crate::config::LensConfig::command_override

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Name of the test runner executable.
pub const RUNNER_NAME: &str = "rspec";

/// Conventional location of the runner wrapper script, relative to the working directory.
pub const RUNNER_SCRIPT: &str = "bin/rspec";

/// Dependency lockfile whose presence means commands run through bundler.
pub const LOCKFILE: &str = "Gemfile.lock";

/// Prefix applied to commands when the lockfile is present.
pub const BUNDLE_EXEC: &str = "bundle exec ";

/// Fixed prefix for runner commands.
pub const RUNNER_COMMAND_PREFIX: &str = "bundle exec rspec";

/// Which rule produced the base command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseCommandSource {
    /// Provided explicitly by the caller.
    Override,
    /// `bin/rspec` wrapper script found in the working directory.
    RunnerScript,
    /// Bare `rspec` on the PATH.
    BareRunner,
}

impl fmt::Display for BaseCommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseCommandSource::Override => write!(f, "explicit override"),
            BaseCommandSource::RunnerScript => write!(f, "{}", RUNNER_SCRIPT),
            BaseCommandSource::BareRunner => write!(f, "{} on PATH", RUNNER_NAME),
        }
    }
}

/// Resolved base command for terminal runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseCommand {
    /// Full command text, including any `bundle exec ` prefix.
    pub command: String,
    /// Rule that produced the command.
    pub source: BaseCommandSource,
    /// Whether `bundle exec ` was prepended.
    pub bundled: bool,
}

impl BaseCommand {
    /// Apply the resolution policy to already-probed facts.
    ///
    /// This is the whole policy; [`BaseCommand::resolve`] only adds the
    /// filesystem probes.
    pub fn from_probe(
        command_override: Option<&str>,
        has_runner_script: bool,
        has_lockfile: bool,
    ) -> Self {
        if let Some(command) = command_override {
            return BaseCommand {
                command: command.to_string(),
                source: BaseCommandSource::Override,
                bundled: false,
            };
        }

        let (inner, source) = if has_runner_script {
            (RUNNER_SCRIPT, BaseCommandSource::RunnerScript)
        } else {
            (RUNNER_NAME, BaseCommandSource::BareRunner)
        };

        let command = if has_lockfile {
            format!("{}{}", BUNDLE_EXEC, inner)
        } else {
            inner.to_string()
        };

        BaseCommand {
            command,
            source,
            bundled: has_lockfile,
        }
    }

    /// Resolve the base command, probing `working_dir` for the runner script
    /// and the lockfile.
    pub fn resolve(command_override: Option<&str>, working_dir: &Path) -> Self {
        if command_override.is_some() {
            return Self::from_probe(command_override, false, false);
        }

        let has_runner_script = working_dir.join(RUNNER_SCRIPT).is_file();
        let has_lockfile = working_dir.join(LOCKFILE).is_file();
        let base = Self::from_probe(None, has_runner_script, has_lockfile);

        tracing::debug!(
            command = %base.command,
            source = %base.source,
            bundled = base.bundled,
            "resolved base command"
        );
        base
    }

    /// Command text.
    pub fn as_str(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for BaseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// The two command strings derived for one call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommands {
    /// `{base} {path}:{line}`, for running directly in a terminal.
    pub terminal: String,
    /// `bundle exec rspec {path}:{line}`, for consumers that manage their own
    /// execution context.
    pub runner: String,
}

/// Builds run commands for call sites in one file.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    base: BaseCommand,
}

impl CommandBuilder {
    /// Create a builder around a resolved base command.
    pub fn new(base: BaseCommand) -> Self {
        CommandBuilder { base }
    }

    /// The base command in use.
    pub fn base(&self) -> &BaseCommand {
        &self.base
    }

    /// Build both commands for `path` at 1-indexed `line`.
    pub fn build(&self, path: &str, line: u32) -> RunCommands {
        RunCommands {
            terminal: format!("{} {}:{}", self.base.command, path, line),
            runner: format!("{} {}:{}", RUNNER_COMMAND_PREFIX, path, line),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
