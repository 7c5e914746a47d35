//! CLI front door for lens computation.
//!
//! Provides the command-line interface helpers for speclens operations:
//! - `lens` - Compute code lenses for one or more spec files
//! - `base-command` - Report the base command a workspace resolves to
//!
//! ## Paths
//!
//! The workspace root defaults to the current directory. File arguments may
//! be absolute or relative to the workspace root. Both are canonicalized
//! before the containment check, so symlinks and `..` segments resolve the
//! way the filesystem sees them.
//!
//! ## Error Handling
//!
//! All functions return `LensResult<T>`. The `LensError` type provides
//! stable error codes for JSON output and the process exit code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use speclens_core::command::BaseCommand;
use speclens_core::config::LensConfig;
use speclens_core::error::{LensError, LensResult};
use speclens_core::output::{BaseCommandResponse, FileLenses, LensResponse};
use speclens_core::workspace::relative_path;
use speclens_ruby::collect_code_lenses_into;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit base command.
    pub command_override: Option<String>,
    /// Emit per-call diagnostics.
    pub debug: bool,
}

/// Resolve and canonicalize the workspace root.
///
/// `None` means the current directory.
pub fn resolve_workspace(workspace: Option<&Path>) -> LensResult<PathBuf> {
    let root = match workspace {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let root = fs::canonicalize(&root).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            LensError::invalid_args(format!("workspace does not exist: {}", root.display()))
        }
        _ => LensError::Io(err),
    })?;

    if !root.is_dir() {
        return Err(LensError::invalid_args(format!(
            "workspace is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// Resolve a file argument against the workspace root and canonicalize it.
pub fn resolve_file(workspace_root: &Path, file: &Path) -> LensResult<PathBuf> {
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        workspace_root.join(file)
    };

    let path = fs::canonicalize(&joined).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => LensError::file_not_found(file.display().to_string()),
        _ => LensError::Io(err),
    })?;

    if !path.is_file() {
        return Err(LensError::invalid_args(format!(
            "not a regular file: {}",
            file.display()
        )));
    }
    Ok(path)
}

/// Compute lenses for `files`, in argument order.
///
/// Every file gets its own traversal: group ids and unnamed counters restart
/// at 1 for each. The first failing file aborts the whole run.
pub fn run_lens(
    workspace_root: &Path,
    files: &[PathBuf],
    options: &RunOptions,
) -> LensResult<LensResponse> {
    if files.is_empty() {
        return Err(LensError::invalid_args("no files given"));
    }

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let file_path = resolve_file(workspace_root, file)?;
        let _span = tracing::info_span!("lens", file = %file_path.display()).entered();

        let mut config = LensConfig::new(workspace_root, &file_path).with_debug(options.debug);
        if let Some(command) = &options.command_override {
            config = config.with_command_override(command.clone());
        }

        let source = fs::read_to_string(&file_path)?;
        let mut lenses = Vec::new();
        collect_code_lenses_into(&source, &config, &mut lenses)?;

        let path = relative_path(workspace_root, &file_path)?;
        tracing::info!(file = %path, lenses = lenses.len(), "collected lenses");
        results.push(FileLenses { path, lenses });
    }

    Ok(LensResponse::new(results))
}

/// Resolve the base command for the workspace.
pub fn run_base_command(
    workspace_root: &Path,
    options: &RunOptions,
) -> LensResult<BaseCommandResponse> {
    let base = BaseCommand::resolve(options.command_override.as_deref(), workspace_root);
    Ok(BaseCommandResponse::new(base))
}

/// Render a lens response as one line per example or group.
///
/// ```text
/// spec/models/user_spec.rb:3  group 1  <User>
/// spec/models/user_spec.rb:7  example  joins first and last name  (group 1)
/// ```
pub fn render_text(response: &LensResponse) -> String {
    let mut lines = Vec::new();

    for file in &response.files {
        for triple in file.lenses.chunks(3) {
            let record = &triple[0];
            let line = record.arguments.location().start_line + 1;
            let label = match record.data.id {
                Some(id) => format!("group {}", id),
                None => "example".to_string(),
            };
            let mut text = format!("{}:{}  {}  {}", file.path, line, label, record.name());
            if let Some(parent) = record.data.group_id {
                text.push_str(&format!("  (group {})", parent));
            }
            lines.push(text);
        }
    }

    lines.push(format!(
        "{} lenses in {} file(s)",
        response.lens_count(),
        response.files.len()
    ));
    lines.join("\n")
}
