//! Workspace-relative paths.
//!
//! Run commands refer to the spec file by its path relative to the workspace
//! root, always with forward slashes. A file outside the root has no such
//! path, which is a precondition violation rather than something to paper over.

use std::path::{Component, Path};

use crate::error::{LensError, LensResult};

/// Compute the workspace-relative path of `file`.
///
/// Both paths are compared as given; callers that accept user input should
/// canonicalize them first.
///
/// # Errors
///
/// Returns `FileOutsideWorkspace` if `file` is not located under
/// `workspace_root`, or if it is the root itself.
pub fn relative_path(workspace_root: &Path, file: &Path) -> LensResult<String> {
    let outside = || LensError::FileOutsideWorkspace {
        file: file.to_path_buf(),
        workspace_root: workspace_root.to_path_buf(),
    };

    let relative = file.strip_prefix(workspace_root).map_err(|_| outside())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            // `..` would step back out of the root.
            _ => return Err(outside()),
        }
    }

    if parts.is_empty() {
        return Err(outside());
    }

    Ok(parts.join("/"))
}
