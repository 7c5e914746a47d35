//! Error types and error code constants for speclens.
//!
//! This module provides a unified error type (`LensError`) that bridges
//! errors from the language front ends and the filesystem into a common
//! format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file not found, file outside the workspace)
//! - `10`: Internal errors (parser set-up failures, IO, unexpected state)

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found, file outside the workspace).
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for speclens.
#[derive(Debug, Error)]
pub enum LensError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// The file is not located under the workspace root.
    ///
    /// Relative paths in run commands are derived from the workspace root, so
    /// this is a hard precondition of building a lens visitor.
    #[error("file {} is not under workspace root {}", file.display(), workspace_root.display())]
    FileOutsideWorkspace {
        file: PathBuf,
        workspace_root: PathBuf,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The source could not be turned into a syntax tree.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

/// Result type for speclens operations.
pub type LensResult<T> = Result<T, LensError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&LensError> for OutputErrorCode {
    fn from(err: &LensError) -> Self {
        match err {
            LensError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            LensError::FileOutsideWorkspace { .. } => OutputErrorCode::ResolutionError,
            LensError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            LensError::Parse { .. } => OutputErrorCode::InternalError,
            LensError::Io(_) => OutputErrorCode::InternalError,
            LensError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<LensError> for OutputErrorCode {
    fn from(err: LensError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl LensError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        LensError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        LensError::FileNotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        LensError::Parse {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        LensError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
