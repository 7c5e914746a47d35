//! speclens - run and debug code lenses for RSpec spec files.
//!
//! This crate provides the CLI binary and its library surface.
//!
//! ## Modules
//!
//! - `cli` - CLI command implementations

pub mod cli;

// Re-export core types for convenience
pub use speclens_core::command::{BaseCommand, BaseCommandSource};
pub use speclens_core::config::LensConfig;
pub use speclens_core::error::{LensError, LensResult, OutputErrorCode};
pub use speclens_core::output::{
    BaseCommandResponse, ErrorInfo, ErrorResponse, FileLenses, LensKind, LensRecord, LensResponse,
    SCHEMA_VERSION,
};
pub use speclens_ruby::collect_code_lenses;
