//! Core infrastructure for speclens.
//!
//! This crate provides language-agnostic infrastructure:
//! - Error types and error codes
//! - Lens records and JSON output types
//! - Traversal configuration
//! - Workspace-relative path handling
//! - Base command resolution and run command construction

pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod types;
pub mod workspace;
