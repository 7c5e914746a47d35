// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! RSpec code lenses for Ruby spec files.
//!
//! This crate recognizes RSpec examples (`it`, `example`, `specify`) and
//! example groups (`describe`, `context`) in a Ruby syntax tree and produces
//! Run / Run In Terminal / Debug lens records for each of them.
//!
//! # Quick Start
//!
//! ```ignore
//! use speclens_core::config::LensConfig;
//! use speclens_ruby::collect_code_lenses;
//!
//! let config = LensConfig::new("/project", "/project/spec/user_spec.rb");
//! let lenses = collect_code_lenses("describe User do\n  it \"works\" do end\nend\n", &config)?;
//! assert_eq!(lenses.len(), 6);
//! ```

pub mod parser;
pub mod visitor;

pub use parser::{ParsedSource, RubyParseError};
pub use visitor::{CallKind, CallSite, CodeLensCollector, VisitResult, Visitor};

use speclens_core::config::LensConfig;
use speclens_core::error::LensResult;
use speclens_core::output::{LensRecord, LensSink};

/// Parse `source` and collect its lens records, in emission order.
///
/// # Errors
///
/// Returns `FileOutsideWorkspace` if `config.file_path` is not under
/// `config.workspace_root`, and `Parse` if the parser cannot be set up.
pub fn collect_code_lenses(source: &str, config: &LensConfig) -> LensResult<Vec<LensRecord>> {
    let mut lenses = Vec::new();
    collect_code_lenses_into(source, config, &mut lenses)?;
    Ok(lenses)
}

/// Parse `source` and push its lens records into `sink`.
pub fn collect_code_lenses_into<S: LensSink>(
    source: &str,
    config: &LensConfig,
    sink: &mut S,
) -> LensResult<()> {
    let mut collector = CodeLensCollector::new(config, sink)?;
    let parsed = ParsedSource::parse(source)?;

    if parsed.has_errors() {
        tracing::warn!(
            file = %collector.path(),
            "syntax errors in source, lenses may be incomplete"
        );
    }

    visitor::walk_source(&mut collector, &parsed);
    Ok(())
}
