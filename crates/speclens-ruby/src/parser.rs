// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ruby parsing with tree-sitter.
//!
//! tree-sitter is error tolerant: a file with syntax errors still produces a
//! tree, with `ERROR` nodes around the broken regions. Call sites outside those
//! regions are still recognized, so a half-edited spec keeps most of its lenses.

use speclens_core::error::LensError;
use thiserror::Error;
use tree_sitter::{Language, Parser, Tree};

/// Errors from setting up the parser or parsing a file.
#[derive(Debug, Error)]
pub enum RubyParseError {
    /// The compiled grammar is incompatible with the tree-sitter runtime.
    #[error("failed to load Ruby grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree (cancelled or timed out).
    #[error("parser produced no syntax tree")]
    NoTree,
}

impl From<RubyParseError> for LensError {
    fn from(err: RubyParseError) -> Self {
        LensError::parse(err.to_string())
    }
}

/// The tree-sitter Ruby language.
pub fn ruby_language() -> Language {
    tree_sitter_ruby::LANGUAGE.into()
}

/// Source text together with its syntax tree.
pub struct ParsedSource<'src> {
    source: &'src str,
    tree: Tree,
}

impl<'src> ParsedSource<'src> {
    /// Parse Ruby source text.
    pub fn parse(source: &'src str) -> Result<Self, RubyParseError> {
        let mut parser = Parser::new();
        parser.set_language(&ruby_language())?;
        let tree = parser.parse(source, None).ok_or(RubyParseError::NoTree)?;
        Ok(ParsedSource { source, tree })
    }

    /// The source text the tree was built from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The syntax tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Whether the tree contains syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

impl std::fmt::Debug for ParsedSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedSource")
            .field("bytes", &self.source.len())
            .field("has_errors", &self.has_errors())
            .finish()
    }
}
