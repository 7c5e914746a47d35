// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Call sites: the normalized view of a `call` node handed to visitors.
//!
//! # What is Captured?
//!
//! - The method name, normalized once into a [`CallKind`]
//! - The receiver's raw source text (`RSpec` in `RSpec.describe`)
//! - The shape of the first argument (see [`Argument`])
//! - Whether a `{ }` or `do ... end` block is attached
//! - The source range (1-indexed lines, 0-indexed byte columns)
//!
//! Visitors never see tree-sitter nodes; everything they need is copied or
//! borrowed out of the source text here.

use speclens_core::types::SourceRange;
use tree_sitter::Node;

/// Method names that declare a single example.
pub const EXAMPLE_KEYWORDS: [&str; 3] = ["example", "it", "specify"];

/// Method names that declare an example group.
pub const GROUP_KEYWORDS: [&str; 2] = ["context", "describe"];

/// The only receiver a group call may have.
pub const FRAMEWORK_RECEIVER: &str = "RSpec";

/// Closed classification of a call's method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `example`, `it`, `specify`.
    Example,
    /// `context`, `describe`.
    Group,
    /// Anything else.
    Other,
}

impl CallKind {
    /// Classify a method name.
    pub fn from_method(method: &str) -> Self {
        if EXAMPLE_KEYWORDS.contains(&method) {
            CallKind::Example
        } else if GROUP_KEYWORDS.contains(&method) {
            CallKind::Group
        } else {
            CallKind::Other
        }
    }
}

/// Shape of a call's first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'src> {
    /// A string without interpolation; holds the raw text between the delimiters.
    StringLiteral(&'src str),
    /// A method call or bare reference (`subject.name`, `helper`, `User`);
    /// holds the callee name.
    Call { callee: &'src str },
    /// Anything else; holds the raw source text.
    Other(&'src str),
}

impl<'src> Argument<'src> {
    fn from_node(node: Node<'_>, source: &'src str) -> Self {
        let text = node_text(node, source);
        match node.kind() {
            "string" => match literal_content(node, source) {
                Some(content) => Argument::StringLiteral(content),
                None => Argument::Other(text),
            },
            "heredoc_beginning" => {
                match heredoc_body_after(node).and_then(|body| literal_content(body, source)) {
                    Some(content) => Argument::StringLiteral(content.trim()),
                    None => Argument::Other(text),
                }
            }
            "call" => match node.child_by_field_name("method") {
                Some(method) => Argument::Call {
                    callee: node_text(method, source),
                },
                None => Argument::Other(text),
            },
            "identifier" | "constant" => Argument::Call { callee: text },
            _ => Argument::Other(text),
        }
    }
}

/// A method call in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite<'src> {
    /// Method name as written.
    pub method: &'src str,
    /// Classification of `method`.
    pub kind: CallKind,
    /// Raw source text of the receiver, if any.
    pub receiver: Option<&'src str>,
    /// Shape of the first argument, `None` when the call has no arguments.
    pub first_argument: Option<Argument<'src>>,
    /// Number of arguments, not counting a `&block` argument.
    pub argument_count: usize,
    /// Whether a block is attached, as `{ }`, `do ... end` or `&block`.
    pub has_block: bool,
    /// Range of the whole call, block included.
    pub range: SourceRange,
}

impl<'src> CallSite<'src> {
    /// Build a call site from a `call` node.
    ///
    /// Returns `None` for other node kinds and for calls without a method name
    /// (`callable.()`).
    pub fn from_node(node: Node<'_>, source: &'src str) -> Option<Self> {
        if node.kind() != "call" {
            return None;
        }

        let method = node_text(node.child_by_field_name("method")?, source);
        let receiver = node
            .child_by_field_name("receiver")
            .map(|receiver| node_text(receiver, source));
        let mut has_block = node.child_by_field_name("block").is_some();

        let (first_argument, argument_count) = match node.child_by_field_name("arguments") {
            Some(arguments) => {
                let mut cursor = arguments.walk();
                let mut values: Vec<Node<'_>> = Vec::new();
                for child in arguments.named_children(&mut cursor) {
                    if child.is_extra() {
                        continue;
                    }
                    // `&blk` attaches a block just like `do ... end`.
                    if child.kind() == "block_argument" {
                        has_block = true;
                    } else {
                        values.push(child);
                    }
                }
                (
                    values.first().map(|value| Argument::from_node(*value, source)),
                    values.len(),
                )
            }
            None => (None, 0),
        };

        let start = node.start_position();
        let end = node.end_position();
        let range = SourceRange::new(
            start.row as u32 + 1,
            start.column as u32,
            end.row as u32 + 1,
            end.column as u32,
        );

        Some(CallSite {
            method,
            kind: CallKind::from_method(method),
            receiver,
            first_argument,
            argument_count,
            has_block,
            range,
        })
    }

    /// Whether this is a group call the test framework would evaluate.
    ///
    /// A group needs a block, and its receiver, when present, must be exactly
    /// [`FRAMEWORK_RECEIVER`]. Application code defining its own `describe`
    /// or `context` methods fails one of the two.
    pub fn is_framework_group(&self) -> bool {
        if self.kind != CallKind::Group || !self.has_block {
            return false;
        }
        match self.receiver {
            None => true,
            Some(receiver) => receiver == FRAMEWORK_RECEIVER,
        }
    }

    /// 1-indexed line the call starts on.
    pub fn line(&self) -> u32 {
        self.range.start_line
    }
}

/// Raw source text of a node.
pub(crate) fn node_text<'src>(node: Node<'_>, source: &'src str) -> &'src str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Raw text between the delimiters of a string or heredoc body, or `None`
/// when it interpolates.
fn literal_content<'src>(node: Node<'_>, source: &'src str) -> Option<&'src str> {
    let mut cursor = node.walk();
    let mut span: Option<(usize, usize)> = None;

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "interpolation" => return None,
            "string_content" | "heredoc_content" | "escape_sequence" => {
                span = Some(match span {
                    Some((start, _)) => (start, child.end_byte()),
                    None => (child.start_byte(), child.end_byte()),
                });
            }
            _ => {}
        }
    }

    match span {
        Some((start, end)) => source.get(start..end),
        None => Some(""),
    }
}

/// The body belonging to a heredoc opener: the first `heredoc_body` that
/// starts after it in document order.
///
/// Bodies are parsed as extras, so they hang off whatever node is open when
/// the opener's line ends, often outside the call itself.
fn heredoc_body_after(beginning: Node<'_>) -> Option<Node<'_>> {
    let mut root = beginning;
    while let Some(parent) = root.parent() {
        root = parent;
    }

    let target = beginning.end_byte();
    let mut cursor = root.walk();
    loop {
        let current = cursor.node();
        if current.kind() == "heredoc_body" {
            if current.start_byte() >= target {
                return Some(current);
            }
        } else if current.end_byte() > target && cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
