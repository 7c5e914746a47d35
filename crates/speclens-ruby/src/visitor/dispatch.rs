// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for call-site traversal.
//!
//! The traversal order follows the usual visitor pattern:
//!
//! - **Pre-order**: `visit_call` is called before descending into children
//! - **Post-order**: `leave_call` is called after all children have been visited
//! - **Source order**: Children are visited left-to-right, top-to-bottom
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_call`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_call` called)
//!
//! The walk is iterative over a tree cursor, so nesting depth is bounded by
//! heap rather than by the call stack.

use tree_sitter::Node;

use super::call_site::CallSite;
use super::traits::{VisitResult, Visitor};
use crate::parser::ParsedSource;

/// Walk every call site in a parsed file.
pub fn walk_source<'src, V: Visitor<'src>>(
    visitor: &mut V,
    parsed: &ParsedSource<'src>,
) -> VisitResult {
    walk_node(visitor, parsed.tree().root_node(), parsed.source())
}

/// Walk every call site in the subtree rooted at `root`, `root` included.
pub fn walk_node<'src, V: Visitor<'src>>(
    visitor: &mut V,
    root: Node<'_>,
    source: &'src str,
) -> VisitResult {
    let mut cursor = root.walk();
    // Calls that have been visited but not left, keyed by node id.
    let mut open: Vec<(usize, CallSite<'src>)> = Vec::new();

    'walk: loop {
        let node = cursor.node();
        let mut descend = true;

        if let Some(call) = CallSite::from_node(node, source) {
            match visitor.visit_call(&call) {
                VisitResult::Stop => return VisitResult::Stop,
                VisitResult::SkipChildren => descend = false,
                VisitResult::Continue => {}
            }
            open.push((node.id(), call));
        }

        if descend && cursor.goto_first_child() {
            continue;
        }

        loop {
            let node = cursor.node();
            if open.last().map(|(id, _)| *id) == Some(node.id()) {
                if let Some((_, call)) = open.pop() {
                    visitor.leave_call(&call);
                }
            }

            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    VisitResult::Continue
}
