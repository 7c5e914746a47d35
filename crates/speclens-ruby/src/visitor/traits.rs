// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition for call-site traversal.

use super::call_site::CallSite;

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Read-only visitor over the call sites of a Ruby syntax tree.
///
/// `visit_call` fires before the call's arguments and block are walked,
/// `leave_call` after. Every `visit_call` is matched by exactly one
/// `leave_call` unless a visitor returns [`VisitResult::Stop`].
pub trait Visitor<'src> {
    fn visit_call(&mut self, _call: &CallSite<'src>) -> VisitResult {
        VisitResult::Continue
    }

    fn leave_call(&mut self, _call: &CallSite<'src>) {}
}
