// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for Ruby call-site traversal.
//!
//! The tree is walked once, depth-first. Every `call` node is normalized into a
//! [`CallSite`] and handed to the visitor on the way down (`visit_call`) and
//! again on the way up (`leave_call`). Nothing else in the tree is reported.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_call`
//! - **Post-order** for `leave_call`
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! # Visitor Pattern
//!
//! ```ignore
//! use speclens_ruby::visitor::{CallSite, VisitResult, Visitor};
//!
//! struct CallCounter {
//!     count: usize,
//! }
//!
//! impl<'src> Visitor<'src> for CallCounter {
//!     fn visit_call(&mut self, _call: &CallSite<'src>) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//! ```

mod call_site;
mod code_lens;
mod dispatch;
mod naming;
mod traits;

pub use call_site::{
    Argument, CallKind, CallSite, EXAMPLE_KEYWORDS, FRAMEWORK_RECEIVER, GROUP_KEYWORDS,
};
pub use code_lens::{CodeLensCollector, TraversalState};
pub use dispatch::{walk_node, walk_source};
pub use naming::resolve_name;
pub use traits::{VisitResult, Visitor};
