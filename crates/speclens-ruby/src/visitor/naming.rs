// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Display names for examples and groups.
//!
//! Only the first argument is inspected. Rules, first match wins:
//!
//! | First argument | Name |
//! |----------------|------|
//! | none | `<unnamed-N>`, N counting up per traversal |
//! | string literal or heredoc | its content |
//! | call or bare reference | `<callee>` |
//! | anything else | its raw source text |

use super::call_site::Argument;

/// Derive the display name for a call whose first argument is `first_argument`.
///
/// `anonymous_count` is shared by every unnamed call in one traversal and is
/// incremented before use, so the first unnamed call gets `<unnamed-1>`.
pub fn resolve_name(first_argument: Option<&Argument<'_>>, anonymous_count: &mut u32) -> String {
    match first_argument {
        None => {
            *anonymous_count += 1;
            format!("<unnamed-{}>", anonymous_count)
        }
        Some(Argument::StringLiteral(content)) => (*content).to_string(),
        Some(Argument::Call { callee }) => format!("<{}>", callee),
        Some(Argument::Other(text)) => (*text).to_string(),
    }
}
