//! Common types shared between the front ends and the output module.
//!
//! Line numbering differs by audience, so each type states its convention:
//! - [`SourceRange`]: parser convention, 1-indexed lines, 0-indexed byte columns
//! - [`LensLocation`] and [`Range`]: editor convention, 0-indexed lines and columns

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Source Range
// ============================================================================

/// Range of a call in a source file, as reported by the parser.
///
/// - `start_line` / `end_line`: 1-indexed line numbers
/// - `start_column` / `end_column`: 0-indexed byte columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// First line of the call (1-indexed).
    pub start_line: u32,
    /// Column where the call starts (0-indexed, bytes).
    pub start_column: u32,
    /// Last line of the call (1-indexed).
    pub end_line: u32,
    /// Column just past the end of the call (0-indexed, bytes).
    pub end_column: u32,
}

impl SourceRange {
    /// Create a new source range.
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        SourceRange {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

// ============================================================================
// Lens Location
// ============================================================================

/// Location descriptor carried in a lens record's arguments.
///
/// Lines are 0-indexed for editor consumption; columns are passed through
/// from the parser unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LensLocation {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl From<&SourceRange> for LensLocation {
    fn from(range: &SourceRange) -> Self {
        LensLocation {
            start_line: range.start_line.saturating_sub(1),
            start_column: range.start_column,
            end_line: range.end_line.saturating_sub(1),
            end_column: range.end_column,
        }
    }
}

// ============================================================================
// Editor Range
// ============================================================================

/// Zero-based position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Zero-based range a lens is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl From<&LensLocation> for Range {
    fn from(location: &LensLocation) -> Self {
        Range {
            start: Position {
                line: location.start_line,
                character: location.start_column,
            },
            end: Position {
                line: location.end_line,
                character: location.end_column,
            },
        }
    }
}

// ============================================================================
// Group Identifiers
// ============================================================================

/// Identifier of a test group within one traversal.
///
/// Allocated from 1 upwards in the order groups are entered and never reused
/// within the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    /// The first identifier handed out in a traversal.
    pub const FIRST: GroupId = GroupId(1);

    /// The identifier allocated after this one.
    pub fn next(self) -> GroupId {
        GroupId(self.0 + 1)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_location_converts_lines_to_zero_based() {
        let range = SourceRange::new(3, 2, 7, 5);
        let location = LensLocation::from(&range);
        assert_eq!(location.start_line, 2);
        assert_eq!(location.end_line, 6);
        assert_eq!(location.start_column, 2);
        assert_eq!(location.end_column, 5);
    }

    #[test]
    fn lens_location_saturates_at_zero() {
        let range = SourceRange::new(0, 0, 0, 4);
        let location = LensLocation::from(&range);
        assert_eq!(location.start_line, 0);
        assert_eq!(location.end_line, 0);
    }

    #[test]
    fn range_mirrors_location() {
        let location = LensLocation::from(&SourceRange::new(1, 4, 2, 3));
        let range = Range::from(&location);
        assert_eq!(range.start, Position { line: 0, character: 4 });
        assert_eq!(range.end, Position { line: 1, character: 3 });
    }

    #[test]
    fn group_ids_count_up_from_one() {
        assert_eq!(GroupId::FIRST, GroupId(1));
        assert_eq!(GroupId::FIRST.next(), GroupId(2));
        assert!(GroupId(2) > GroupId(1));
    }

    #[test]
    fn group_id_serializes_as_integer() {
        let json = serde_json::to_string(&GroupId(4)).unwrap();
        assert_eq!(json, "4");
    }
}
