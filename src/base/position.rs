//! Line/column and byte-offset positions for AST node handles.
//!
//! Adapted from the teacher's `base::position` module: a `Span` is a byte
//! range plus the line/column pair at its start, cheap enough to carry on
//! every [`crate::source::NodeHandle`] without a line-index lookup at query
//! time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-indexed line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A source range: byte offsets plus the line/column of each end.
///
/// Pins and [`crate::source::NodeHandle`]s carry a `Span` rather than a byte
/// range alone, since most consumers (hover text, goto-definition) want
/// line/column immediately and recomputing it from a line index on every
/// query would defeat the point of caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_byte: u32,
    pub end_byte: u32,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start_byte: u32, end_byte: u32, start: Position, end: Position) -> Self {
        Self {
            start_byte,
            end_byte,
            start,
            end,
        }
    }

    /// A span of zero width at the origin, used for synthesized pins (e.g.
    /// the synthesized `new` pin in `api_map::members`) that have no real
    /// source location.
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn contains(&self, line: u32, column: u32) -> bool {
        let after_start = line > self.start.line || (line == self.start.line && column >= self.start.column);
        let before_end = line < self.end.line || (line == self.end.line && column <= self.end.column);
        after_start && before_end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
