//! Source location tracking.

use std::ops::Range;

/// A byte range in a generated file, with the line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// Zero-based line of `start`.
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
