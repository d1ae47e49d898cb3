//! Source location tracking
//!
//! `Span` marks where a token came from in the expression text. Tokens, syntax
//! errors and runtime errors raised by an operator or call all carry one.

use std::fmt;

/// Span representing a location in the expression source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line number of `start`
    pub line: usize,
    /// 1-based column (in characters) of `start`
    pub col: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// A zero-width span at the given position, used for implicit tokens
    pub fn point(at: usize, line: usize, col: usize) -> Self {
        Self::new(at, at, line, col)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
