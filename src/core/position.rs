/*!
# Source position types (Position, Span, PackedSpan)

Offsets are byte offsets into the text of a single document snapshot.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Position in source code (0-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Span in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn zero() -> Self {
        Self::new(Position::zero(), Position::zero())
    }
}

/// Compact span representation (offset + length) within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PackedSpan {
    pub start: u32,
    pub len: u32,
}

impl PackedSpan {
    pub fn new(start: u32, len: u32) -> Self { Self { start, len } }
    pub fn empty() -> Self { Self { start: 0, len: 0 } }
    pub fn end(&self) -> u32 { self.start + self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Span from `start` to `end` (saturating when `end < start`).
    pub fn from_bounds(start: u32, end: u32) -> Self {
        Self { start, len: end.saturating_sub(start) }
    }

    /// Smallest span covering both.
    pub fn cover(&self, other: PackedSpan) -> Self {
        Self::from_bounds(self.start.min(other.start), self.end().max(other.end()))
    }

    pub fn contains_span(&self, other: PackedSpan) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    /// Non-empty overlap (touching ends do not count).
    pub fn intersects(&self, other: PackedSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Display for PackedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// Line index for fast offset->(line,column) mapping.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts.
    line_starts: Arc<Vec<u32>>, // Arc для дешёвого клонирования
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() / 32 + 1);
        starts.push(0u32);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' { starts.push((i + 1) as u32); }
        }
        Self { line_starts: Arc::new(starts) }
    }

    pub fn line_count(&self) -> usize { self.line_starts.len() }

    /// 0-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> usize {
        // Бинарный поиск последнего line_start <= offset
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    pub fn to_position(&self, offset: u32) -> Position {
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];
        Position::new(line, (offset - line_start) as usize, offset as usize)
    }

    pub fn position_range(&self, span: PackedSpan) -> Span {
        let start = self.to_position(span.start);
        let end = self.to_position(span.end());
        Span::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_basic() {
        let text = "line1\nline2\nlast";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 3);
        let p = idx.to_position(7); // 'i' in line2
        assert_eq!(p.line, 1);
        assert_eq!(p.column, 1);
        assert_eq!(idx.line_of(6), 1);
        assert_eq!(idx.line_of(5), 0);
    }

    #[test]
    fn test_packed_span_to_span() {
        let text = "ab\ncd"; // offsets: a=0 b=1 \n=2 c=3 d=4
        let idx = LineIndex::new(text);
        let ps = PackedSpan::new(3, 2); // 'cd'
        let span = idx.position_range(ps);
        assert_eq!(span.start.line, 1);
        assert_eq!(span.start.column, 0);
        assert_eq!(span.end.column, 2);
    }

    #[test]
    fn test_span_relations() {
        let a = PackedSpan::from_bounds(2, 6);
        let b = PackedSpan::from_bounds(6, 9);
        assert!(!a.intersects(b));
        assert!(a.intersects(PackedSpan::new(5, 1)));
        assert_eq!(a.cover(b), PackedSpan::from_bounds(2, 9));
        assert!(a.cover(b).contains_span(b));
        assert_eq!(PackedSpan::from_bounds(5, 3).len, 0);
    }
}
