//! Half-open byte ranges over a text.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in some text.
///
/// Offsets are byte offsets into UTF-8 text. `end >= start` always holds;
/// an empty span (`start == end`) denotes a position, which is how pure
/// insertions are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    start: usize,
    end: usize,
}

impl TextSpan {
    /// Create a span from a start offset and a length.
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Create a span from start and end offsets.
    ///
    /// # Panics
    /// Panics if `end < start`.
    #[must_use]
    pub const fn from_bounds(start: usize, end: usize) -> Self {
        assert!(end >= start, "span end must not precede its start");
        Self { start, end }
    }

    /// An empty span at `position`.
    #[must_use]
    pub const fn at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Inclusive start offset.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `position` lies inside `[start, end)`.
    #[must_use]
    pub const fn contains(self, position: usize) -> bool {
        position >= self.start && position < self.end
    }

    /// Returns `true` if the two spans overlap.
    ///
    /// Spans that merely touch (`a.end == b.start`) do not intersect. An empty
    /// span intersects a span it sits strictly inside of, and two identical
    /// spans always intersect (so two insertions at the same position
    /// collide).
    #[must_use]
    pub const fn intersects_with(self, other: Self) -> bool {
        if self.start == other.start && self.end == other.end {
            return true;
        }
        let lo = if self.start > other.start {
            self.start
        } else {
            other.start
        };
        let hi = if self.end < other.end {
            self.end
        } else {
            other.end
        };
        if lo < hi {
            return true;
        }
        (self.is_empty() && other.start < self.start && self.start < other.end)
            || (other.is_empty() && self.start < other.start && other.start < self.end)
    }

    /// The span as a `Range<usize>` for slicing.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl From<Range<usize>> for TextSpan {
    fn from(range: Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}
