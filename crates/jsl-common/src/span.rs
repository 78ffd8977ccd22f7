//! Source spans.
//!
//! Offsets are absolute byte offsets into the linted document. Unlike most
//! half-open span types, the end offset is *inclusive*: it is the offset of
//! the last character covered, which is how the external parser reports node
//! ranges and how ignore ranges are compared.

use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` byte range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// A span covering a single offset.
    #[inline]
    pub const fn at(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Whether `offset` lies inside the span (both ends included).
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Whether `other` lies entirely inside this span.
    #[inline]
    pub fn encloses(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether this span lies strictly between `after` and `before`.
    #[inline]
    pub fn strictly_between(&self, after: u32, before: u32) -> bool {
        self.start > after && self.end < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let span = Span::new(3, 7);
        assert!(span.contains(3));
        assert!(span.contains(7));
        assert!(!span.contains(8));
        assert!(!span.contains(2));
    }

    #[test]
    fn test_strictly_between() {
        let marker = Span::new(10, 20);
        assert!(marker.strictly_between(9, 21));
        assert!(!marker.strictly_between(10, 21));
        assert!(!marker.strictly_between(9, 20));
    }
}
