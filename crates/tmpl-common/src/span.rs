//! Source spans.
//!
//! A `Span` is a half-open byte range `[start, end)` into some source text.
//! Expression spans are relative to the text they were parsed from; callers
//! add a base offset (see [`Span::offset`]) when reporting against a larger
//! document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte range in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span. `end` is clamped so that `start <= end` always holds.
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    #[inline]
    #[must_use]
    pub const fn at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span covering `len` bytes starting at `start`.
    #[inline]
    #[must_use]
    pub const fn from_len(start: u32, len: u32) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` lies inside the span, both ends inclusive.
    ///
    /// Editors place the cursor *between* characters, so a cursor sitting
    /// right after the last character still belongs to the span.
    #[inline]
    #[must_use]
    pub const fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether `pos` lies inside `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains_exclusive(&self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies completely inside this span.
    #[inline]
    #[must_use]
    pub const fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shift the span by `base` bytes.
    #[inline]
    #[must_use]
    pub const fn offset(&self, base: u32) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// Smallest span covering both spans.
    #[inline]
    #[must_use]
    pub fn merge(&self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether this span fits inside `other` (or `other` is absent).
    ///
    /// Equal spans count as narrower so that the most recently visited of two
    /// candidates with the same extent wins.
    #[inline]
    #[must_use]
    pub fn is_narrower_than(&self, other: Option<Span>) -> bool {
        match other {
            None => true,
            Some(other) => other.encloses(*self),
        }
    }

    /// Slice of `text` covered by this span, if it is in bounds.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start as usize..self.end as usize)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod tests;
