//! Line/column positions.
//!
//! Spans are byte offsets; humans (and the CLI) want 0-based lines and
//! columns. `LineMap` records line starts once and answers conversions in
//! `O(log n)`.

use serde::{Deserialize, Serialize};

/// A 0-based line/character position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Line start table for a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineMap {
    /// Build the line table for `source`.
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i as u32 + 1));
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    #[must_use]
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line as u32, offset - self.line_starts[line])
    }

    /// Convert a position back to a byte offset, if the line exists.
    #[must_use]
    pub fn position_to_offset(&self, position: Position) -> Option<u32> {
        let start = *self.line_starts.get(position.line as usize)?;
        let end = self
            .line_starts
            .get(position.line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start + position.character;
        (offset <= end).then_some(offset)
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
