//! Word boundaries around a cursor.

use tmpl_common::chars::is_identifier_byte;
use tmpl_common::span::Span;

/// The identifier the cursor at `position` touches, if any.
///
/// The cursor sits between two bytes; the word may lie on either side of
/// it. At the very start (or end) of the text only the byte after (or
/// before) the cursor is considered.
///
/// Identifiers are ASCII, as the scanner reads them, so a non-ASCII
/// character ends the word and spans always fall on char boundaries.
///
/// ```text
/// key.ent|ry     -> entry
/// a.|foo.b       -> foo
/// a.|.b          -> none
/// ```
#[must_use]
pub fn bounded_word_span(source: &str, position: u32) -> Option<Span> {
    let bytes = source.as_bytes();
    let position = position as usize;
    if bytes.is_empty() || position > bytes.len() {
        return None;
    }
    let (left, right) = if position == 0 {
        (0, 0)
    } else if position == bytes.len() {
        (position - 1, position - 1)
    } else {
        (position - 1, position)
    };
    let is_word = |index: usize| bytes.get(index).copied().is_some_and(is_identifier_byte);
    if !is_word(left) && !is_word(right) {
        return None;
    }

    let mut start = left + 1;
    while start > 0 && is_word(start - 1) {
        start -= 1;
    }
    let mut end = right;
    while is_word(end) {
        end += 1;
    }
    Some(Span::new(start as u32, end.max(start) as u32))
}

#[cfg(test)]
#[path = "../tests/word_tests.rs"]
mod tests;
