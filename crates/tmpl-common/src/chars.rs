//! Character classes for the template expression language.
//!
//! Identifiers follow the JavaScript ASCII subset: letters, `_` and `$` may
//! start an identifier; digits may continue one.

#[inline]
#[must_use]
pub const fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

#[inline]
#[must_use]
pub const fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Byte form of [`is_identifier_part`], for scanning raw text.
#[inline]
#[must_use]
pub const fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[inline]
#[must_use]
pub const fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{A0}')
}

#[inline]
#[must_use]
pub const fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Whether `name` is a plain identifier (non-empty, valid start, valid parts).
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}
