//! Expression parser entry points.
//!
//! - [`parse_binding`] - property bindings and structural values (pipes, no assignments)
//! - [`parse_action`] - event handlers (assignments and `;` chains, no pipes)
//! - [`parse_interpolation`] - text with `{{ }}` holes
//!
//! Every entry point takes the text, a location string used in messages, and
//! the offset of the text within the template. Node spans stay relative to
//! the text; `base_offset` is recorded on the result for callers that report
//! against the template.

mod state;
pub(crate) use state::{ParseMode, ParserState};

use crate::ast::{ExprArena, ExprKind, ParsedExpression};
use memchr::memmem;
use tmpl_common::chars::is_identifier;
use tmpl_common::diagnostics::{Diagnostic, diagnostic_messages};
use tmpl_common::span::Span;
use tracing::trace;

const INTERPOLATION_START: &str = "{{";
const INTERPOLATION_END: &str = "}}";

/// Parse a property binding expression.
#[must_use]
pub fn parse_binding(text: &str, location: &str, base_offset: u32) -> ParsedExpression {
    if let Some(quote) = parse_quote(text, location, base_offset) {
        return quote;
    }
    parse_with_mode(text, location, base_offset, ParseMode::Binding)
}

/// Parse an event handler expression.
#[must_use]
pub fn parse_action(text: &str, location: &str, base_offset: u32) -> ParsedExpression {
    parse_with_mode(text, location, base_offset, ParseMode::Action)
}

fn parse_with_mode(
    text: &str,
    location: &str,
    base_offset: u32,
    mode: ParseMode,
) -> ParsedExpression {
    trace!(text, location, ?mode, "parse expression");
    let mut parser = ParserState::new(text, 0, mode, ExprArena::new());
    let root = parser.parse_chain();
    let (arena, mut errors) = parser.finish();
    report_interpolation_in_expression(text, &mut errors);
    ParsedExpression {
        source: text.to_string(),
        location: location.to_string(),
        base_offset,
        arena,
        root,
        errors,
    }
}

/// `prefix:rest` where `prefix` is an identifier is handed through uninterpreted.
fn parse_quote(text: &str, location: &str, base_offset: u32) -> Option<ParsedExpression> {
    let separator = memchr::memchr(b':', text.as_bytes())?;
    let prefix = text[..separator].trim();
    if !is_identifier(prefix) {
        return None;
    }
    let mut arena = ExprArena::new();
    let root = arena.alloc(
        Span::new(0, text.len() as u32),
        ExprKind::Quote {
            prefix: prefix.to_string(),
            uninterpreted: text[separator + 1..].to_string(),
        },
    );
    Some(ParsedExpression {
        source: text.to_string(),
        location: location.to_string(),
        base_offset,
        arena,
        root,
        errors: Vec::new(),
    })
}

fn report_interpolation_in_expression(text: &str, errors: &mut Vec<Diagnostic>) {
    let Some(start) = memmem::find(text.as_bytes(), INTERPOLATION_START.as_bytes()) else {
        return;
    };
    if memmem::find(&text.as_bytes()[start..], INTERPOLATION_END.as_bytes()).is_some() {
        errors.push(Diagnostic::new(
            Span::new(start as u32, text.len() as u32),
            &diagnostic_messages::INTERPOLATION_IN_EXPRESSION,
            &[],
        ));
    }
}

/// Parse text containing `{{ expr }}` holes.
///
/// Returns `None` when the text has no interpolation at all.
#[must_use]
pub fn parse_interpolation(text: &str, location: &str, base_offset: u32) -> Option<ParsedExpression> {
    let bytes = text.as_bytes();
    let len = text.len();
    let mut strings = Vec::new();
    let mut pieces: Vec<(usize, usize)> = Vec::new();
    let mut errors = Vec::new();
    let mut index = 0;

    while index < len {
        let Some(found) = memmem::find(&bytes[index..], INTERPOLATION_START.as_bytes()) else {
            break;
        };
        let start = index + found;
        strings.push(text[index..start].to_string());
        let expr_start = start + INTERPOLATION_START.len();
        match memmem::find(&bytes[expr_start..], INTERPOLATION_END.as_bytes()) {
            Some(end) => {
                pieces.push((expr_start, expr_start + end));
                index = expr_start + end + INTERPOLATION_END.len();
            }
            None => {
                errors.push(Diagnostic::new(
                    Span::new(start as u32, len as u32),
                    &diagnostic_messages::UNTERMINATED_INTERPOLATION,
                    &[],
                ));
                pieces.push((expr_start, len));
                index = len;
            }
        }
    }
    if pieces.is_empty() {
        return None;
    }
    strings.push(text.get(index..).unwrap_or_default().to_string());

    let mut arena = ExprArena::new();
    let mut expressions = Vec::with_capacity(pieces.len());
    for (start, end) in pieces {
        let piece = &text[start..end];
        if piece.trim().is_empty() {
            errors.push(Diagnostic::new(
                Span::new(start as u32, end as u32),
                &diagnostic_messages::BLANK_INTERPOLATION,
                &[],
            ));
            expressions.push(arena.alloc(Span::at(start as u32), ExprKind::Empty));
            continue;
        }
        let mut parser = ParserState::new(piece, start as u32, ParseMode::Binding, arena);
        expressions.push(parser.parse_chain());
        let (returned, piece_errors) = parser.finish();
        arena = returned;
        errors.extend(piece_errors);
    }

    let root = arena.alloc(
        Span::new(0, len as u32),
        ExprKind::Interpolation {
            strings,
            expressions,
        },
    );
    Some(ParsedExpression {
        source: text.to_string(),
        location: location.to_string(),
        base_offset,
        arena,
        root,
        errors,
    })
}

#[cfg(test)]
#[path = "../../tests/parser_tests.rs"]
mod tests;
