//! Structural attribute microsyntax.
//!
//! A structural attribute such as `*ngFor="let item of items; trackBy: byId"`
//! is parsed into ordered bindings:
//!
//! | key            | var | name        | value   |
//! |----------------|-----|-------------|---------|
//! | `ngFor`        | no  |             |         |
//! | `item`         | yes | `$implicit` |         |
//! | `ngForOf`      | no  |             | `items` |
//! | `ngForTrackBy` | no  |             | `byId`  |
//!
//! Grammar, repeated and separated by optional `;` or `,`:
//!
//! ```text
//! let IDENT (= IDENT)?      variable reading a context member ($implicit by default)
//! KEY :? EXPR?              input named templateKey + Capitalized(KEY)
//! EXPR as IDENT             input followed by a variable aliasing it
//! ```
//!
//! The first binding is always the template key itself. Keys and values keep
//! independent spans (relative to the attribute value) so editors can target
//! either half.

use crate::ast::{ExprArena, ExprId};
use crate::parser::{ParseMode, ParserState};
use serde::Serialize;
use tmpl_common::diagnostics::Diagnostic;
use tmpl_common::span::Span;
use tmpl_scanner::SyntaxKind;

/// Context member a `let` variable reads when no `= name` is given.
pub const IMPLICIT_CONTEXT_MEMBER: &str = "$implicit";

/// One microsyntax binding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateBinding {
    /// Span of the whole binding.
    pub span: Span,
    /// Normalized key (`ngForOf`) or, for variables, the variable name.
    pub key: String,
    /// Span of the key as written; `None` for the leading template-key binding.
    pub key_span: Option<Span>,
    pub key_is_var: bool,
    /// For variables, the context member read (`$implicit`, `index`, or the aliased key).
    pub name: Option<String>,
    pub name_span: Option<Span>,
    pub value: Option<ExprId>,
    pub value_span: Option<Span>,
}

impl TemplateBinding {
    /// Whether `position` (relative to the attribute value) falls in this binding.
    #[must_use]
    pub fn contains(&self, position: u32) -> bool {
        self.span.contains(position)
            || self.key_span.is_some_and(|s| s.contains(position))
            || self.value_span.is_some_and(|s| s.contains(position))
    }
}

/// Result of parsing one structural attribute value.
#[derive(Clone, Debug, Serialize)]
pub struct TemplateBindingParseResult {
    pub template_key: String,
    pub source: String,
    pub location: String,
    /// Offset of `source` within the template.
    pub base_offset: u32,
    /// Arena holding every binding value.
    pub arena: ExprArena,
    pub bindings: Vec<TemplateBinding>,
    pub errors: Vec<Diagnostic>,
}

impl TemplateBindingParseResult {
    /// The binding whose span (or key/value span) contains `position`,
    /// preferring the last one, since a cursor on a separator belongs to what follows.
    #[must_use]
    pub fn binding_at(&self, position: u32) -> Option<&TemplateBinding> {
        self.bindings.iter().rev().find(|b| b.contains(position))
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a structural attribute value under `template_key` (e.g. `ngFor`).
#[must_use]
pub fn parse_template_bindings(
    template_key: &str,
    text: &str,
    location: &str,
    base_offset: u32,
) -> TemplateBindingParseResult {
    let mut parser = ParserState::new(text, 0, ParseMode::Binding, ExprArena::new());
    let mut bindings = Vec::new();
    let mut first = true;

    loop {
        let start = parser.input_index();
        let before = parser.index_for_progress();
        let is_template_key = first;
        let mut key_is_var = false;
        let mut key;
        let mut key_span = None;
        let raw_key;

        if is_template_key {
            raw_key = template_key.to_string();
            key = raw_key.clone();
            first = false;
        } else {
            key_is_var = parser.eat(SyntaxKind::LetKeyword);
            let Some((raw, span)) = expect_template_binding_key(&mut parser) else {
                if !parser.at_end() {
                    parser.advance();
                }
                if parser.at_end() {
                    break;
                }
                continue;
            };
            raw_key = raw;
            key_span = Some(span);
            key = if key_is_var {
                raw_key.clone()
            } else {
                format!("{template_key}{}", capitalize(&raw_key))
            };
            parser.eat(SyntaxKind::ColonToken);
        }

        let mut name = None;
        let mut name_span = None;
        let mut value = None;
        let mut value_span = None;

        if key_is_var {
            if parser.eat(SyntaxKind::EqualsToken) {
                if let Some((n, s)) = expect_template_binding_key(&mut parser) {
                    name = Some(n);
                    name_span = Some(s);
                }
            } else {
                name = Some(IMPLICIT_CONTEXT_MEMBER.to_string());
            }
        } else if parser.peek_kind() == SyntaxKind::AsKeyword {
            // `key as alias`: a variable named `alias` reading context member `key`.
            parser.advance();
            name = Some(raw_key.clone());
            name_span = key_span;
            if let Some((alias, span)) = expect_template_binding_key(&mut parser) {
                key = alias;
                key_span = Some(span);
            }
            key_is_var = true;
        } else if !parser.at_end() && parser.peek_kind() != SyntaxKind::LetKeyword {
            let value_start = parser.input_index();
            let expr = parser.parse_pipe();
            value = Some(expr);
            value_span = Some(parser.span_from(value_start));
        }

        let span = parser.span_from(start);
        bindings.push(TemplateBinding {
            span,
            key: key.clone(),
            key_span,
            key_is_var,
            name,
            name_span,
            value,
            value_span,
        });

        if !key_is_var && parser.peek_kind() == SyntaxKind::AsKeyword {
            let let_start = parser.input_index();
            parser.advance();
            if let Some((alias, alias_span)) = expect_template_binding_key(&mut parser) {
                bindings.push(TemplateBinding {
                    span: parser.span_from(let_start),
                    key: alias,
                    key_span: Some(alias_span),
                    key_is_var: true,
                    name: Some(key),
                    name_span: None,
                    value: None,
                    value_span: None,
                });
            }
        }

        if !parser.eat(SyntaxKind::SemicolonToken) {
            parser.eat(SyntaxKind::CommaToken);
        }
        if parser.at_end() {
            break;
        }
        // Guarantee progress on input the grammar cannot place.
        if !is_template_key && parser.index_for_progress() == before {
            parser.advance();
        }
    }

    let (arena, errors) = parser.finish();
    TemplateBindingParseResult {
        template_key: template_key.to_string(),
        source: text.to_string(),
        location: location.to_string(),
        base_offset,
        arena,
        bindings,
        errors,
    }
}

/// A binding key: identifiers, keywords or strings joined by `-` (`ng-if`).
fn expect_template_binding_key(parser: &mut ParserState<'_>) -> Option<(String, Span)> {
    let (mut key, mut span) = parser.expect_identifier_keyword_or_string()?;
    while parser.peek_kind() == SyntaxKind::MinusToken {
        parser.advance();
        key.push('-');
        match parser.expect_identifier_keyword_or_string() {
            Some((part, part_span)) => {
                key.push_str(&part);
                span = span.merge(part_span);
            }
            None => break,
        }
    }
    Some((key, span))
}

#[cfg(test)]
#[path = "../tests/microsyntax_tests.rs"]
mod tests;
