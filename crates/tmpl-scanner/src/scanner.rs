//! Scanner state machine.
//!
//! The scanner walks the expression text once and produces tokens with
//! byte spans relative to the start of the text. Errors never stop the
//! scan: the offending input becomes an `Unknown` token and a diagnostic is
//! recorded, so the parser can still build a partial tree.

use crate::SyntaxKind;
use tmpl_common::chars::{is_digit, is_identifier_part, is_identifier_start, is_whitespace};
use tmpl_common::diagnostics::{Diagnostic, diagnostic_messages};
use tmpl_common::span::Span;

/// Payload carried by a token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    None,
    /// Identifier/keyword name or the unescaped contents of a string literal.
    Text(String),
    Number(f64),
}

/// A scanned token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
    pub value: TokenValue,
}

impl Token {
    #[must_use]
    pub const fn new(kind: SyntaxKind, span: Span) -> Self {
        Self {
            kind,
            span,
            value: TokenValue::None,
        }
    }

    #[must_use]
    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }

    /// Name of an identifier or keyword token, or string literal contents.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => self.kind.text(),
        }
    }

    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

/// Tokenizer over one expression text.
pub struct ScannerState<'a> {
    text: &'a str,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ScannerState<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics produced so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char_at(&self, ahead: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(ahead)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// Consume `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Scan the next token. Returns `EndOfFileToken` forever once the text is exhausted.
    pub fn scan(&mut self) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }

        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Token::new(SyntaxKind::EndOfFileToken, Span::at(start as u32));
        };

        if is_identifier_start(ch) {
            return self.scan_identifier(start);
        }
        if is_digit(ch) || (ch == '.' && self.peek_char_at(1).is_some_and(is_digit)) {
            return self.scan_number(start);
        }

        self.pos += ch.len_utf8();
        let kind = match ch {
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            ',' => SyntaxKind::CommaToken,
            ':' => SyntaxKind::ColonToken,
            ';' => SyntaxKind::SemicolonToken,
            '.' => SyntaxKind::DotToken,
            '#' => SyntaxKind::HashToken,
            '\'' | '"' => return self.scan_string(start, ch),
            '+' => SyntaxKind::PlusToken,
            '-' => SyntaxKind::MinusToken,
            '*' => SyntaxKind::AsteriskToken,
            '/' => SyntaxKind::SlashToken,
            '%' => SyntaxKind::PercentToken,
            '^' => SyntaxKind::CaretToken,
            '?' => {
                // `a?.5:b` is a conditional, not a safe read.
                if self.peek_char() == Some('.') && !self.peek_char_at(1).is_some_and(is_digit) {
                    self.pos += 1;
                    SyntaxKind::QuestionDotToken
                } else if self.eat('?') {
                    SyntaxKind::QuestionQuestionToken
                } else {
                    SyntaxKind::QuestionToken
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        SyntaxKind::ExclamationEqualsEqualsToken
                    } else {
                        SyntaxKind::ExclamationEqualsToken
                    }
                } else {
                    SyntaxKind::ExclamationToken
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        SyntaxKind::EqualsEqualsEqualsToken
                    } else {
                        SyntaxKind::EqualsEqualsToken
                    }
                } else {
                    SyntaxKind::EqualsToken
                }
            }
            '<' => {
                if self.eat('=') {
                    SyntaxKind::LessThanEqualsToken
                } else if self.eat('<') {
                    SyntaxKind::LessThanLessThanToken
                } else {
                    SyntaxKind::LessThanToken
                }
            }
            '>' => {
                if self.eat('=') {
                    SyntaxKind::GreaterThanEqualsToken
                } else if self.eat('>') {
                    if self.eat('>') {
                        SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                    } else {
                        SyntaxKind::GreaterThanGreaterThanToken
                    }
                } else {
                    SyntaxKind::GreaterThanToken
                }
            }
            '&' => {
                if self.eat('&') {
                    SyntaxKind::AmpersandAmpersandToken
                } else {
                    SyntaxKind::AmpersandToken
                }
            }
            '|' => {
                if self.eat('|') {
                    SyntaxKind::BarBarToken
                } else {
                    SyntaxKind::BarToken
                }
            }
            other => {
                let span = self.span_from(start);
                self.diagnostics.push(Diagnostic::new(
                    span,
                    &diagnostic_messages::INVALID_CHARACTER,
                    &[&other.to_string()],
                ));
                return Token {
                    kind: SyntaxKind::Unknown,
                    span,
                    value: TokenValue::Text(other.to_string()),
                };
            }
        };
        Token::new(kind, self.span_from(start))
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        let name = &self.text[start..self.pos];
        let kind = SyntaxKind::keyword(name).unwrap_or(SyntaxKind::Identifier);
        Token {
            kind,
            span: self.span_from(start),
            value: TokenValue::Text(name.to_string()),
        }
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut seen_dot = false;
        while let Some(ch) = self.peek_char() {
            if is_digit(ch) {
                self.pos += 1;
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                self.pos += 1;
            } else if ch == 'e' || ch == 'E' {
                self.pos += 1;
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.pos += 1;
                }
                if !self.peek_char().is_some_and(is_digit) {
                    let span = self.span_from(start);
                    self.diagnostics
                        .push(Diagnostic::new(span, &diagnostic_messages::INVALID_EXPONENT, &[]));
                    return Token::new(SyntaxKind::Unknown, span);
                }
                while self.peek_char().is_some_and(is_digit) {
                    self.pos += 1;
                }
                break;
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        // The loop only admits digits, one dot and a well-formed exponent.
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        Token {
            kind: SyntaxKind::NumericLiteral,
            span: self.span_from(start),
            value: TokenValue::Number(value),
        }
    }

    fn scan_string(&mut self, start: usize, quote: char) -> Token {
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                let span = self.span_from(start);
                self.diagnostics
                    .push(Diagnostic::new(span, &diagnostic_messages::UNTERMINATED_QUOTE, &[]));
                return Token {
                    kind: SyntaxKind::StringLiteral,
                    span,
                    value: TokenValue::Text(value),
                };
            };
            self.pos += ch.len_utf8();
            if ch == quote {
                break;
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            let Some(escaped) = self.peek_char() else {
                continue;
            };
            self.pos += escaped.len_utf8();
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'b' => value.push('\u{08}'),
                'f' => value.push('\u{0C}'),
                'v' => value.push('\u{0B}'),
                '0' => value.push('\0'),
                'u' => {
                    let hex = self.text.get(self.pos..self.pos + 4);
                    match hex
                        .and_then(|h| u32::from_str_radix(h, 16).ok())
                        .and_then(char::from_u32)
                    {
                        Some(decoded) => {
                            value.push(decoded);
                            self.pos += 4;
                        }
                        None => value.push('u'),
                    }
                }
                other => value.push(other),
            }
        }
        Token {
            kind: SyntaxKind::StringLiteral,
            span: self.span_from(start),
            value: TokenValue::Text(value),
        }
    }
}

/// Scan all of `text`. The returned tokens always end with `EndOfFileToken`.
#[must_use]
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut scanner = ScannerState::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.scan();
        let done = token.is(SyntaxKind::EndOfFileToken);
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, scanner.into_diagnostics())
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod tests;
