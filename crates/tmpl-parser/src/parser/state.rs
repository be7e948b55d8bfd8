//! Recursive-descent parser over a token buffer.
//!
//! Precedence, lowest first:
//! pipe, conditional, `??`, `||`, `&&`, `^`, `&`, equality, relational,
//! shift, additive, multiplicative, prefix (`!`, `-`, `+`), postfix
//! (member access, keyed access, calls, `!`), primary.
//!
//! Every production returns a node. Missing pieces become `Empty` nodes or
//! members with an empty name, so partially typed text such as `user.` still
//! yields a `PropertyRead` the completion engine can use.

use crate::ast::{BinaryOperator, ExprArena, ExprId, ExprKind, LiteralMapKey, LiteralValue};
use tmpl_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use tmpl_common::limits::MAX_PARSE_DEPTH;
use tmpl_common::span::Span;
use tmpl_scanner::{SyntaxKind, Token, tokenize};

/// Parse mode: actions (event handlers) allow assignments and `;` chains and
/// reject pipes; bindings are the reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Binding,
    Action,
}

pub struct ParserState<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    index: usize,
    /// Added to every span (used when parsing a slice of a larger text).
    offset: u32,
    mode: ParseMode,
    depth: u32,
    pub(crate) arena: ExprArena,
    pub(crate) errors: Vec<Diagnostic>,
}

impl<'a> ParserState<'a> {
    /// Create a parser over `text`; spans are shifted by `offset`.
    #[must_use]
    pub fn new(text: &'a str, offset: u32, mode: ParseMode, arena: ExprArena) -> Self {
        let (tokens, scan_errors) = tokenize(text);
        let errors = scan_errors.into_iter().map(|d| d.offset(offset)).collect();
        Self {
            text,
            tokens,
            index: 0,
            offset,
            mode,
            depth: 0,
            arena,
            errors,
        }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    pub(crate) fn peek(&self) -> &Token {
        // `tokenize` always ends with an EOF token, and `advance` never moves past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.peek().kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek_kind() == SyntaxKind::EndOfFileToken
    }

    pub(crate) fn index_for_progress(&self) -> usize {
        self.index
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_end() {
            self.index += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Start of the next token, shifted into output coordinates.
    pub(crate) fn input_index(&self) -> u32 {
        self.peek().span.start + self.offset
    }

    /// End of the last consumed token, shifted into output coordinates.
    pub(crate) fn current_end(&self) -> u32 {
        if self.index == 0 {
            return self.input_index();
        }
        self.tokens[self.index - 1].span.end + self.offset
    }

    pub(crate) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_end().max(start))
    }

    fn token_text(&self, token: &Token) -> String {
        token
            .span
            .slice(self.text)
            .map(str::to_string)
            .unwrap_or_default()
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn error(&mut self, span: Span, message: &DiagnosticMessage, args: &[&str]) {
        self.errors.push(Diagnostic::new(span, message, args));
    }

    fn error_at_next(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let token = self.peek().span.offset(self.offset);
        self.error(token, message, args);
    }

    fn unexpected_token(&mut self) {
        if self.at_end() {
            self.error_at_next(&diagnostic_messages::UNEXPECTED_END_OF_EXPRESSION, &[]);
        } else {
            let token = self.peek().clone();
            let text = self.token_text(&token);
            self.error_at_next(&diagnostic_messages::UNEXPECTED_TOKEN, &[&text]);
        }
    }

    /// Consume `kind` or report it missing.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let expected = kind.text().unwrap_or("token");
        self.error_at_next(&diagnostic_messages::MISSING_EXPECTED, &[expected]);
        false
    }

    /// Consume an identifier or keyword and return its name and span.
    pub(crate) fn expect_identifier_or_keyword(&mut self) -> Option<(String, Span)> {
        let token = self.peek().clone();
        if token.kind.is_identifier_or_keyword() {
            self.advance();
            let name = token.text().unwrap_or_default().to_string();
            return Some((name, token.span.offset(self.offset)));
        }
        self.error_at_next(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        None
    }

    /// Identifier, keyword or string; used for microsyntax keys and map keys.
    pub(crate) fn expect_identifier_keyword_or_string(&mut self) -> Option<(String, Span)> {
        let token = self.peek().clone();
        if token.kind.is_identifier_or_keyword() || token.kind == SyntaxKind::StringLiteral {
            self.advance();
            let name = token.text().unwrap_or_default().to_string();
            return Some((name, token.span.offset(self.offset)));
        }
        self.error_at_next(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        None
    }

    fn alloc(&mut self, span: Span, kind: ExprKind) -> ExprId {
        self.arena.alloc(span, kind)
    }

    fn empty_at(&mut self, pos: u32) -> ExprId {
        self.alloc(Span::at(pos), ExprKind::Empty)
    }

    // =========================================================================
    // Top level
    // =========================================================================

    /// Parse `a; b; c` (or a single expression) until the end of input.
    pub(crate) fn parse_chain(&mut self) -> ExprId {
        let start = self.input_index();
        let mut expressions = Vec::new();
        while !self.at_end() {
            let before = self.index;
            expressions.push(self.parse_pipe());

            if self.eat(SyntaxKind::SemicolonToken) {
                if self.mode == ParseMode::Binding {
                    let span = self.tokens[self.index - 1].span.offset(self.offset);
                    self.error(span, &diagnostic_messages::CHAINED_EXPRESSION_IN_BINDING, &[]);
                }
                while self.eat(SyntaxKind::SemicolonToken) {}
            } else if !self.at_end() {
                // When nothing was consumed the primary production already reported it.
                if self.index != before {
                    self.unexpected_token();
                }
                self.advance();
            }
        }

        match expressions.len() {
            0 => self.empty_at(start),
            1 => expressions[0],
            _ => {
                let span = Span::new(
                    self.arena.span(expressions[0]).start,
                    self.arena.span(expressions[expressions.len() - 1]).end,
                );
                self.alloc(span, ExprKind::Chain { expressions })
            }
        }
    }

    pub(crate) fn parse_pipe(&mut self) -> ExprId {
        if self.depth >= MAX_PARSE_DEPTH {
            let start = self.input_index();
            self.error_at_next(&diagnostic_messages::EXPRESSION_TOO_DEEP, &[]);
            while !self.at_end() {
                self.advance();
            }
            return self.empty_at(start);
        }
        self.depth += 1;
        let result = self.parse_pipe_inner();
        self.depth -= 1;
        result
    }

    fn parse_pipe_inner(&mut self) -> ExprId {
        let start = self.input_index();
        let mut result = self.parse_expression();
        if self.peek_kind() == SyntaxKind::BarToken && self.mode == ParseMode::Action {
            self.error_at_next(&diagnostic_messages::PIPE_IN_ACTION_EXPRESSION, &[]);
        }
        while self.eat(SyntaxKind::BarToken) {
            let (name, name_span) = self
                .expect_identifier_or_keyword()
                .unwrap_or_else(|| (String::new(), Span::at(self.current_end())));
            let mut args = Vec::new();
            while self.eat(SyntaxKind::ColonToken) {
                args.push(self.parse_expression());
            }
            let span = self.span_from(start);
            result = self.alloc(
                span,
                ExprKind::Pipe {
                    expression: result,
                    name,
                    name_span,
                    args,
                },
            );
        }
        result
    }

    pub(crate) fn parse_expression(&mut self) -> ExprId {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> ExprId {
        let start = self.input_index();
        let condition = self.parse_nullish_coalescing();
        if !self.eat(SyntaxKind::QuestionToken) {
            return condition;
        }
        let true_exp = self.parse_pipe();
        let false_exp = if self.eat(SyntaxKind::ColonToken) {
            self.parse_pipe()
        } else {
            let end = self.current_end();
            self.error(
                Span::at(end),
                &diagnostic_messages::MISSING_EXPECTED,
                &[":"],
            );
            self.empty_at(end)
        };
        let span = self.span_from(start);
        self.alloc(
            span,
            ExprKind::Conditional {
                condition,
                true_exp,
                false_exp,
            },
        )
    }

    // =========================================================================
    // Binary operators
    // =========================================================================

    fn binary(&mut self, start: u32, operator: BinaryOperator, left: ExprId, right: ExprId) -> ExprId {
        let span = self.span_from(start);
        self.alloc(
            span,
            ExprKind::Binary {
                operator,
                left,
                right,
            },
        )
    }

    /// Parse one left-associative precedence level.
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> ExprId,
        operator_for: fn(SyntaxKind) -> Option<BinaryOperator>,
    ) -> ExprId {
        let start = self.input_index();
        let mut result = operand(self);
        while let Some(operator) = operator_for(self.peek_kind()) {
            self.advance();
            let right = operand(self);
            result = self.binary(start, operator, result, right);
        }
        result
    }

    fn parse_nullish_coalescing(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_logical_or, |kind| match kind {
            SyntaxKind::QuestionQuestionToken => Some(BinaryOperator::NullishCoalescing),
            _ => None,
        })
    }

    fn parse_logical_or(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_logical_and, |kind| match kind {
            SyntaxKind::BarBarToken => Some(BinaryOperator::LogicalOr),
            _ => None,
        })
    }

    fn parse_logical_and(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_bitwise_xor, |kind| match kind {
            SyntaxKind::AmpersandAmpersandToken => Some(BinaryOperator::LogicalAnd),
            _ => None,
        })
    }

    fn parse_bitwise_xor(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_bitwise_and, |kind| match kind {
            SyntaxKind::CaretToken => Some(BinaryOperator::BitwiseXor),
            _ => None,
        })
    }

    fn parse_bitwise_and(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_equality, |kind| match kind {
            SyntaxKind::AmpersandToken => Some(BinaryOperator::BitwiseAnd),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_relational, |kind| match kind {
            SyntaxKind::EqualsEqualsToken => Some(BinaryOperator::Equals),
            SyntaxKind::ExclamationEqualsToken => Some(BinaryOperator::NotEquals),
            SyntaxKind::EqualsEqualsEqualsToken => Some(BinaryOperator::StrictEquals),
            SyntaxKind::ExclamationEqualsEqualsToken => Some(BinaryOperator::StrictNotEquals),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_shift, |kind| match kind {
            SyntaxKind::LessThanToken => Some(BinaryOperator::LessThan),
            SyntaxKind::GreaterThanToken => Some(BinaryOperator::GreaterThan),
            SyntaxKind::LessThanEqualsToken => Some(BinaryOperator::LessThanEquals),
            SyntaxKind::GreaterThanEqualsToken => Some(BinaryOperator::GreaterThanEquals),
            _ => None,
        })
    }

    fn parse_shift(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_additive, |kind| match kind {
            SyntaxKind::LessThanLessThanToken => Some(BinaryOperator::LeftShift),
            SyntaxKind::GreaterThanGreaterThanToken => Some(BinaryOperator::RightShift),
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => {
                Some(BinaryOperator::UnsignedRightShift)
            }
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_multiplicative, |kind| match kind {
            SyntaxKind::PlusToken => Some(BinaryOperator::Add),
            SyntaxKind::MinusToken => Some(BinaryOperator::Subtract),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> ExprId {
        self.parse_binary_level(Self::parse_prefix, |kind| match kind {
            SyntaxKind::AsteriskToken => Some(BinaryOperator::Multiply),
            SyntaxKind::SlashToken => Some(BinaryOperator::Divide),
            SyntaxKind::PercentToken => Some(BinaryOperator::Modulo),
            _ => None,
        })
    }

    // =========================================================================
    // Prefix / postfix
    // =========================================================================

    /// `-x` is typed as `0 - x` and `+x` as `x - 0`, so both stay numeric.
    fn parse_prefix(&mut self) -> ExprId {
        let start = self.input_index();
        match self.peek_kind() {
            SyntaxKind::PlusToken => {
                self.advance();
                let operand = self.parse_prefix();
                let zero = self.alloc(
                    Span::at(start),
                    ExprKind::LiteralPrimitive {
                        value: LiteralValue::Number(0.0),
                    },
                );
                self.binary(start, BinaryOperator::Subtract, operand, zero)
            }
            SyntaxKind::MinusToken => {
                self.advance();
                let zero = self.alloc(
                    Span::at(start),
                    ExprKind::LiteralPrimitive {
                        value: LiteralValue::Number(0.0),
                    },
                );
                let operand = self.parse_prefix();
                self.binary(start, BinaryOperator::Subtract, zero, operand)
            }
            SyntaxKind::ExclamationToken => {
                self.advance();
                let expression = self.parse_prefix();
                let span = self.span_from(start);
                self.alloc(span, ExprKind::PrefixNot { expression })
            }
            _ => self.parse_call_chain(),
        }
    }

    fn parse_call_chain(&mut self) -> ExprId {
        let start = self.input_index();
        let mut result = self.parse_primary();
        loop {
            match self.peek_kind() {
                SyntaxKind::DotToken => {
                    self.advance();
                    result = self.parse_access_member(start, result, false);
                }
                SyntaxKind::QuestionDotToken => {
                    self.advance();
                    result = self.parse_access_member(start, result, true);
                }
                SyntaxKind::OpenBracketToken => {
                    self.advance();
                    let key = self.parse_pipe();
                    self.expect(SyntaxKind::CloseBracketToken);
                    if self.eat(SyntaxKind::EqualsToken) {
                        let value = self.parse_assignment_value();
                        let span = self.span_from(start);
                        result = self.alloc(
                            span,
                            ExprKind::KeyedWrite {
                                receiver: result,
                                key,
                                value,
                            },
                        );
                    } else {
                        let span = self.span_from(start);
                        result = self.alloc(
                            span,
                            ExprKind::KeyedRead {
                                receiver: result,
                                key,
                            },
                        );
                    }
                }
                SyntaxKind::OpenParenToken => {
                    self.advance();
                    let args = self.parse_call_arguments();
                    self.expect(SyntaxKind::CloseParenToken);
                    let span = self.span_from(start);
                    result = self.alloc(
                        span,
                        ExprKind::Call {
                            target: result,
                            args,
                        },
                    );
                }
                SyntaxKind::ExclamationToken => {
                    self.advance();
                    let span = self.span_from(start);
                    result = self.alloc(span, ExprKind::NonNullAssert { expression: result });
                }
                _ => return result,
            }
        }
    }

    /// Value of an assignment. Reports assignments in binding mode but still
    /// parses the value so its diagnostics surface.
    fn parse_assignment_value(&mut self) -> ExprId {
        if self.mode == ParseMode::Binding {
            let span = self.tokens[self.index - 1].span.offset(self.offset);
            self.error(span, &diagnostic_messages::BINDINGS_CANNOT_CONTAIN_ASSIGNMENTS, &[]);
        }
        self.parse_conditional()
    }

    fn parse_call_arguments(&mut self) -> Vec<ExprId> {
        let mut args = Vec::new();
        if self.peek_kind() == SyntaxKind::CloseParenToken {
            return args;
        }
        loop {
            args.push(self.parse_pipe());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        args
    }

    fn parse_access_member(&mut self, start: u32, receiver: ExprId, safe: bool) -> ExprId {
        let (name, name_span) = self
            .expect_identifier_or_keyword()
            .unwrap_or_else(|| (String::new(), Span::at(self.current_end())));

        if self.eat(SyntaxKind::OpenParenToken) {
            let args = self.parse_call_arguments();
            self.expect(SyntaxKind::CloseParenToken);
            let span = self.span_from(start);
            let kind = if safe {
                ExprKind::SafeMethodCall {
                    receiver,
                    name,
                    name_span,
                    args,
                }
            } else {
                ExprKind::MethodCall {
                    receiver,
                    name,
                    name_span,
                    args,
                }
            };
            return self.alloc(span, kind);
        }

        if safe {
            if self.peek_kind() == SyntaxKind::EqualsToken {
                self.error_at_next(&diagnostic_messages::SAFE_NAVIGATION_IN_ASSIGNMENT, &[]);
            }
            let span = self.span_from(start);
            return self.alloc(
                span,
                ExprKind::SafePropertyRead {
                    receiver,
                    name,
                    name_span,
                },
            );
        }

        if self.eat(SyntaxKind::EqualsToken) {
            let value = self.parse_assignment_value();
            let span = self.span_from(start);
            return self.alloc(
                span,
                ExprKind::PropertyWrite {
                    receiver,
                    name,
                    name_span,
                    value,
                },
            );
        }

        // `user.` with nothing typed yet still spans the dot so a cursor
        // right after it lands inside this node.
        let span = self.span_from(start);
        self.alloc(
            span,
            ExprKind::PropertyRead {
                receiver,
                name,
                name_span,
            },
        )
    }

    // =========================================================================
    // Primary
    // =========================================================================

    fn parse_primary(&mut self) -> ExprId {
        let start = self.input_index();
        let token = self.peek().clone();
        let literal = |value| ExprKind::LiteralPrimitive { value };
        match token.kind {
            SyntaxKind::OpenParenToken => {
                self.advance();
                let result = self.parse_pipe();
                self.expect(SyntaxKind::CloseParenToken);
                result
            }
            SyntaxKind::NullKeyword => {
                self.advance();
                let span = self.span_from(start);
                self.alloc(span, literal(LiteralValue::Null))
            }
            SyntaxKind::UndefinedKeyword => {
                self.advance();
                let span = self.span_from(start);
                self.alloc(span, literal(LiteralValue::Undefined))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                self.advance();
                let span = self.span_from(start);
                let value = token.kind == SyntaxKind::TrueKeyword;
                self.alloc(span, literal(LiteralValue::Boolean(value)))
            }
            SyntaxKind::ThisKeyword => {
                self.advance();
                let span = self.span_from(start);
                self.alloc(span, ExprKind::ImplicitReceiver)
            }
            SyntaxKind::NumericLiteral => {
                self.advance();
                let span = self.span_from(start);
                let value = token.number().unwrap_or(f64::NAN);
                self.alloc(span, literal(LiteralValue::Number(value)))
            }
            SyntaxKind::StringLiteral => {
                self.advance();
                let span = self.span_from(start);
                let value = token.text().unwrap_or_default().to_string();
                self.alloc(span, literal(LiteralValue::String(value)))
            }
            SyntaxKind::OpenBracketToken => {
                self.advance();
                let elements = self.parse_expression_list(SyntaxKind::CloseBracketToken);
                self.expect(SyntaxKind::CloseBracketToken);
                let span = self.span_from(start);
                self.alloc(span, ExprKind::LiteralArray { elements })
            }
            SyntaxKind::OpenBraceToken => self.parse_literal_map(start),
            SyntaxKind::Identifier => {
                let receiver = self.alloc(Span::at(start), ExprKind::ImplicitReceiver);
                self.parse_access_member(start, receiver, false)
            }
            SyntaxKind::EndOfFileToken => {
                self.unexpected_token();
                self.empty_at(start)
            }
            _ => {
                self.unexpected_token();
                // Leave closers for the enclosing production; skip anything else.
                if !matches!(
                    token.kind,
                    SyntaxKind::CloseParenToken
                        | SyntaxKind::CloseBracketToken
                        | SyntaxKind::CloseBraceToken
                        | SyntaxKind::SemicolonToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::BarToken
                        | SyntaxKind::ColonToken
                ) {
                    self.advance();
                }
                self.empty_at(start)
            }
        }
    }

    fn parse_expression_list(&mut self, terminator: SyntaxKind) -> Vec<ExprId> {
        let mut result = Vec::new();
        if self.peek_kind() == terminator {
            return result;
        }
        loop {
            result.push(self.parse_pipe());
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        result
    }

    fn parse_literal_map(&mut self, start: u32) -> ExprId {
        self.advance();
        let mut keys = Vec::new();
        let mut values = Vec::new();
        if !self.eat(SyntaxKind::CloseBraceToken) {
            loop {
                let quoted = self.peek_kind() == SyntaxKind::StringLiteral;
                let Some((key, _)) = self.expect_identifier_keyword_or_string() else {
                    break;
                };
                keys.push(LiteralMapKey { key, quoted });
                self.expect(SyntaxKind::ColonToken);
                values.push(self.parse_pipe());
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.expect(SyntaxKind::CloseBraceToken);
        }
        let span = self.span_from(start);
        self.alloc(span, ExprKind::LiteralMap { keys, values })
    }

    /// Consume the parser, returning the arena and collected errors.
    pub(crate) fn finish(self) -> (ExprArena, Vec<Diagnostic>) {
        (self.arena, self.errors)
    }
}
