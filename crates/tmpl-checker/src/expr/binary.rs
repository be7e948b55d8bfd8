//! Binary operator typing.

use super::ExpressionChecker;
use crate::symbols::{BuiltinType, SymbolRef};
use tmpl_common::diagnostics::{Diagnostic, diagnostic_messages};
use tmpl_common::span::Span;
use tmpl_parser::ast::{BinaryOperator, ExprId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OperatorClass {
    Numeric,
    Plus,
    Comparison,
    And,
    Or,
    Unrecognized,
}

const fn classify(operator: BinaryOperator) -> OperatorClass {
    match operator {
        BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo
        | BinaryOperator::LeftShift
        | BinaryOperator::RightShift
        | BinaryOperator::UnsignedRightShift
        | BinaryOperator::BitwiseAnd
        | BinaryOperator::BitwiseXor
        | BinaryOperator::BitwiseOr => OperatorClass::Numeric,
        BinaryOperator::Add => OperatorClass::Plus,
        BinaryOperator::LessThan
        | BinaryOperator::GreaterThan
        | BinaryOperator::LessThanEquals
        | BinaryOperator::GreaterThanEquals
        | BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::StrictEquals
        | BinaryOperator::StrictNotEquals => OperatorClass::Comparison,
        BinaryOperator::LogicalAnd => OperatorClass::And,
        BinaryOperator::LogicalOr => OperatorClass::Or,
        BinaryOperator::NullishCoalescing => OperatorClass::Unrecognized,
    }
}

/// Operators that accept nullable operands without complaint.
const fn accepts_nullable(operator: BinaryOperator) -> bool {
    matches!(
        operator,
        BinaryOperator::LogicalAnd
            | BinaryOperator::LogicalOr
            | BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::StrictEquals
            | BinaryOperator::StrictNotEquals
    )
}

/// A null-like operand takes the kind of the other side; two null-like
/// operands both become `Other`.
const fn normalize(kind: BuiltinType, other: BuiltinType) -> BuiltinType {
    if !kind.is_null_like() {
        return kind;
    }
    if other.is_null_like() {
        BuiltinType::Other
    } else {
        other
    }
}

/// `Unbound` behaves exactly like `Any` in operator rules.
const fn operand_kind(kind: BuiltinType) -> BuiltinType {
    match kind {
        BuiltinType::Unbound => BuiltinType::Any,
        other => other,
    }
}

impl ExpressionChecker<'_> {
    pub(super) fn check_binary(
        &self,
        span: Span,
        operator: BinaryOperator,
        left: ExprId,
        right: ExprId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> SymbolRef {
        let left_type = self.operand(operator, left, diagnostics);
        let right_type = self.operand(operator, right, diagnostics);

        let left_raw = operand_kind(self.session.type_kind(&left_type));
        let right_raw = operand_kind(self.session.type_kind(&right_type));
        let left_kind = normalize(left_raw, right_raw);
        let right_kind = normalize(right_raw, left_raw);

        use BuiltinType::{Any, Boolean, Number, Other, String};

        match classify(operator) {
            OperatorClass::Numeric => match (left_kind, right_kind) {
                (Any, Any) => self.any(),
                (Any | Number, Any | Number) => self.builtin(Number),
                (Any | Number, _) => {
                    self.number_expected(right, diagnostics);
                    self.any()
                }
                _ => {
                    self.number_expected(left, diagnostics);
                    self.any()
                }
            },
            OperatorClass::Plus => match (left_kind, right_kind) {
                (String, Any | Boolean | Number | String | Other)
                | (Any | Boolean | Number | Other, String) => self.builtin(String),
                (Any, Any | Boolean | Number | Other) | (Boolean | Number | Other, Any) => self.any(),
                (Number, Number) => self.builtin(Number),
                (Boolean | Other, Number) => {
                    self.number_expected(left, diagnostics);
                    self.any()
                }
                (Number, Boolean | Other) => {
                    self.number_expected(right, diagnostics);
                    self.any()
                }
                _ => {
                    Self::report(diagnostics, span, &diagnostic_messages::EXPECTED_A_STRING_OR_NUMBER_TYPE, &[]);
                    self.any()
                }
            },
            OperatorClass::Comparison => match (left_kind, right_kind) {
                (Any, Any) => self.any(),
                (Any, Boolean | Number | String | Other)
                | (Boolean | Number | String | Other, Any) => self.builtin(Boolean),
                (l, r) if l == r && matches!(l, Boolean | Number | String | Other) => {
                    self.builtin(Boolean)
                }
                _ => {
                    Self::report(
                        diagnostics,
                        span,
                        &diagnostic_messages::EXPECTED_OPERANDS_OF_SIMILAR_TYPE_OR_ANY,
                        &[],
                    );
                    self.any()
                }
            },
            OperatorClass::And => right_type,
            OperatorClass::Or => self.session.union(&[left_type, right_type]),
            OperatorClass::Unrecognized => {
                Self::report(
                    diagnostics,
                    span,
                    &diagnostic_messages::UNRECOGNIZED_OPERATOR,
                    &[operator.as_str()],
                );
                self.any()
            }
        }
    }

    /// Type one operand. A nullable operand is reported unless the operator
    /// tolerates null, and is stripped either way.
    fn operand(&self, operator: BinaryOperator, id: ExprId, diagnostics: &mut Vec<Diagnostic>) -> SymbolRef {
        let ty = self.visit(id, diagnostics);
        if !ty.is_nullable() {
            return ty;
        }
        if !accepts_nullable(operator) {
            diagnostics.push(Diagnostic::new(
                self.arena.span(id),
                &diagnostic_messages::EXPRESSION_MIGHT_BE_NULL,
                &[],
            ));
        }
        self.session.non_nullable(&ty)
    }

    fn number_expected(&self, operand: ExprId, diagnostics: &mut Vec<Diagnostic>) {
        diagnostics.push(Diagnostic::new(
            self.arena.span(operand),
            &diagnostic_messages::EXPECTED_A_NUMBER_TYPE,
            &[],
        ));
    }
}
