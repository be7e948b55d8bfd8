//! Diagnostic message data.
//!
//! Keep `diagnostic_codes`, `diagnostic_messages` and `DIAGNOSTIC_MESSAGES`
//! in the same order; codes are stable and part of the public output.

use super::{DiagnosticCategory, DiagnosticMessage};

/// Numeric diagnostic codes.
pub mod diagnostic_codes {
    pub const UNEXPECTED_TOKEN: u32 = 1001;
    pub const MISSING_EXPECTED: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const UNEXPECTED_END_OF_EXPRESSION: u32 = 1004;
    pub const UNTERMINATED_QUOTE: u32 = 1005;
    pub const INVALID_CHARACTER: u32 = 1006;
    pub const INVALID_EXPONENT: u32 = 1007;
    pub const BINDINGS_CANNOT_CONTAIN_ASSIGNMENTS: u32 = 1008;
    pub const PIPE_IN_ACTION_EXPRESSION: u32 = 1009;
    pub const INTERPOLATION_IN_EXPRESSION: u32 = 1010;
    pub const BLANK_INTERPOLATION: u32 = 1011;
    pub const UNTERMINATED_INTERPOLATION: u32 = 1012;
    pub const EXPRESSION_TOO_DEEP: u32 = 1013;
    pub const CHAINED_EXPRESSION_IN_BINDING: u32 = 1014;
    pub const SAFE_NAVIGATION_IN_ASSIGNMENT: u32 = 1015;

    pub const EXPRESSION_MIGHT_BE_NULL: u32 = 2001;
    pub const EXPECTED_A_NUMBER_TYPE: u32 = 2002;
    pub const EXPECTED_A_STRING_OR_NUMBER_TYPE: u32 = 2003;
    pub const EXPECTED_OPERANDS_OF_SIMILAR_TYPE_OR_ANY: u32 = 2004;
    pub const UNRECOGNIZED_OPERATOR: u32 = 2005;
    pub const NO_PIPE_FOUND: u32 = 2006;
    pub const UNABLE_TO_RESOLVE_COMPATIBLE_CALL_SIGNATURE: u32 = 2007;
    pub const UNABLE_TO_RESOLVE_SIGNATURE: u32 = 2008;
    pub const COULD_NOT_RESOLVE_TYPE: u32 = 2009;
    pub const IDENTIFIER_NOT_CALLABLE: u32 = 2010;
    pub const IDENTIFIER_POSSIBLY_UNDEFINED: u32 = 2011;
    pub const IDENTIFIER_NOT_DEFINED_IN_APP_CONTEXT: u32 = 2012;
    pub const IDENTIFIER_NOT_DEFINED_ON_RECEIVER: u32 = 2013;
    pub const IDENTIFIER_IS_PRIVATE: u32 = 2014;
    pub const CALLABLE_EXPRESSION_EXPECTED_METHOD_CALL: u32 = 2015;
    pub const CALL_TARGET_NOT_CALLABLE: u32 = 2016;
    pub const TEMPLATE_CONTEXT_MISSING_MEMBER: u32 = 2017;
}

/// Message definitions, one constant per code.
pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const UNEXPECTED_TOKEN: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNEXPECTED_TOKEN,
        category: DiagnosticCategory::Error,
        message: "Unexpected token '{0}'",
    };
    pub const MISSING_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::MISSING_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Missing expected {0}",
    };
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Identifier or keyword expected",
    };
    pub const UNEXPECTED_END_OF_EXPRESSION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNEXPECTED_END_OF_EXPRESSION,
        category: DiagnosticCategory::Error,
        message: "Unexpected end of expression",
    };
    pub const UNTERMINATED_QUOTE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_QUOTE,
        category: DiagnosticCategory::Error,
        message: "Unterminated quote",
    };
    pub const INVALID_CHARACTER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INVALID_CHARACTER,
        category: DiagnosticCategory::Error,
        message: "Invalid character '{0}'",
    };
    pub const INVALID_EXPONENT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INVALID_EXPONENT,
        category: DiagnosticCategory::Error,
        message: "Invalid exponent",
    };
    pub const BINDINGS_CANNOT_CONTAIN_ASSIGNMENTS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::BINDINGS_CANNOT_CONTAIN_ASSIGNMENTS,
        category: DiagnosticCategory::Error,
        message: "Bindings cannot contain assignments",
    };
    pub const PIPE_IN_ACTION_EXPRESSION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PIPE_IN_ACTION_EXPRESSION,
        category: DiagnosticCategory::Error,
        message: "Cannot have a pipe in an action expression",
    };
    pub const INTERPOLATION_IN_EXPRESSION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INTERPOLATION_IN_EXPRESSION,
        category: DiagnosticCategory::Error,
        message: "Got interpolation ({{}}) where expression was expected",
    };
    pub const BLANK_INTERPOLATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::BLANK_INTERPOLATION,
        category: DiagnosticCategory::Error,
        message: "Blank expressions are not allowed in interpolated strings",
    };
    pub const UNTERMINATED_INTERPOLATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_INTERPOLATION,
        category: DiagnosticCategory::Error,
        message: "Unterminated interpolation, missing '}}'",
    };
    pub const EXPRESSION_TOO_DEEP: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPRESSION_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Expression is nested too deeply",
    };
    pub const CHAINED_EXPRESSION_IN_BINDING: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CHAINED_EXPRESSION_IN_BINDING,
        category: DiagnosticCategory::Error,
        message: "Binding expression cannot contain chained expression",
    };
    pub const SAFE_NAVIGATION_IN_ASSIGNMENT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SAFE_NAVIGATION_IN_ASSIGNMENT,
        category: DiagnosticCategory::Error,
        message: "The '?.' operator cannot be used in the assignment",
    };
    pub const EXPRESSION_MIGHT_BE_NULL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPRESSION_MIGHT_BE_NULL,
        category: DiagnosticCategory::Error,
        message: "The expression might be null",
    };
    pub const EXPECTED_A_NUMBER_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPECTED_A_NUMBER_TYPE,
        category: DiagnosticCategory::Error,
        message: "Expected a number type",
    };
    pub const EXPECTED_A_STRING_OR_NUMBER_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPECTED_A_STRING_OR_NUMBER_TYPE,
        category: DiagnosticCategory::Error,
        message: "Expected operands to be a string or number type",
    };
    pub const EXPECTED_OPERANDS_OF_SIMILAR_TYPE_OR_ANY: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXPECTED_OPERANDS_OF_SIMILAR_TYPE_OR_ANY,
        category: DiagnosticCategory::Error,
        message: "Expected operands to be of similar type or any",
    };
    pub const UNRECOGNIZED_OPERATOR: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNRECOGNIZED_OPERATOR,
        category: DiagnosticCategory::Error,
        message: "Unrecognized operator {0}",
    };
    pub const NO_PIPE_FOUND: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::NO_PIPE_FOUND,
        category: DiagnosticCategory::Error,
        message: "No pipe of name {0} found",
    };
    pub const UNABLE_TO_RESOLVE_COMPATIBLE_CALL_SIGNATURE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNABLE_TO_RESOLVE_COMPATIBLE_CALL_SIGNATURE,
        category: DiagnosticCategory::Error,
        message: "Unable to resolve compatible call signature",
    };
    pub const UNABLE_TO_RESOLVE_SIGNATURE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNABLE_TO_RESOLVE_SIGNATURE,
        category: DiagnosticCategory::Error,
        message: "Unable to resolve signature for call of {0}",
    };
    pub const COULD_NOT_RESOLVE_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::COULD_NOT_RESOLVE_TYPE,
        category: DiagnosticCategory::Error,
        message: "Could not resolve the type of '{0}'",
    };
    pub const IDENTIFIER_NOT_CALLABLE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_NOT_CALLABLE,
        category: DiagnosticCategory::Error,
        message: "'{0}' is not callable",
    };
    pub const IDENTIFIER_POSSIBLY_UNDEFINED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_POSSIBLY_UNDEFINED,
        category: DiagnosticCategory::Error,
        message: "'{0}' is possibly undefined. Consider using the safe navigation operator ({1}) or non-null assertion operator ({2}).",
    };
    pub const IDENTIFIER_NOT_DEFINED_IN_APP_CONTEXT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_NOT_DEFINED_IN_APP_CONTEXT,
        category: DiagnosticCategory::Error,
        message: "Identifier '{0}' is not defined. The component declaration, template variable declarations, and element references do not contain such a member",
    };
    pub const IDENTIFIER_NOT_DEFINED_ON_RECEIVER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_NOT_DEFINED_ON_RECEIVER,
        category: DiagnosticCategory::Error,
        message: "Identifier '{0}' is not defined. '{1}' does not contain such a member",
    };
    pub const IDENTIFIER_IS_PRIVATE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::IDENTIFIER_IS_PRIVATE,
        category: DiagnosticCategory::Warning,
        message: "Identifier '{0}' refers to a private member of {1}",
    };
    pub const CALLABLE_EXPRESSION_EXPECTED_METHOD_CALL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CALLABLE_EXPRESSION_EXPECTED_METHOD_CALL,
        category: DiagnosticCategory::Error,
        message: "Unexpected callable expression. Expected a method call",
    };
    pub const CALL_TARGET_NOT_CALLABLE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CALL_TARGET_NOT_CALLABLE,
        category: DiagnosticCategory::Error,
        message: "Call target is not callable",
    };
    pub const TEMPLATE_CONTEXT_MISSING_MEMBER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TEMPLATE_CONTEXT_MISSING_MEMBER,
        category: DiagnosticCategory::Error,
        message: "The template context of '{0}' does not define {1}.",
    };
}

/// All message definitions, for lookup by code.
pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::UNEXPECTED_TOKEN,
    diagnostic_messages::MISSING_EXPECTED,
    diagnostic_messages::IDENTIFIER_EXPECTED,
    diagnostic_messages::UNEXPECTED_END_OF_EXPRESSION,
    diagnostic_messages::UNTERMINATED_QUOTE,
    diagnostic_messages::INVALID_CHARACTER,
    diagnostic_messages::INVALID_EXPONENT,
    diagnostic_messages::BINDINGS_CANNOT_CONTAIN_ASSIGNMENTS,
    diagnostic_messages::PIPE_IN_ACTION_EXPRESSION,
    diagnostic_messages::INTERPOLATION_IN_EXPRESSION,
    diagnostic_messages::BLANK_INTERPOLATION,
    diagnostic_messages::UNTERMINATED_INTERPOLATION,
    diagnostic_messages::EXPRESSION_TOO_DEEP,
    diagnostic_messages::CHAINED_EXPRESSION_IN_BINDING,
    diagnostic_messages::SAFE_NAVIGATION_IN_ASSIGNMENT,
    diagnostic_messages::EXPRESSION_MIGHT_BE_NULL,
    diagnostic_messages::EXPECTED_A_NUMBER_TYPE,
    diagnostic_messages::EXPECTED_A_STRING_OR_NUMBER_TYPE,
    diagnostic_messages::EXPECTED_OPERANDS_OF_SIMILAR_TYPE_OR_ANY,
    diagnostic_messages::UNRECOGNIZED_OPERATOR,
    diagnostic_messages::NO_PIPE_FOUND,
    diagnostic_messages::UNABLE_TO_RESOLVE_COMPATIBLE_CALL_SIGNATURE,
    diagnostic_messages::UNABLE_TO_RESOLVE_SIGNATURE,
    diagnostic_messages::COULD_NOT_RESOLVE_TYPE,
    diagnostic_messages::IDENTIFIER_NOT_CALLABLE,
    diagnostic_messages::IDENTIFIER_POSSIBLY_UNDEFINED,
    diagnostic_messages::IDENTIFIER_NOT_DEFINED_IN_APP_CONTEXT,
    diagnostic_messages::IDENTIFIER_NOT_DEFINED_ON_RECEIVER,
    diagnostic_messages::IDENTIFIER_IS_PRIVATE,
    diagnostic_messages::CALLABLE_EXPRESSION_EXPECTED_METHOD_CALL,
    diagnostic_messages::CALL_TARGET_NOT_CALLABLE,
    diagnostic_messages::TEMPLATE_CONTEXT_MISSING_MEMBER,
];
