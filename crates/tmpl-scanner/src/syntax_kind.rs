//! Token kinds.

use serde::Serialize;

/// Kind of a scanned token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxKind {
    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    OpenBraceToken,
    CloseBraceToken,
    CommaToken,
    ColonToken,
    SemicolonToken,
    DotToken,
    QuestionDotToken,
    QuestionToken,
    ExclamationToken,
    HashToken,

    // Operators
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    CaretToken,
    AmpersandToken,
    BarToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionQuestionToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    EqualsToken,

    // Literals and names
    Identifier,
    StringLiteral,
    NumericLiteral,

    // Keywords
    LetKeyword,
    AsKeyword,
    NullKeyword,
    UndefinedKeyword,
    TrueKeyword,
    FalseKeyword,
    ThisKeyword,

    /// A character or sequence the scanner could not make sense of.
    Unknown,
    EndOfFileToken,
}

impl SyntaxKind {
    /// Keyword kind for `text`, if it is a reserved word.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        Some(match text {
            "let" => Self::LetKeyword,
            "as" => Self::AsKeyword,
            "null" => Self::NullKeyword,
            "undefined" => Self::UndefinedKeyword,
            "true" => Self::TrueKeyword,
            "false" => Self::FalseKeyword,
            "this" => Self::ThisKeyword,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::LetKeyword
                | Self::AsKeyword
                | Self::NullKeyword
                | Self::UndefinedKeyword
                | Self::TrueKeyword
                | Self::FalseKeyword
                | Self::ThisKeyword
        )
    }

    /// Identifiers and keywords may both name a property (`a.let` is legal).
    #[must_use]
    pub const fn is_identifier_or_keyword(self) -> bool {
        matches!(self, Self::Identifier) || self.is_keyword()
    }

    /// Source text of fixed tokens; `None` for names, literals and markers.
    #[must_use]
    pub const fn text(self) -> Option<&'static str> {
        Some(match self {
            Self::OpenParenToken => "(",
            Self::CloseParenToken => ")",
            Self::OpenBracketToken => "[",
            Self::CloseBracketToken => "]",
            Self::OpenBraceToken => "{",
            Self::CloseBraceToken => "}",
            Self::CommaToken => ",",
            Self::ColonToken => ":",
            Self::SemicolonToken => ";",
            Self::DotToken => ".",
            Self::QuestionDotToken => "?.",
            Self::QuestionToken => "?",
            Self::ExclamationToken => "!",
            Self::HashToken => "#",
            Self::PlusToken => "+",
            Self::MinusToken => "-",
            Self::AsteriskToken => "*",
            Self::SlashToken => "/",
            Self::PercentToken => "%",
            Self::CaretToken => "^",
            Self::AmpersandToken => "&",
            Self::BarToken => "|",
            Self::LessThanToken => "<",
            Self::GreaterThanToken => ">",
            Self::LessThanEqualsToken => "<=",
            Self::GreaterThanEqualsToken => ">=",
            Self::EqualsEqualsToken => "==",
            Self::ExclamationEqualsToken => "!=",
            Self::EqualsEqualsEqualsToken => "===",
            Self::ExclamationEqualsEqualsToken => "!==",
            Self::AmpersandAmpersandToken => "&&",
            Self::BarBarToken => "||",
            Self::QuestionQuestionToken => "??",
            Self::LessThanLessThanToken => "<<",
            Self::GreaterThanGreaterThanToken => ">>",
            Self::GreaterThanGreaterThanGreaterThanToken => ">>>",
            Self::EqualsToken => "=",
            Self::LetKeyword => "let",
            Self::AsKeyword => "as",
            Self::NullKeyword => "null",
            Self::UndefinedKeyword => "undefined",
            Self::TrueKeyword => "true",
            Self::FalseKeyword => "false",
            Self::ThisKeyword => "this",
            Self::Identifier
            | Self::StringLiteral
            | Self::NumericLiteral
            | Self::Unknown
            | Self::EndOfFileToken => return None,
        })
    }
}
