//! Diagnostic types and message lookup.
//!
//! Message data lives in `data.rs`: every diagnostic the engine can report
//! has a stable numeric code, a category and a template with `{0}`, `{1}`, ...
//! placeholders filled by [`format_message`].
//!
//! Parse errors use the `1xxx` range and expression type errors the `2xxx`
//! range.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category (severity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Suggestion => "suggestion",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A chained message: a primary text followed by nested explanations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChain {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<MessageChain>,
}

impl MessageChain {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next: Vec::new(),
        }
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        if depth > 0 {
            out.push('\n');
            for _ in 0..depth {
                out.push_str("  ");
            }
        }
        out.push_str(&self.text);
        for next in &self.next {
            next.render_into(depth + 1, out);
        }
    }
}

/// Message of a diagnostic: either plain text or a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticText {
    Plain(String),
    Chain(MessageChain),
}

impl DiagnosticText {
    /// The primary (first-line) text.
    #[must_use]
    pub fn primary(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Chain(chain) => &chain.text,
        }
    }

    /// Flatten the message, indenting each nested explanation by its depth.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Chain(chain) => {
                let mut out = String::new();
                chain.render_into(0, &mut out);
                out
            }
        }
    }
}

/// A diagnostic anchored at a span.
///
/// Spans produced by the expression checker are relative to the expression
/// text; template-level producers shift them with [`Diagnostic::offset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message: DiagnosticText,
}

impl Diagnostic {
    /// Create a diagnostic from a message definition and its arguments.
    #[must_use]
    pub fn new(span: Span, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            category: message.category,
            code: message.code,
            message: DiagnosticText::Plain(format_message(message.message, args)),
        }
    }

    /// Create an error diagnostic with free-form text.
    #[must_use]
    pub fn error(span: Span, code: u32, text: impl Into<String>) -> Self {
        Self {
            span,
            category: DiagnosticCategory::Error,
            code,
            message: DiagnosticText::Plain(text.into()),
        }
    }

    /// Append a nested explanation, turning the message into a chain.
    #[must_use]
    pub fn with_next(mut self, text: impl Into<String>) -> Self {
        let next = MessageChain::new(text);
        self.message = match self.message {
            DiagnosticText::Plain(primary) => DiagnosticText::Chain(MessageChain {
                text: primary,
                next: vec![next],
            }),
            DiagnosticText::Chain(mut chain) => {
                chain.next.push(next);
                DiagnosticText::Chain(chain)
            }
        };
        self
    }

    /// Shift the span by `base` bytes.
    #[must_use]
    pub fn offset(mut self, base: u32) -> Self {
        self.span = self.span.offset(base);
        self
    }

    #[must_use]
    pub fn message_text(&self) -> &str {
        self.message.primary()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
