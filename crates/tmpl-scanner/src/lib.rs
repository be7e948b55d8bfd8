//! Tokenizer for the tmpl template expression language.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `Token` / `TokenValue` - Scanned tokens with spans
//! - `ScannerState` - Tokenizer state machine

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod scanner;
pub use scanner::{ScannerState, Token, TokenValue, tokenize};
