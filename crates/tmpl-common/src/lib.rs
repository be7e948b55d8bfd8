//! Common types and utilities for the tmpl template analysis engine.
//!
//! This crate provides foundational types used across all tmpl crates:
//! - Source spans (`Span`) in byte offsets
//! - Line/column mapping (`LineMap`, `Position`)
//! - Identifier character classes shared by the scanner and the completion engine
//! - Diagnostics (message table, codes, chained messages)
//! - Analysis limits

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Identifier character classification
pub mod chars;

// Centralized limits and thresholds
pub mod limits;

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticText, MessageChain,
    diagnostic_codes, diagnostic_messages, format_message,
};
