//! Type inference, scope resolution and editor queries for template
//! expressions.
//!
//! The engine lives in the workspace crates, re-exported here:
//! - `common` - Spans, line maps, diagnostics
//! - `parser` - Expression and microsyntax parsers, template tree model
//! - `checker` - Symbol model, scopes and the expression type checker
//! - `host` - A declarative host program implementing the symbol query
//! - `lsp` - Completions, symbol location, hover and definitions
//!
//! This crate adds what the `tmpl` binary needs on top: project files
//! ([`project::Project`]), diagnostic rendering and tracing setup.

pub use tmpl_checker as checker;
pub use tmpl_common as common;
pub use tmpl_host as host;
pub use tmpl_lsp as lsp;
pub use tmpl_parser as parser;
pub use tmpl_scanner as scanner;

pub mod project;
pub use project::{Project, ProjectFile, TemplateReport};

pub mod reporter;
pub use reporter::Reporter;

pub mod tracing_config;
