//! Symbol model, scopes and expression type checking for the tmpl engine.
//!
//! This crate provides:
//! - `symbols` - The `Symbol`/`SymbolTable` traits, builtin type tags and
//!   the engine's own symbols (declared names, implicit receiver, `$any`)
//! - `query` - The `SymbolQuery` boundary to the host type system and the
//!   per-session caches in `AnalysisSession`
//! - `scope` - Names visible at a template position
//! - `expr` - Bottom-up expression typing with diagnostics
//! - `template_diagnostics` - Checking every expression of a template

pub mod symbols;
pub use symbols::{
    BuiltinType, DeclaredSymbol, Definition, ImplicitReceiverSymbol, ListSymbolTable,
    MapSymbolTable, OverrideKindSymbol, Signature, Symbol, SymbolKind, SymbolRef, SymbolTable,
    SymbolTableRef, empty_table,
};

pub mod query;
pub use query::{AnalysisSession, SymbolQuery};

pub mod options;
pub use options::CheckerOptions;

pub mod expr;
pub use expr::{ExpressionChecker, Typed};

pub mod scope;
pub use scope::{EVENT_VARIABLE, ScopeBuilder, TemplateInfo};

pub mod template_diagnostics;
pub use template_diagnostics::{check_expression, parse_errors, template_diagnostics};

#[cfg(test)]
#[path = "../tests/support/fixture_query.rs"]
pub(crate) mod fixture_query;
