//! Symbol model.
//!
//! Everything the engine knows about values and types flows through the
//! [`Symbol`] trait. Hosts implement it for their own types, members and
//! pipes; the engine adds a few symbols of its own:
//!
//! - [`DeclaredSymbol`] - template variables, references and `$event`
//! - [`OverrideKindSymbol`] - a host symbol shown under a different kind
//! - [`ImplicitReceiverSymbol`] - the receiver of unqualified names
//! - the global `$any` cast (see [`global`])
//!
//! Symbols are shared as [`SymbolRef`] (`Arc<dyn Symbol>`), so they are
//! cheap to clone and may cross threads.

mod declared;
pub mod global;
mod table;

pub use declared::{DeclaredSymbol, ImplicitReceiverSymbol, OverrideKindSymbol};
pub use table::{EMPTY_TABLE, EmptySymbolTable, ListSymbolTable, MapSymbolTable, empty_table};

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tmpl_common::span::Span;
use tmpl_parser::ast::LiteralValue;

pub type SymbolRef = Arc<dyn Symbol>;
pub type SymbolTableRef = Arc<dyn SymbolTable>;

/// What a symbol is, for display and completion icons.
///
/// The checker never branches on kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Method,
    Property,
    Variable,
    Reference,
    Pipe,
    Component,
    Directive,
    Event,
    Type,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Variable => "variable",
            Self::Reference => "reference",
            Self::Pipe => "pipe",
            Self::Component => "component",
            Self::Directive => "directive",
            Self::Event => "event",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    /// Absorbing: anything combined with `Any` is silently `Any`.
    Any,
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    /// Any other type (classes, arrays, functions).
    Other,
    /// An unresolved type parameter. Suppresses errors like `Any`.
    Unbound,
}

impl BuiltinType {
    pub const COUNT: usize = 8;

    pub const ALL: [BuiltinType; Self::COUNT] = [
        Self::Any,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Null,
        Self::Undefined,
        Self::Other,
        Self::Unbound,
    ];

    /// Position in [`BuiltinType::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `Any` or `Unbound`.
    #[must_use]
    pub const fn is_any_like(self) -> bool {
        matches!(self, Self::Any | Self::Unbound)
    }

    #[must_use]
    pub const fn is_null_like(self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }
}

/// A source location of a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub file_name: String,
    pub span: Span,
}

/// A call signature.
#[derive(Clone, Debug)]
pub struct Signature {
    /// Parameters by name.
    pub arguments: SymbolTableRef,
    pub result: SymbolRef,
}

/// A named value or type.
///
/// Implementations must keep `members()` idempotent and free of side
/// effects; callers may invoke it repeatedly while typing one expression.
pub trait Symbol: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Text shown for this symbol as a type, with its type arguments.
    fn display_name(&self) -> String {
        self.name().to_string()
    }

    fn kind(&self) -> SymbolKind;

    /// Type of a value symbol; `None` for type symbols.
    fn ty(&self) -> Option<SymbolRef>;

    /// Enclosing declared type, for display.
    fn container(&self) -> Option<SymbolRef> {
        None
    }

    fn is_public(&self) -> bool {
        true
    }

    fn is_callable(&self) -> bool {
        false
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn definition(&self) -> Option<Vec<Definition>> {
        None
    }

    fn documentation(&self) -> Option<String> {
        None
    }

    fn members(&self) -> SymbolTableRef;

    fn signatures(&self) -> Vec<Signature> {
        Vec::new()
    }

    /// Pick a signature for the given argument types.
    fn select_signature(&self, _args: &[SymbolRef]) -> Option<Signature> {
        None
    }

    /// Type of `self[key]`; `literal` is the key's value when it is a literal.
    fn indexed(&self, _key: &SymbolRef, _literal: Option<&LiteralValue>) -> Option<SymbolRef> {
        None
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        None
    }

    /// Downcasting hook for hosts that need their own representation back.
    fn as_any(&self) -> &dyn Any;
}

/// Name to symbol mapping. Names are unique.
pub trait SymbolTable: fmt::Debug + Send + Sync {
    fn size(&self) -> usize;

    fn get(&self, name: &str) -> Option<SymbolRef>;

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn values(&self) -> Vec<SymbolRef>;
}

#[cfg(test)]
#[path = "../../tests/symbols_tests.rs"]
mod tests;
