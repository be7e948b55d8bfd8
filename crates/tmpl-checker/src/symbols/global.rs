//! Symbols visible in every template.

use super::declared::FunctionSymbol;
use super::{BuiltinType, DeclaredSymbol, ListSymbolTable, SymbolKind, SymbolRef, SymbolTableRef};
use crate::query::SymbolQuery;
use std::sync::Arc;

/// Name of the cast-to-any function.
pub const ANY_CAST: &str = "$any";

/// Build the global table: `$any(value)` casts its argument to `any`.
#[must_use]
pub fn create_global_symbol_table(query: &dyn SymbolQuery) -> SymbolTableRef {
    let function: SymbolRef = Arc::new(FunctionSymbol {
        name: ANY_CAST,
        documentation: "function to cast an expression to the `any` type",
        arity: 1,
        result: query.get_builtin_type(BuiltinType::Any),
    });
    let any_cast = DeclaredSymbol::new(ANY_CAST, SymbolKind::Method, function).into_ref();
    Arc::new(ListSymbolTable::new([any_cast]))
}
