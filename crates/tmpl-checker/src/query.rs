//! Boundary to the host type system.
//!
//! [`SymbolQuery`] is the whole contract the engine needs from a host.
//! [`AnalysisSession`] wraps a query with the per-session caches (builtin
//! types, pipes, globals); hosts call [`AnalysisSession::invalidate`] when
//! their program snapshot changes.

use crate::symbols::global::create_global_symbol_table;
use crate::symbols::{BuiltinType, ListSymbolTable, MapSymbolTable, SymbolRef, SymbolTableRef};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tmpl_parser::template::TypeReference;
use tracing::debug;

/// Queries the engine issues against the host type system.
pub trait SymbolQuery: Send + Sync {
    /// Classify a type. Value symbols are classified by their type.
    fn get_type_kind(&self, symbol: &SymbolRef) -> BuiltinType;

    fn get_builtin_type(&self, kind: BuiltinType) -> SymbolRef;

    /// Common type of `types` when they are all the same type, else `any`.
    fn get_type_union(&self, types: &[SymbolRef]) -> SymbolRef;

    fn get_array_type(&self, element: &SymbolRef) -> SymbolRef;

    fn get_element_type(&self, array: &SymbolRef) -> Option<SymbolRef>;

    /// Strip `null`/`undefined`; a no-op on non-nullable types.
    fn get_non_nullable_type(&self, symbol: &SymbolRef) -> SymbolRef;

    fn get_pipes(&self) -> SymbolTableRef;

    /// Members available inside an embedded template controlled by a directive.
    fn get_template_context(&self, type_ref: &TypeReference) -> Option<SymbolTableRef>;

    fn get_type_symbol(&self, type_ref: &TypeReference) -> Option<SymbolRef>;

    fn create_symbol_table(&self, symbols: Vec<SymbolRef>) -> SymbolTableRef {
        Arc::new(ListSymbolTable::new(symbols))
    }

    /// Merge tables in order; later tables win on name clashes.
    fn merge_symbol_table(&self, tables: &[SymbolTableRef]) -> SymbolTableRef {
        Arc::new(MapSymbolTable::merged(tables))
    }
}

/// A host query plus the caches valid for one host snapshot.
///
/// Queries take `&self` and may run concurrently; [`invalidate`](Self::invalidate)
/// takes `&mut self`, so it cannot overlap a query borrowing the session.
pub struct AnalysisSession {
    query: Arc<dyn SymbolQuery>,
    builtins: [OnceCell<SymbolRef>; BuiltinType::COUNT],
    pipes: OnceCell<SymbolTableRef>,
    globals: OnceCell<SymbolTableRef>,
}

impl fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("pipes_cached", &self.pipes.get().is_some())
            .finish_non_exhaustive()
    }
}

impl AnalysisSession {
    #[must_use]
    pub fn new(query: Arc<dyn SymbolQuery>) -> Self {
        Self {
            query,
            builtins: Default::default(),
            pipes: OnceCell::new(),
            globals: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &dyn SymbolQuery {
        self.query.as_ref()
    }

    /// Drop every cached value; call after the host snapshot changed.
    pub fn invalidate(&mut self) {
        debug!("invalidate analysis session caches");
        for cell in &mut self.builtins {
            cell.take();
        }
        self.pipes.take();
        self.globals.take();
    }

    /// Builtin type symbol, identical for every call within the session.
    #[must_use]
    pub fn builtin(&self, kind: BuiltinType) -> SymbolRef {
        Arc::clone(
            self.builtins[kind.index()].get_or_init(|| self.query.get_builtin_type(kind)),
        )
    }

    #[must_use]
    pub fn any_type(&self) -> SymbolRef {
        self.builtin(BuiltinType::Any)
    }

    #[must_use]
    pub fn pipes(&self) -> SymbolTableRef {
        Arc::clone(self.pipes.get_or_init(|| self.query.get_pipes()))
    }

    /// Symbols visible in every template (`$any`).
    #[must_use]
    pub fn globals(&self) -> SymbolTableRef {
        Arc::clone(
            self.globals
                .get_or_init(|| create_global_symbol_table(self.query.as_ref())),
        )
    }

    #[must_use]
    pub fn type_kind(&self, symbol: &SymbolRef) -> BuiltinType {
        self.query.get_type_kind(symbol)
    }

    #[must_use]
    pub fn union(&self, types: &[SymbolRef]) -> SymbolRef {
        self.query.get_type_union(types)
    }

    #[must_use]
    pub fn array_of(&self, element: &SymbolRef) -> SymbolRef {
        self.query.get_array_type(element)
    }

    #[must_use]
    pub fn element_type(&self, array: &SymbolRef) -> Option<SymbolRef> {
        self.query.get_element_type(array)
    }

    #[must_use]
    pub fn non_nullable(&self, symbol: &SymbolRef) -> SymbolRef {
        self.query.get_non_nullable_type(symbol)
    }

    #[must_use]
    pub fn template_context(&self, type_ref: &TypeReference) -> Option<SymbolTableRef> {
        self.query.get_template_context(type_ref)
    }

    #[must_use]
    pub fn type_symbol(&self, type_ref: &TypeReference) -> Option<SymbolRef> {
        self.query.get_type_symbol(type_ref)
    }

    #[must_use]
    pub fn create_table(&self, symbols: Vec<SymbolRef>) -> SymbolTableRef {
        self.query.create_symbol_table(symbols)
    }

    #[must_use]
    pub fn merge_tables(&self, tables: &[SymbolTableRef]) -> SymbolTableRef {
        self.query.merge_symbol_table(tables)
    }
}

#[cfg(test)]
#[path = "../tests/query_tests.rs"]
mod tests;
