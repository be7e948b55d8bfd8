//! Symbol table implementations.

use super::{SymbolRef, SymbolTable, SymbolTableRef};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::Arc;

/// A table with no entries.
#[derive(Debug, Default)]
pub struct EmptySymbolTable;

impl SymbolTable for EmptySymbolTable {
    fn size(&self) -> usize {
        0
    }

    fn get(&self, _name: &str) -> Option<SymbolRef> {
        None
    }

    fn has(&self, _name: &str) -> bool {
        false
    }

    fn values(&self) -> Vec<SymbolRef> {
        Vec::new()
    }
}

pub static EMPTY_TABLE: Lazy<SymbolTableRef> = Lazy::new(|| Arc::new(EmptySymbolTable));

/// Shared empty table.
#[must_use]
pub fn empty_table() -> SymbolTableRef {
    Arc::clone(&EMPTY_TABLE)
}

/// Immutable table over a list of symbols, as supplied by a host.
///
/// A name listed twice keeps the slot of its first appearance and the
/// symbol of its last.
#[derive(Debug, Default)]
pub struct ListSymbolTable {
    symbols: Vec<SymbolRef>,
    index: FxHashMap<String, usize>,
}

impl ListSymbolTable {
    #[must_use]
    pub fn new(symbols: impl IntoIterator<Item = SymbolRef>) -> Self {
        let mut table = Self::default();
        for symbol in symbols {
            match table.index.get(symbol.name()) {
                Some(&slot) => table.symbols[slot] = symbol,
                None => {
                    table
                        .index
                        .insert(symbol.name().to_string(), table.symbols.len());
                    table.symbols.push(symbol);
                }
            }
        }
        table
    }
}

impl SymbolTable for ListSymbolTable {
    fn size(&self) -> usize {
        self.symbols.len()
    }

    fn get(&self, name: &str) -> Option<SymbolRef> {
        self.index.get(name).map(|&slot| Arc::clone(&self.symbols[slot]))
    }

    fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn values(&self) -> Vec<SymbolRef> {
        self.symbols.clone()
    }
}

/// Accumulating table used to merge scopes.
///
/// Adding a name that is already present replaces the symbol in its
/// original slot, so `values()` keeps first-insertion order.
#[derive(Debug, Default)]
pub struct MapSymbolTable {
    map: IndexMap<String, SymbolRef, FxBuildHasher>,
}

impl MapSymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: SymbolRef) {
        // `IndexMap::insert` keeps the slot of an existing key.
        self.map.insert(symbol.name().to_string(), symbol);
    }

    pub fn add_all(&mut self, symbols: impl IntoIterator<Item = SymbolRef>) {
        for symbol in symbols {
            self.add(symbol);
        }
    }

    /// Merge `tables` in order; later tables win on name clashes.
    #[must_use]
    pub fn merged(tables: &[SymbolTableRef]) -> Self {
        let mut result = Self::new();
        for table in tables {
            result.add_all(table.values());
        }
        result
    }
}

impl SymbolTable for MapSymbolTable {
    fn size(&self) -> usize {
        self.map.len()
    }

    fn get(&self, name: &str) -> Option<SymbolRef> {
        self.map.get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    fn values(&self) -> Vec<SymbolRef> {
        self.map.values().cloned().collect()
    }
}
