//! Go to definition.

use crate::locate::LocatedSymbol;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tmpl_checker::Definition;
use tmpl_common::span::Span;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionInfo {
    pub definitions: Vec<Definition>,
    /// Span of the text the request was made on.
    pub bound_span: Span,
}

impl DefinitionInfo {
    /// Definitions of a located symbol, without duplicates. `None` when the
    /// symbol has no known declaration.
    #[must_use]
    pub fn from_located(located: &LocatedSymbol) -> Option<Self> {
        let mut seen = FxHashSet::default();
        let definitions: Vec<Definition> = located
            .symbol
            .definition()
            .unwrap_or_default()
            .into_iter()
            .filter(|d| seen.insert((d.file_name.clone(), d.span)))
            .collect();
        if definitions.is_empty() {
            return None;
        }
        Some(Self {
            definitions,
            bound_span: located.span,
        })
    }
}
