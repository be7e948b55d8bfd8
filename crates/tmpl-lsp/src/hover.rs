//! Quick info for the symbol under the cursor.

use crate::locate::LocatedSymbol;
use serde::Serialize;
use std::fmt::Write as _;
use tmpl_checker::SymbolKind;
use tmpl_common::span::Span;

/// Information returned for a hover request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    pub kind: SymbolKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl HoverInfo {
    #[must_use]
    pub fn from_located(located: &LocatedSymbol) -> Self {
        let symbol = &located.symbol;
        Self {
            kind: symbol.kind(),
            name: symbol.name().to_string(),
            container: symbol.container().map(|c| c.name().to_string()),
            type_name: symbol.ty().map(|ty| ty.display_name()),
            span: located.span,
            documentation: symbol.documentation(),
        }
    }

    /// `(kind) Container.name: Type`
    #[must_use]
    pub fn display(&self) -> String {
        let mut text = format!("({}) ", self.kind);
        if let Some(container) = &self.container {
            let _ = write!(text, "{container}.");
        }
        text.push_str(&self.name);
        if let Some(type_name) = &self.type_name {
            let _ = write!(text, ": {type_name}");
        }
        text
    }

    /// `display()` followed by the documentation, as markdown.
    #[must_use]
    pub fn markdown(&self) -> String {
        let mut text = format!("```\n{}\n```", self.display());
        if let Some(docs) = &self.documentation {
            let _ = write!(text, "\n\n{docs}");
        }
        text
    }
}

#[cfg(test)]
#[path = "../tests/hover_tests.rs"]
mod tests;
