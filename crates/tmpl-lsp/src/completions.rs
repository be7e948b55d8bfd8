//! Completions.
//!
//! The template path at the cursor decides what is completed:
//!
//! - expression values (bound text, property bindings, event handlers,
//!   plain attribute values): names visible at that point of the expression
//! - `#ref="..."` values: the `exportAs` names of the element's directives
//! - `let-x="..."` values and `let x = ...` in microsyntax: members of the
//!   template context
//! - other microsyntax positions: expression completions in the template's
//!   scope
//!
//! Markup completions (element and attribute names) are not offered.

use crate::document::TemplateDocument;
use crate::expressions::expression_completions;
use crate::options::ServiceOptions;
use crate::word::bounded_word_span;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tmpl_checker::{
    AnalysisSession, ExpressionChecker, ScopeBuilder, SymbolKind, SymbolRef, SymbolTableRef,
};
use tmpl_common::span::Span;
use tmpl_parser::ast::{ExprArena, ExprId, ParsedExpression};
use tmpl_parser::parse_binding;
use tmpl_parser::template::{EmbeddedTemplate, NodeRef, TemplatePath, TextAttribute};
use tracing::{debug, trace};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub sort_text: String,
    /// Text to insert when it differs from `name` (`select()` for methods).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completions {
    pub entries: Vec<CompletionEntry>,
    /// The word under the cursor, which an accepted entry replaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement_span: Option<Span>,
}

impl Completions {
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CompletionEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Collects entries; the first entry with a given name wins.
struct CompletionCollector<'o> {
    options: &'o ServiceOptions,
    seen: FxHashSet<String>,
    entries: Vec<CompletionEntry>,
}

impl<'o> CompletionCollector<'o> {
    fn new(options: &'o ServiceOptions) -> Self {
        Self {
            options,
            seen: FxHashSet::default(),
            entries: Vec::new(),
        }
    }

    fn add_symbols(&mut self, symbols: &[SymbolRef]) {
        for symbol in symbols {
            let name = symbol.name();
            if self.options.is_hidden(name) {
                continue;
            }
            if !self.options.include_private && !symbol.is_public() {
                continue;
            }
            // Pipes are never called with parentheses.
            let insert_text = (symbol.is_callable() && symbol.kind() != SymbolKind::Pipe)
                .then(|| format!("{name}()"));
            self.push(name, symbol.kind(), insert_text);
        }
    }

    fn add_table(&mut self, table: &SymbolTableRef) {
        self.add_symbols(&table.values());
    }

    fn push(&mut self, name: &str, kind: SymbolKind, insert_text: Option<String>) {
        if !self.seen.insert(name.to_string()) {
            return;
        }
        self.entries.push(CompletionEntry {
            name: name.to_string(),
            kind,
            sort_text: name.to_string(),
            insert_text,
        });
    }
}

pub(crate) fn completions_at(
    session: &AnalysisSession,
    options: &ServiceOptions,
    document: &TemplateDocument,
    position: u32,
) -> Option<Completions> {
    let template_position = document.template_position(position)?;
    let path = document.path_at(template_position);
    let scopes = ScopeBuilder::new(session, &document.info);
    let mut provider = CompletionProvider {
        scopes: &scopes,
        path: &path,
        position: template_position,
        source: &document.source,
        collector: CompletionCollector::new(options),
    };
    provider.collect();
    let entries = provider.collector.entries;
    debug!(position, count = entries.len(), "completions");
    if entries.is_empty() {
        return None;
    }
    let replacement_span = bounded_word_span(&document.source, template_position)
        .map(|span| span.offset(document.info.offset));
    Some(Completions {
        entries,
        replacement_span,
    })
}

struct CompletionProvider<'a, 't, 'o> {
    scopes: &'a ScopeBuilder<'a>,
    path: &'a TemplatePath<'t>,
    /// Template coordinates.
    position: u32,
    source: &'a str,
    collector: CompletionCollector<'o>,
}

impl CompletionProvider<'_, '_, '_> {
    fn collect(&mut self) {
        let Some(tail) = self.path.tail() else {
            return;
        };
        trace!(span = ?tail.span(), "completion target");
        match tail {
            NodeRef::BoundText(text) => self.parsed_expression(&text.value),
            NodeRef::Property(attr) if attr.value_span.contains(self.position) => {
                self.parsed_expression(&attr.value);
            }
            NodeRef::Event(event) if event.handler_span.contains(self.position) => {
                self.parsed_expression(&event.handler);
            }
            NodeRef::Attribute(attr) => self.attribute_value(attr),
            NodeRef::Reference(reference) => {
                if self.after_equals(reference.span) {
                    self.export_names();
                }
            }
            NodeRef::Variable(variable) => {
                if self.after_equals(variable.span) {
                    if let Some(template) = self.path.nearest_template() {
                        self.context_members(template);
                    }
                }
            }
            NodeRef::StructuralAttribute(_) => self.microsyntax(),
            _ => {}
        }
    }

    /// Whether the cursor is past the `=` of the attribute at `span`.
    fn after_equals(&self, span: Span) -> bool {
        span.slice(self.source)
            .and_then(|text| text.find('='))
            .is_some_and(|index| self.position > span.start + index as u32)
    }

    fn parsed_expression(&mut self, parsed: &ParsedExpression) {
        let Some(relative) = parsed.relative_position(self.position) else {
            return;
        };
        self.expression(&parsed.arena, parsed.root, relative);
    }

    /// Completions inside `root`, `position` relative to the arena's source.
    fn expression(&mut self, arena: &ExprArena, root: ExprId, position: u32) {
        let scope = self.scopes.scope_at(self.path);
        let session = self.scopes.session();
        let checker = ExpressionChecker::new(session, scope, arena);
        if let Some(table) = expression_completions(session, &checker, arena, root, position) {
            self.collector.add_table(&table);
        }
    }

    /// A plain attribute value is read as a binding.
    fn attribute_value(&mut self, attr: &TextAttribute) {
        let Some(value_span) = attr.value_span else {
            return;
        };
        if !value_span.contains(self.position) {
            return;
        }
        let parsed = parse_binding(&attr.value, &attr.name, value_span.start);
        self.parsed_expression(&parsed);
    }

    fn export_names(&mut self) {
        for directive in self.path.nearest_directives() {
            for name in &directive.export_as {
                self.collector.push(name, SymbolKind::Reference, None);
            }
        }
    }

    fn context_members(&mut self, template: &EmbeddedTemplate) {
        let session = self.scopes.session();
        let context = template
            .directives
            .iter()
            .find_map(|directive| session.template_context(&directive.type_ref));
        if let Some(context) = context {
            self.collector.add_table(&context);
        }
    }

    fn microsyntax(&mut self) {
        let Some(template) = self.path.nearest_template() else {
            return;
        };
        let Some(microsyntax) = &template.microsyntax else {
            return;
        };
        let Some(relative) = self.position.checked_sub(microsyntax.base_offset) else {
            return;
        };
        let Some(binding) = microsyntax.binding_at(relative) else {
            return;
        };

        if binding.key_is_var {
            let equals = binding
                .span
                .slice(&microsyntax.source)
                .and_then(|text| text.find('='))
                .map(|index| binding.span.start + index as u32);
            if equals.is_some_and(|equals| relative > equals) {
                self.context_members(template);
            }
            return;
        }
        match (binding.value, binding.value_span) {
            (Some(value), Some(value_span)) if value_span.contains(relative) => {
                self.expression(&microsyntax.arena, value, relative);
            }
            // `let item of |`: the key is typed, its value is not.
            (None, _) if binding.key_span.is_some_and(|key| relative > key.end) => {
                let scope = self.scopes.scope_at(self.path);
                self.collector.add_table(&scope);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/completions_tests.rs"]
mod tests;
