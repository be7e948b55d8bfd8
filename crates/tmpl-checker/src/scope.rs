//! Scope construction.
//!
//! The names visible at a point of a template are, lowest precedence first:
//!
//! 1. globals (`$any`) and the component's members,
//! 2. variables of every embedded template on the path (inner wins),
//! 3. element references (template-wide),
//! 4. `$event` inside an event handler.

use crate::expr::ExpressionChecker;
use crate::query::AnalysisSession;
use crate::symbols::{DeclaredSymbol, Definition, SymbolKind, SymbolRef, SymbolTableRef};
use once_cell::unsync::OnceCell;
use std::sync::Arc;
use tmpl_common::span::Span;
use tmpl_parser::IMPLICIT_CONTEXT_MEMBER;
use tmpl_parser::template::{
    DirectiveMatch, EmbeddedTemplate, NodeRef, TemplateNode, TemplatePath, Variable, walk_template,
};
use tracing::{debug, instrument, trace};

/// Name of the event payload variable.
pub const EVENT_VARIABLE: &str = "$event";

/// A template and the component it belongs to.
#[derive(Clone, Debug)]
pub struct TemplateInfo {
    /// File holding the template (the component file for inline templates).
    pub file_name: String,
    /// Offset of the template text within `file_name`.
    pub offset: u32,
    /// Members of the component class.
    pub members: SymbolTableRef,
    pub nodes: Vec<TemplateNode>,
}

impl TemplateInfo {
    #[must_use]
    pub fn new(file_name: impl Into<String>, members: SymbolTableRef, nodes: Vec<TemplateNode>) -> Self {
        Self {
            file_name: file_name.into(),
            offset: 0,
            members,
            nodes,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// A definition location for a span in template coordinates.
    #[must_use]
    pub fn definition(&self, span: Span) -> Definition {
        Definition {
            file_name: self.file_name.clone(),
            span: span.offset(self.offset),
        }
    }
}

// =============================================================================
// Variable refinement
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Refined {
    /// Element type of the input's array type.
    ElementType,
    /// The input's own type.
    InputType,
}

/// Fallback typing for variables whose context member is untyped.
struct Refinement {
    /// Context member the variable reads.
    source: &'static str,
    directives: &'static [&'static str],
    input: &'static str,
    result: Refined,
}

const REFINEMENTS: &[Refinement] = &[
    Refinement {
        source: IMPLICIT_CONTEXT_MEMBER,
        directives: &["NgFor", "NgForOf"],
        input: "ngForOf",
        result: Refined::ElementType,
    },
    Refinement {
        source: "ngIf",
        directives: &["NgIf"],
        input: "ngIf",
        result: Refined::InputType,
    },
];

// =============================================================================
// ScopeBuilder
// =============================================================================

/// Builds scopes for positions in one template.
pub struct ScopeBuilder<'a> {
    session: &'a AnalysisSession,
    info: &'a TemplateInfo,
    base: OnceCell<SymbolTableRef>,
    references: OnceCell<SymbolTableRef>,
}

impl<'a> ScopeBuilder<'a> {
    #[must_use]
    pub fn new(session: &'a AnalysisSession, info: &'a TemplateInfo) -> Self {
        Self {
            session,
            info,
            base: OnceCell::new(),
            references: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &'a AnalysisSession {
        self.session
    }

    #[must_use]
    pub fn info(&self) -> &'a TemplateInfo {
        self.info
    }

    /// Globals plus component members.
    #[must_use]
    pub fn base_scope(&self) -> SymbolTableRef {
        Arc::clone(self.base.get_or_init(|| {
            self.session
                .merge_tables(&[self.session.globals(), Arc::clone(&self.info.members)])
        }))
    }

    /// Scope at the tail of `path`.
    #[instrument(level = "debug", skip_all, fields(position = path.position()))]
    pub fn scope_at(&self, path: &TemplatePath<'_>) -> SymbolTableRef {
        let mut tables = vec![self.base_scope(), self.variables(path), self.references()];
        if let Some(event) = self.event_symbol(path) {
            tables.push(self.session.create_table(vec![event]));
        }
        let scope = self.session.merge_tables(&tables);
        debug!(size = scope.size(), "scope built");
        scope
    }

    /// References declared anywhere in the template.
    #[must_use]
    pub fn references(&self) -> SymbolTableRef {
        Arc::clone(self.references.get_or_init(|| {
            let mut symbols = Vec::new();
            walk_template(&self.info.nodes, &mut |path| {
                let Some(NodeRef::Reference(reference)) = path.tail() else {
                    return;
                };
                let ty = self
                    .reference_type(path.nearest_directives(), &reference.value)
                    .unwrap_or_else(|| self.session.any_type());
                trace!(name = %reference.name, "reference");
                symbols.push(
                    DeclaredSymbol::new(&reference.name, SymbolKind::Reference, ty)
                        .with_definition(Some(vec![self.info.definition(reference.span)]))
                        .into_ref(),
                );
            });
            self.session.create_table(symbols)
        }))
    }

    /// Type of a reference: the directive exported as `value`, or the
    /// component when no value is given.
    fn reference_type(&self, directives: &[DirectiveMatch], value: &str) -> Option<SymbolRef> {
        let directive = if value.is_empty() {
            directives.iter().find(|d| d.is_component)
        } else {
            directives.iter().find(|d| d.exports(value))
        }?;
        self.session.type_symbol(&directive.type_ref)
    }

    /// Variables of every embedded template on the path, root first.
    #[must_use]
    pub fn variables(&self, path: &TemplatePath<'_>) -> SymbolTableRef {
        let mut found: Vec<SymbolRef> = Vec::new();
        for template in path.templates() {
            for variable in &template.variables {
                let ty = self.variable_type(template, variable, &found);
                found.push(
                    DeclaredSymbol::new(&variable.name, SymbolKind::Variable, ty)
                        .with_definition(Some(vec![self.info.definition(variable.span)]))
                        .into_ref(),
                );
            }
        }
        self.session.create_table(found)
    }

    fn variable_type(&self, template: &EmbeddedTemplate, variable: &Variable, found: &[SymbolRef]) -> SymbolRef {
        let from_context = template.directives.iter().find_map(|directive| {
            self.session
                .template_context(&directive.type_ref)
                .and_then(|context| context.get(&variable.value))
                .and_then(|member| member.ty())
        });
        let ty = from_context.unwrap_or_else(|| self.session.any_type());
        if !self.session.type_kind(&ty).is_any_like() {
            return ty;
        }
        self.refine(template, variable, found).unwrap_or(ty)
    }

    fn refine(&self, template: &EmbeddedTemplate, variable: &Variable, found: &[SymbolRef]) -> Option<SymbolRef> {
        let rule = REFINEMENTS.iter().find(|rule| {
            rule.source == variable.value
                && template
                    .directives
                    .iter()
                    .any(|d| rule.directives.contains(&d.type_ref.name.as_str()))
        })?;
        let input = template.input(rule.input)?;
        let scope = self.session.merge_tables(&[
            self.base_scope(),
            self.session.create_table(found.to_vec()),
        ]);
        let checker = ExpressionChecker::new(self.session, scope, &input.value.arena);
        let input_type = checker.type_of(input.value.root);
        trace!(variable = %variable.name, input = rule.input, "refine variable");
        match rule.result {
            Refined::ElementType => self.session.element_type(&input_type),
            Refined::InputType => Some(input_type),
        }
    }

    /// `$event` when the path ends in an event binding.
    #[must_use]
    pub fn event_symbol(&self, path: &TemplatePath<'_>) -> Option<SymbolRef> {
        let Some(NodeRef::Event(event)) = path.tail() else {
            return None;
        };
        let ty = self
            .event_payload(path.nearest_directives(), &event.name)
            .unwrap_or_else(|| self.session.any_type());
        Some(DeclaredSymbol::new(EVENT_VARIABLE, SymbolKind::Variable, ty).into_ref())
    }

    /// The single type argument of the output an event binds to.
    fn event_payload(&self, directives: &[DirectiveMatch], event: &str) -> Option<SymbolRef> {
        let (directive, field) = directives
            .iter()
            .find_map(|d| d.output_field(event).map(|field| (d, field)))?;
        let member = self.session.type_symbol(&directive.type_ref)?.members().get(field)?;
        let arguments = member
            .type_arguments()
            .or_else(|| member.ty().and_then(|ty| ty.type_arguments()))?;
        match arguments.as_slice() {
            [single] => Some(Arc::clone(single)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
