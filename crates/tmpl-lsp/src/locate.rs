//! Finding the symbol under the cursor.
//!
//! Expressions resolve through the checker; markup resolves through the
//! directives matched on the element: a component tag names the component,
//! an input or output key names the directive member it binds to.

use crate::document::TemplateDocument;
use crate::expressions::expression_symbol;
use tmpl_checker::{
    AnalysisSession, ExpressionChecker, OverrideKindSymbol, ScopeBuilder, SymbolKind, SymbolRef,
};
use tmpl_common::span::Span;
use tmpl_parser::ast::{ExprArena, ExprId, ParsedExpression};
use tmpl_parser::template::{
    BoundAttribute, BoundEvent, DirectiveMatch, Element, EmbeddedTemplate, NodeRef, TemplatePath, TextAttribute,
};
use tracing::{debug, instrument};

/// A symbol and the span of the text naming it, in file coordinates.
#[derive(Clone, Debug)]
pub struct LocatedSymbol {
    pub symbol: SymbolRef,
    pub span: Span,
}

#[instrument(level = "debug", skip_all, fields(file = %document.file_name(), position))]
pub(crate) fn locate_symbol_at(
    session: &AnalysisSession,
    document: &TemplateDocument,
    position: u32,
) -> Option<LocatedSymbol> {
    let template_position = document.template_position(position)?;
    let path = document.path_at(template_position);
    let scopes = ScopeBuilder::new(session, &document.info);
    let locator = SymbolLocator {
        scopes: &scopes,
        path: &path,
        position: template_position,
    };
    let (symbol, span) = locator.locate()?;
    debug!(name = symbol.name(), kind = %symbol.kind(), "located");
    Some(LocatedSymbol {
        symbol,
        span: span.offset(document.info.offset),
    })
}

/// Works in template coordinates.
struct SymbolLocator<'a, 't> {
    scopes: &'a ScopeBuilder<'a>,
    path: &'a TemplatePath<'t>,
    position: u32,
}

impl SymbolLocator<'_, '_> {
    fn locate(&self) -> Option<(SymbolRef, Span)> {
        match self.path.tail()? {
            NodeRef::Element(element) => self.element(element),
            NodeRef::BoundText(text) => self.parsed_expression(&text.value),
            NodeRef::Property(property) => self.property(property),
            NodeRef::Event(event) => self.event(event),
            NodeRef::Attribute(attr) => self.attribute(attr),
            NodeRef::StructuralAttribute(attr) => self.microsyntax(attr),
            NodeRef::Reference(reference) => {
                let symbol = self.scopes.references().get(&reference.name)?;
                let ty = symbol.ty()?;
                if self.scopes.session().type_kind(&ty).is_any_like() {
                    return None;
                }
                Some((ty, reference.span))
            }
            NodeRef::Variable(variable) => {
                let symbol = self.scopes.variables(self.path).get(&variable.name)?;
                Some((symbol, variable.span))
            }
            NodeRef::Template(_) | NodeRef::Text(_) => None,
        }
    }

    fn directives(&self) -> &[DirectiveMatch] {
        self.path.nearest_directives()
    }

    fn directive_type(&self, directive: &DirectiveMatch) -> Option<SymbolRef> {
        self.scopes.session().type_symbol(&directive.type_ref)
    }

    fn directive_member(&self, directive: &DirectiveMatch, field: &str) -> Option<SymbolRef> {
        self.directive_type(directive)?.members().get(field)
    }

    fn parsed_expression(&self, parsed: &ParsedExpression) -> Option<(SymbolRef, Span)> {
        let relative = parsed.relative_position(self.position)?;
        self.expression(&parsed.arena, parsed.root, relative)
            .map(|(symbol, span)| (symbol, span.offset(parsed.base_offset)))
    }

    /// Span relative to the arena's source.
    fn expression(&self, arena: &ExprArena, root: ExprId, position: u32) -> Option<(SymbolRef, Span)> {
        let scope = self.scopes.scope_at(self.path);
        let checker = ExpressionChecker::new(self.scopes.session(), scope, arena);
        expression_symbol(&checker, arena, root, position)
    }

    /// The tag name of a component, or of an element a directive selects.
    fn element(&self, element: &Element) -> Option<(SymbolRef, Span)> {
        let name_span = Span::from_len(element.span.start + 1, element.name.len() as u32);
        if !name_span.contains(self.position) {
            return None;
        }
        if let Some(component) = element.directives.iter().find(|d| d.is_component) {
            let symbol = self.directive_type(component)?;
            return Some((OverrideKindSymbol::wrap(symbol, SymbolKind::Component), name_span));
        }
        let directive = element
            .directives
            .iter()
            .find(|d| d.selects_element(&element.name))?;
        let symbol = self.directive_type(directive)?;
        Some((OverrideKindSymbol::wrap(symbol, SymbolKind::Directive), name_span))
    }

    fn property(&self, property: &BoundAttribute) -> Option<(SymbolRef, Span)> {
        if property.value_span.contains(self.position) && !property.value_span.is_empty() {
            return self.parsed_expression(&property.value);
        }
        let member = self.directives().iter().find_map(|d| {
            d.input_field(&property.name)
                .and_then(|field| self.directive_member(d, field))
        })?;
        Some((member, property.key_span))
    }

    fn event(&self, event: &BoundEvent) -> Option<(SymbolRef, Span)> {
        if event.handler_span.contains(self.position) && !event.handler_span.is_empty() {
            return self.parsed_expression(&event.handler);
        }
        let member = self.directives().iter().find_map(|d| {
            d.output_field(&event.name)
                .and_then(|field| self.directive_member(d, field))
        })?;
        Some((OverrideKindSymbol::wrap(member, SymbolKind::Event), event.key_span))
    }

    /// An attribute naming a directive in its selector.
    fn attribute(&self, attr: &TextAttribute) -> Option<(SymbolRef, Span)> {
        let directive = self
            .directives()
            .iter()
            .find(|d| d.selects_attribute(&attr.name))?;
        let symbol = self.directive_type(directive)?;
        Some((OverrideKindSymbol::wrap(symbol, SymbolKind::Directive), attr.span))
    }

    fn microsyntax(&self, attr: &TextAttribute) -> Option<(SymbolRef, Span)> {
        let template = self.path.nearest_template()?;
        let microsyntax = template.microsyntax.as_ref()?;
        let base = microsyntax.base_offset;
        // On the attribute name (`*ngFor`), before the value.
        let Some(relative) = self.position.checked_sub(base) else {
            return self.structural_directive(template, attr);
        };
        let binding = microsyntax.binding_at(relative)?;

        if let (Some(value), Some(value_span)) = (binding.value, binding.value_span) {
            if value_span.contains(relative) {
                return self
                    .expression(&microsyntax.arena, value, relative)
                    .map(|(symbol, span)| (symbol, span.offset(base)));
            }
        }
        if binding.key_is_var {
            let symbol = self.scopes.variables(self.path).get(&binding.key)?;
            let span = binding.key_span.unwrap_or(binding.span).offset(base);
            return Some((symbol, span));
        }

        let input = template.directives.iter().find_map(|d| {
            d.input_field(&binding.key)
                .and_then(|field| self.directive_member(d, field))
        });
        match (input, binding.key_span) {
            (Some(member), Some(key_span)) => Some((member, key_span.offset(base))),
            _ => self.structural_directive(template, attr),
        }
    }

    /// The directive a structural attribute applies.
    fn structural_directive(&self, template: &EmbeddedTemplate, attr: &TextAttribute) -> Option<(SymbolRef, Span)> {
        let directive = template.directives.first()?;
        let symbol = self.directive_type(directive)?;
        Some((OverrideKindSymbol::wrap(symbol, SymbolKind::Directive), attr.span))
    }
}

#[cfg(test)]
#[path = "../tests/locate_tests.rs"]
mod tests;
