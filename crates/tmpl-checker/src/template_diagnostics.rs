//! Whole-template diagnostics.
//!
//! Every bound expression is checked in the scope of its position. Spans of
//! the results are in file coordinates (template offset applied).

use crate::expr::ExpressionChecker;
use crate::options::CheckerOptions;
use crate::query::AnalysisSession;
use crate::scope::{ScopeBuilder, TemplateInfo};
use tmpl_common::diagnostics::{Diagnostic, diagnostic_messages};
use tmpl_parser::IMPLICIT_CONTEXT_MEMBER;
use tmpl_parser::ast::ParsedExpression;
use tmpl_parser::template::{
    BoundAttribute, EmbeddedTemplate, NodeRef, TemplatePath, Variable, walk_template,
};
use tracing::{debug, instrument};

const REFINE_CONTEXT_HINT: &str =
    "If the context type is a base type or 'any', consider refining it to a more specific type.";

/// Expression and microsyntax parse errors, in file coordinates.
#[must_use]
pub fn parse_errors(info: &TemplateInfo) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    let shift = |diagnostic: &Diagnostic, base: u32| diagnostic.clone().offset(base + info.offset);
    walk_template(&info.nodes, &mut |path| match path.tail() {
        Some(NodeRef::Template(template)) => {
            if let Some(microsyntax) = &template.microsyntax {
                errors.extend(
                    microsyntax
                        .errors
                        .iter()
                        .map(|e| shift(e, microsyntax.base_offset)),
                );
            }
        }
        Some(NodeRef::Property(attr)) => {
            // Values re-parsed from a microsyntax attribute repeat its errors.
            if !is_microsyntax_binding(path, attr) {
                errors.extend(attr.value.errors.iter().map(|e| shift(e, attr.value.base_offset)));
            }
        }
        Some(NodeRef::Event(event)) => {
            errors.extend(
                event
                    .handler
                    .errors
                    .iter()
                    .map(|e| shift(e, event.handler.base_offset)),
            );
        }
        Some(NodeRef::BoundText(text)) => {
            errors.extend(text.value.errors.iter().map(|e| shift(e, text.value.base_offset)));
        }
        _ => {}
    });
    errors
}

fn is_microsyntax_binding(path: &TemplatePath<'_>, attr: &BoundAttribute) -> bool {
    path.nearest_template().is_some_and(|template| {
        template.microsyntax.is_some()
            && template
                .template_bindings
                .iter()
                .any(|binding| std::ptr::eq(binding, attr))
    })
}

/// All diagnostics of a template: parse errors when there are any,
/// otherwise type errors.
#[instrument(level = "debug", skip_all, fields(file = %info.file_name))]
pub fn template_diagnostics(
    session: &AnalysisSession,
    info: &TemplateInfo,
    options: &CheckerOptions,
) -> Vec<Diagnostic> {
    let errors = parse_errors(info);
    if !errors.is_empty() {
        debug!(count = errors.len(), "template has parse errors");
        return errors;
    }
    let scopes = ScopeBuilder::new(session, info);
    let mut diagnostics = Vec::new();
    walk_template(&info.nodes, &mut |path| {
        match path.tail() {
            Some(NodeRef::Property(attr)) => {
                diagnostics.extend(check_expression(&scopes, path, &attr.value, false, options));
            }
            Some(NodeRef::Event(event)) => {
                diagnostics.extend(check_expression(&scopes, path, &event.handler, true, options));
            }
            Some(NodeRef::BoundText(text)) => {
                diagnostics.extend(check_expression(&scopes, path, &text.value, false, options));
            }
            Some(NodeRef::Variable(variable)) => {
                if let Some(template) = path.nearest_template() {
                    diagnostics.extend(missing_context_member(session, info, template, variable));
                }
            }
            _ => {}
        }
    });
    debug!(count = diagnostics.len(), "template checked");
    diagnostics
}

/// Type diagnostics of one expression, in file coordinates.
#[must_use]
pub fn check_expression(
    scopes: &ScopeBuilder<'_>,
    path: &TemplatePath<'_>,
    expression: &ParsedExpression,
    event: bool,
    options: &CheckerOptions,
) -> Vec<Diagnostic> {
    let scope = scopes.scope_at(path);
    let checker = ExpressionChecker::new(scopes.session(), scope, &expression.arena)
        .with_options(options.clone());
    let base = expression.base_offset + scopes.info().offset;
    checker
        .diagnostics(expression.root, event)
        .into_iter()
        .map(|diagnostic| diagnostic.offset(base))
        .collect()
}

/// A variable reading a member its template context does not declare.
fn missing_context_member(
    session: &AnalysisSession,
    info: &TemplateInfo,
    template: &EmbeddedTemplate,
    variable: &Variable,
) -> Option<Diagnostic> {
    if variable.value.is_empty() {
        return None;
    }
    let (directive, context) = template
        .directives
        .iter()
        .find_map(|d| session.template_context(&d.type_ref).map(|context| (d, context)))?;
    if context.has(&variable.value) {
        return None;
    }
    let missing = if variable.value == IMPLICIT_CONTEXT_MEMBER {
        "an implicit value".to_string()
    } else {
        format!("a member called '{}'", variable.value)
    };
    Some(
        Diagnostic::new(
            variable.span.offset(info.offset),
            &diagnostic_messages::TEMPLATE_CONTEXT_MISSING_MEMBER,
            &[&directive.type_ref.name, &missing],
        )
        .with_next(REFINE_CONTEXT_HINT),
    )
}

#[cfg(test)]
#[path = "../tests/template_diagnostics_tests.rs"]
mod tests;
