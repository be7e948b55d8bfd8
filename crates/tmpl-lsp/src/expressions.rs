//! Position queries inside one parsed expression.
//!
//! Positions and returned spans are relative to the expression source.

use std::sync::Arc;
use tmpl_checker::{AnalysisSession, ExpressionChecker, SymbolRef, SymbolTableRef};
use tmpl_common::span::Span;
use tmpl_parser::ast::{ExprArena, ExprId, ExprKind};

/// Nodes whose span contains `position`, in pre-order.
///
/// Siblings that touch the position are all included; the last entry is
/// the node the position belongs to.
#[must_use]
pub fn expression_path(arena: &ExprArena, root: ExprId, position: u32, exclude_empty: bool) -> Vec<ExprId> {
    let mut path = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let span = arena.span(id);
        if exclude_empty && span.is_empty() {
            continue;
        }
        if !span.contains(position) {
            continue;
        }
        path.push(id);
        stack.extend(arena.children(id).into_iter().rev());
    }
    path
}

/// Whether `position` is where the pipe's name goes: after the operand and
/// before the first argument.
fn at_pipe_name(arena: &ExprArena, expression: ExprId, args: &[ExprId], position: u32) -> bool {
    position >= arena.span(expression).end
        && args
            .first()
            .is_none_or(|first| position < arena.span(*first).start)
}

/// Symbols that may be typed at `position`.
///
/// `None` where nothing can be completed (between interpolations, inside
/// a quote).
#[must_use]
pub fn expression_completions(
    session: &AnalysisSession,
    checker: &ExpressionChecker<'_>,
    arena: &ExprArena,
    root: ExprId,
    position: u32,
) -> Option<SymbolTableRef> {
    let path = expression_path(arena, root, position, false);
    let Some(&tail) = path.last() else {
        return None;
    };
    let receiver_members = |receiver: ExprId| {
        let receiver_type = checker.type_of(receiver);
        if receiver_type.is_nullable() {
            session.non_nullable(&receiver_type).members()
        } else {
            receiver_type.members()
        }
    };
    let table = match arena.kind(tail)? {
        ExprKind::Interpolation { .. } | ExprKind::Quote { .. } => return None,
        ExprKind::Pipe {
            expression, args, ..
        } if at_pipe_name(arena, *expression, args, position) => session.pipes(),
        ExprKind::PropertyRead { receiver, .. }
        | ExprKind::PropertyWrite { receiver, .. }
        | ExprKind::SafePropertyRead { receiver, .. } => receiver_members(*receiver),
        ExprKind::MethodCall {
            receiver, name_span, ..
        }
        | ExprKind::SafeMethodCall {
            receiver, name_span, ..
        } if name_span.contains(position) => receiver_members(*receiver),
        _ => Arc::clone(checker.scope()),
    };
    Some(table)
}

/// The member or pipe named at `position`, with the span of its name.
#[must_use]
pub fn expression_symbol(
    checker: &ExpressionChecker<'_>,
    arena: &ExprArena,
    root: ExprId,
    position: u32,
) -> Option<(SymbolRef, Span)> {
    let path = expression_path(arena, root, position, true);
    let tail = *path.last()?;
    let kind = arena.kind(tail)?;
    if let ExprKind::Pipe {
        expression, args, ..
    } = kind
    {
        if !at_pipe_name(arena, *expression, args, position) {
            return None;
        }
    }
    let (_, name_span) = kind.member_name()?;
    let symbol = checker.member_symbol(tail)?;
    Some((symbol, name_span))
}

#[cfg(test)]
#[path = "../tests/expressions_tests.rs"]
mod tests;
