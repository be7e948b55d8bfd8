//! Expression type checker.
//!
//! Typing is bottom-up and pure per node: [`ExpressionChecker::check`]
//! returns the node's type together with every diagnostic found in its
//! subtree. Results are memoized by [`ExprId`] for the lifetime of the
//! checker (one pass), so repeated queries for a node return the same symbol.
//!
//! Nothing here fails. Every rule that cannot produce a type reports a
//! diagnostic and falls back to `any`.

mod binary;

use crate::options::CheckerOptions;
use crate::query::AnalysisSession;
use crate::symbols::{BuiltinType, ImplicitReceiverSymbol, SymbolRef, SymbolTableRef};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tmpl_common::diagnostics::{Diagnostic, DiagnosticMessage, diagnostic_messages};
use tmpl_common::limits::{
    MAX_EXPR_CHECK_DEPTH, MAX_TYPE_CHAIN_DEPTH, STACK_RED_ZONE, STACK_SEGMENT_SIZE,
};
use tmpl_common::span::Span;
use tmpl_parser::ast::{ExprArena, ExprId, ExprKind, LiteralValue};
use tracing::{debug, error, trace};

/// Type of a node plus the diagnostics of its subtree.
#[derive(Clone, Debug)]
pub struct Typed {
    pub ty: SymbolRef,
    pub diagnostics: Vec<Diagnostic>,
}

impl Typed {
    #[must_use]
    pub fn new(ty: SymbolRef) -> Self {
        Self {
            ty,
            diagnostics: Vec::new(),
        }
    }

    fn with_diagnostics(ty: SymbolRef, diagnostics: Vec<Diagnostic>) -> Self {
        Self { ty, diagnostics }
    }
}

/// Pipes whose declared signatures are too generic to be useful.
const ASYNC_PIPE: &str = "async";
const SLICE_PIPE: &str = "slice";

/// Types the nodes of one parsed expression in one scope.
pub struct ExpressionChecker<'a> {
    session: &'a AnalysisSession,
    arena: &'a ExprArena,
    scope: SymbolTableRef,
    options: CheckerOptions,
    implicit: SymbolRef,
    memo: RefCell<FxHashMap<ExprId, Typed>>,
    depth: Cell<u32>,
}

impl<'a> ExpressionChecker<'a> {
    #[must_use]
    pub fn new(session: &'a AnalysisSession, scope: SymbolTableRef, arena: &'a ExprArena) -> Self {
        let implicit: SymbolRef = Arc::new(ImplicitReceiverSymbol::new(Arc::clone(&scope)));
        Self {
            session,
            arena,
            scope,
            options: CheckerOptions::default(),
            implicit,
            memo: RefCell::new(FxHashMap::default()),
            depth: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn scope(&self) -> &SymbolTableRef {
        &self.scope
    }

    /// Type of `id`, discarding diagnostics.
    #[must_use]
    pub fn type_of(&self, id: ExprId) -> SymbolRef {
        self.check(id).ty
    }

    /// Diagnostics for a whole expression.
    ///
    /// In an event handler (`event`), an expression whose type is callable
    /// is a method reference that was never called.
    #[must_use]
    pub fn diagnostics(&self, root: ExprId, event: bool) -> Vec<Diagnostic> {
        let Typed {
            ty,
            mut diagnostics,
        } = self.check(root);
        if event && self.options.check_event_callable && ty.is_callable() {
            diagnostics.push(Diagnostic::new(
                self.arena.span(root),
                &diagnostic_messages::CALLABLE_EXPRESSION_EXPECTED_METHOD_CALL,
                &[],
            ));
        }
        diagnostics
    }

    /// Type a node (memoized).
    pub fn check(&self, id: ExprId) -> Typed {
        if let Some(hit) = self.memo.borrow().get(&id) {
            return hit.clone();
        }
        let depth = self.depth.get();
        if depth >= MAX_EXPR_CHECK_DEPTH {
            debug!(?id, depth, "expression too deep to check");
            return Typed::new(self.any());
        }
        self.depth.set(depth + 1);
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || self.compute(id));
        self.depth.set(depth);
        self.memo.borrow_mut().insert(id, result.clone());
        result
    }

    /// The declared member a member-like node refers to (for pipes, the pipe).
    ///
    /// Returns `None` when the receiver is `any` or has no such member.
    #[must_use]
    pub fn member_symbol(&self, id: ExprId) -> Option<SymbolRef> {
        match self.arena.kind(id)? {
            ExprKind::PropertyRead { receiver, name, .. }
            | ExprKind::PropertyWrite { receiver, name, .. }
            | ExprKind::MethodCall { receiver, name, .. } => {
                let receiver = self.type_of(*receiver);
                self.lookup_member(&receiver, name)
            }
            ExprKind::SafePropertyRead { receiver, name, .. }
            | ExprKind::SafeMethodCall { receiver, name, .. } => {
                let receiver = self.session.non_nullable(&self.type_of(*receiver));
                self.lookup_member(&receiver, name)
            }
            ExprKind::Pipe { name, .. } => self.session.pipes().get(name),
            _ => None,
        }
    }

    fn lookup_member(&self, receiver: &SymbolRef, name: &str) -> Option<SymbolRef> {
        if self.is_any(receiver) {
            return None;
        }
        receiver.members().get(name)
    }

    /// `any` (or unbound), directly or through a chain of value types.
    #[must_use]
    pub fn is_any(&self, symbol: &SymbolRef) -> bool {
        let mut current = Arc::clone(symbol);
        for _ in 0..MAX_TYPE_CHAIN_DEPTH {
            if self.session.type_kind(&current).is_any_like() {
                return true;
            }
            match current.ty() {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn any(&self) -> SymbolRef {
        self.session.any_type()
    }

    fn builtin(&self, kind: BuiltinType) -> SymbolRef {
        self.session.builtin(kind)
    }

    /// Type a child, moving its diagnostics into `diagnostics`.
    fn visit(&self, id: ExprId, diagnostics: &mut Vec<Diagnostic>) -> SymbolRef {
        let Typed {
            ty,
            diagnostics: child,
        } = self.check(id);
        diagnostics.extend(child);
        ty
    }

    fn report(diagnostics: &mut Vec<Diagnostic>, span: Span, message: &DiagnosticMessage, args: &[&str]) {
        diagnostics.push(Diagnostic::new(span, message, args));
    }

    // =========================================================================
    // Node rules
    // =========================================================================

    fn compute(&self, id: ExprId) -> Typed {
        let node = self.arena.get(id);
        debug_assert!(node.is_some(), "dangling expression id {id:?}");
        let Some(node) = node else {
            error!(?id, "dangling expression id");
            return Typed::new(self.any());
        };
        trace!(?id, kind = node.kind.kind_name(), "check expression");

        let span = node.span;
        let mut diagnostics = Vec::new();
        let ty = match &node.kind {
            ExprKind::Empty | ExprKind::Quote { .. } => self.any(),
            ExprKind::ImplicitReceiver => Arc::clone(&self.implicit),
            ExprKind::Binary {
                operator,
                left,
                right,
            } => self.check_binary(span, *operator, *left, *right, &mut diagnostics),
            ExprKind::Chain { expressions } | ExprKind::Interpolation { expressions, .. } => {
                for expression in expressions {
                    self.visit(*expression, &mut diagnostics);
                }
                self.builtin(BuiltinType::Undefined)
            }
            ExprKind::Conditional {
                condition,
                true_exp,
                false_exp,
            } => {
                self.visit(*condition, &mut diagnostics);
                let when_true = self.visit(*true_exp, &mut diagnostics);
                let when_false = self.visit(*false_exp, &mut diagnostics);
                self.session.union(&[when_true, when_false])
            }
            ExprKind::Call { target, args } => {
                self.check_function_call(span, *target, args, &mut diagnostics)
            }
            ExprKind::KeyedRead { receiver, key } => {
                let receiver = self.visit(*receiver, &mut diagnostics);
                let key_type = self.visit(*key, &mut diagnostics);
                let literal = match self.arena.kind(*key) {
                    Some(ExprKind::LiteralPrimitive { value }) => Some(value),
                    _ => None,
                };
                if self.is_any(&receiver) {
                    self.any()
                } else {
                    receiver
                        .indexed(&key_type, literal)
                        .unwrap_or_else(|| self.any())
                }
            }
            // A write has the type of the value written.
            ExprKind::KeyedWrite { value, .. } | ExprKind::PropertyWrite { value, .. } => {
                self.visit(*value, &mut diagnostics)
            }
            ExprKind::LiteralArray { elements } => {
                let types: Vec<SymbolRef> = elements
                    .iter()
                    .map(|element| self.visit(*element, &mut diagnostics))
                    .collect();
                let element = self.session.union(&types);
                self.session.array_of(&element)
            }
            ExprKind::LiteralMap { values, .. } => {
                for value in values {
                    self.visit(*value, &mut diagnostics);
                }
                self.any()
            }
            ExprKind::LiteralPrimitive { value } => self.builtin(match value {
                LiteralValue::Boolean(_) => BuiltinType::Boolean,
                LiteralValue::Null => BuiltinType::Null,
                LiteralValue::Undefined => BuiltinType::Undefined,
                LiteralValue::String(_) => BuiltinType::String,
                LiteralValue::Number(_) => BuiltinType::Number,
            }),
            ExprKind::MethodCall {
                receiver,
                name,
                args,
                ..
            } => {
                let receiver_type = self.visit(*receiver, &mut diagnostics);
                self.resolve_method_call(span, &receiver_type, *receiver, name, args, &mut diagnostics)
            }
            ExprKind::SafeMethodCall {
                receiver,
                name,
                args,
                ..
            } => {
                let receiver_type = self.visit(*receiver, &mut diagnostics);
                let receiver_type = self.session.non_nullable(&receiver_type);
                self.resolve_method_call(span, &receiver_type, *receiver, name, args, &mut diagnostics)
            }
            ExprKind::PropertyRead { receiver, name, .. } => {
                let receiver_type = self.visit(*receiver, &mut diagnostics);
                self.resolve_property_read(span, &receiver_type, *receiver, name, &mut diagnostics)
                    .unwrap_or_else(|| self.any())
            }
            ExprKind::SafePropertyRead { receiver, name, .. } => {
                let receiver_type = self.visit(*receiver, &mut diagnostics);
                let receiver_type = self.session.non_nullable(&receiver_type);
                self.resolve_property_read(span, &receiver_type, *receiver, name, &mut diagnostics)
                    .unwrap_or_else(|| self.any())
            }
            ExprKind::NonNullAssert { expression } => {
                let ty = self.visit(*expression, &mut diagnostics);
                self.session.non_nullable(&ty)
            }
            ExprKind::PrefixNot { expression } => {
                self.visit(*expression, &mut diagnostics);
                self.builtin(BuiltinType::Boolean)
            }
            ExprKind::Pipe {
                expression,
                name,
                args,
                ..
            } => self.check_pipe(span, *expression, name, args, &mut diagnostics),
        };
        Typed::with_diagnostics(ty, diagnostics)
    }

    fn check_function_call(
        &self,
        span: Span,
        target: ExprId,
        args: &[ExprId],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> SymbolRef {
        let arg_types: Vec<SymbolRef> = args
            .iter()
            .map(|arg| self.visit(*arg, diagnostics))
            .collect();
        let target = self.visit(target, diagnostics);
        if self.is_any(&target) {
            return self.any();
        }
        if !target.is_callable() {
            Self::report(diagnostics, span, &diagnostic_messages::CALL_TARGET_NOT_CALLABLE, &[]);
            return self.any();
        }
        match target.select_signature(&arg_types) {
            Some(signature) => signature.result,
            None => {
                Self::report(
                    diagnostics,
                    span,
                    &diagnostic_messages::UNABLE_TO_RESOLVE_COMPATIBLE_CALL_SIGNATURE,
                    &[],
                );
                self.any()
            }
        }
    }

    fn check_pipe(
        &self,
        span: Span,
        expression: ExprId,
        name: &str,
        args: &[ExprId],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> SymbolRef {
        // The operand is typed even when the pipe is unknown so its own
        // diagnostics still surface.
        let operand = self.visit(expression, diagnostics);
        let Some(pipe) = self.session.pipes().get(name) else {
            Self::report(diagnostics, span, &diagnostic_messages::NO_PIPE_FOUND, &[name]);
            return self.any();
        };
        let mut arg_types = Vec::with_capacity(args.len() + 1);
        arg_types.push(Arc::clone(&operand));
        arg_types.extend(args.iter().map(|arg| self.visit(*arg, diagnostics)));
        let Some(signature) = pipe.select_signature(&arg_types) else {
            Self::report(diagnostics, span, &diagnostic_messages::UNABLE_TO_RESOLVE_SIGNATURE, &[name]);
            return self.any();
        };
        match name {
            ASYNC_PIPE => match operand.type_arguments().as_deref() {
                Some([single]) => Arc::clone(single),
                _ => signature.result,
            },
            SLICE_PIPE => operand,
            _ => signature.result,
        }
    }

    /// Member lookup shared by reads and calls.
    ///
    /// `Some(any)` when the receiver is `any` or the member is missing (with a
    /// diagnostic); `None` when the member exists but has no type.
    fn resolve_property_read(
        &self,
        span: Span,
        receiver_type: &SymbolRef,
        receiver: ExprId,
        name: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<SymbolRef> {
        if self.is_any(receiver_type) {
            return Some(self.any());
        }
        let is_implicit = ImplicitReceiverSymbol::is(receiver_type.as_ref());
        let Some(member) = receiver_type.members().get(name) else {
            if is_implicit {
                Self::report(
                    diagnostics,
                    span,
                    &diagnostic_messages::IDENTIFIER_NOT_DEFINED_IN_APP_CONTEXT,
                    &[name],
                );
            } else if let Some(receiver_name) = self.nullable_property_name(receiver_type, receiver) {
                let safe = format!("{receiver_name}?.{name}");
                let asserted = format!("{receiver_name}!.{name}");
                Self::report(
                    diagnostics,
                    span,
                    &diagnostic_messages::IDENTIFIER_POSSIBLY_UNDEFINED,
                    &[receiver_name, &safe, &asserted],
                );
            } else {
                Self::report(
                    diagnostics,
                    span,
                    &diagnostic_messages::IDENTIFIER_NOT_DEFINED_ON_RECEIVER,
                    &[name, receiver_type.name()],
                );
            }
            return Some(self.any());
        };
        if !member.is_public() && self.options.report_private_members {
            let container = if is_implicit {
                "the component".to_string()
            } else {
                format!("'{}'", receiver_type.name())
            };
            Self::report(
                diagnostics,
                span,
                &diagnostic_messages::IDENTIFIER_IS_PRIVATE,
                &[name, &container],
            );
        }
        member.ty()
    }

    /// Name of a plain property read whose type is nullable.
    fn nullable_property_name(&self, receiver_type: &SymbolRef, receiver: ExprId) -> Option<&str> {
        if !receiver_type.is_nullable() {
            return None;
        }
        match self.arena.kind(receiver)? {
            ExprKind::PropertyRead { name, .. } => Some(name),
            _ => None,
        }
    }

    fn resolve_method_call(
        &self,
        span: Span,
        receiver_type: &SymbolRef,
        receiver: ExprId,
        name: &str,
        args: &[ExprId],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> SymbolRef {
        let arg_types: Vec<SymbolRef> = args
            .iter()
            .map(|arg| self.visit(*arg, diagnostics))
            .collect();
        if self.is_any(receiver_type) {
            return self.any();
        }
        let Some(method) = self.resolve_property_read(span, receiver_type, receiver, name, diagnostics)
        else {
            Self::report(diagnostics, span, &diagnostic_messages::COULD_NOT_RESOLVE_TYPE, &[name]);
            return self.any();
        };
        if self.is_any(&method) {
            return self.any();
        }
        if !method.is_callable() {
            Self::report(diagnostics, span, &diagnostic_messages::IDENTIFIER_NOT_CALLABLE, &[name]);
            return self.any();
        }
        match method.select_signature(&arg_types) {
            Some(signature) => signature.result,
            None => {
                Self::report(diagnostics, span, &diagnostic_messages::UNABLE_TO_RESOLVE_SIGNATURE, &[name]);
                self.any()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/expr_tests.rs"]
mod tests;
