//! Engine-side symbols.

use super::{
    Definition, Signature, Symbol, SymbolKind, SymbolRef, SymbolTableRef, empty_table,
};
use std::any::Any;
use std::sync::Arc;
use tmpl_parser::ast::LiteralValue;

/// A name the template declares: a variable, a reference or `$event`.
///
/// Everything except identity is delegated to the declared type.
#[derive(Debug)]
pub struct DeclaredSymbol {
    name: String,
    kind: SymbolKind,
    ty: SymbolRef,
    definition: Option<Vec<Definition>>,
    documentation: Option<String>,
}

impl DeclaredSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: SymbolRef) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            definition: None,
            documentation: None,
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: Option<Vec<Definition>>) -> Self {
        self.definition = definition;
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    #[must_use]
    pub fn into_ref(self) -> SymbolRef {
        Arc::new(self)
    }
}

impl Symbol for DeclaredSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn ty(&self) -> Option<SymbolRef> {
        Some(Arc::clone(&self.ty))
    }

    fn is_callable(&self) -> bool {
        self.ty.is_callable()
    }

    fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    fn definition(&self) -> Option<Vec<Definition>> {
        self.definition.clone()
    }

    fn documentation(&self) -> Option<String> {
        self.documentation.clone().or_else(|| self.ty.documentation())
    }

    fn members(&self) -> SymbolTableRef {
        self.ty.members()
    }

    fn signatures(&self) -> Vec<Signature> {
        self.ty.signatures()
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        self.ty.select_signature(args)
    }

    fn indexed(&self, key: &SymbolRef, literal: Option<&LiteralValue>) -> Option<SymbolRef> {
        self.ty.indexed(key, literal)
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        self.ty.type_arguments()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A host symbol reported under another kind (a class located from an
/// element shows as `component` or `directive`, an output as `event`).
#[derive(Debug)]
pub struct OverrideKindSymbol {
    inner: SymbolRef,
    kind: SymbolKind,
}

impl OverrideKindSymbol {
    #[must_use]
    pub fn wrap(inner: SymbolRef, kind: SymbolKind) -> SymbolRef {
        Arc::new(Self { inner, kind })
    }

    #[must_use]
    pub fn inner(&self) -> &SymbolRef {
        &self.inner
    }
}

impl Symbol for OverrideKindSymbol {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn display_name(&self) -> String {
        self.inner.display_name()
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn ty(&self) -> Option<SymbolRef> {
        self.inner.ty()
    }

    fn container(&self) -> Option<SymbolRef> {
        self.inner.container()
    }

    fn is_public(&self) -> bool {
        self.inner.is_public()
    }

    fn is_callable(&self) -> bool {
        self.inner.is_callable()
    }

    fn is_nullable(&self) -> bool {
        self.inner.is_nullable()
    }

    fn definition(&self) -> Option<Vec<Definition>> {
        self.inner.definition()
    }

    fn documentation(&self) -> Option<String> {
        self.inner.documentation()
    }

    fn members(&self) -> SymbolTableRef {
        self.inner.members()
    }

    fn signatures(&self) -> Vec<Signature> {
        self.inner.signatures()
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        self.inner.select_signature(args)
    }

    fn indexed(&self, key: &SymbolRef, literal: Option<&LiteralValue>) -> Option<SymbolRef> {
        self.inner.indexed(key, literal)
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        self.inner.type_arguments()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Receiver of unqualified names; its members are the scope.
#[derive(Debug)]
pub struct ImplicitReceiverSymbol {
    scope: SymbolTableRef,
}

impl ImplicitReceiverSymbol {
    pub const NAME: &'static str = "$implicit";

    #[must_use]
    pub fn new(scope: SymbolTableRef) -> Self {
        Self { scope }
    }

    /// Whether `symbol` is an implicit receiver.
    #[must_use]
    pub fn is(symbol: &dyn Symbol) -> bool {
        symbol.as_any().is::<Self>()
    }
}

impl Symbol for ImplicitReceiverSymbol {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Component
    }

    fn ty(&self) -> Option<SymbolRef> {
        None
    }

    fn members(&self) -> SymbolTableRef {
        Arc::clone(&self.scope)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A callable with no members, used by global functions.
#[derive(Debug)]
pub(crate) struct FunctionSymbol {
    pub(crate) name: &'static str,
    pub(crate) documentation: &'static str,
    pub(crate) arity: usize,
    pub(crate) result: SymbolRef,
}

impl Symbol for FunctionSymbol {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Method
    }

    fn ty(&self) -> Option<SymbolRef> {
        None
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn documentation(&self) -> Option<String> {
        Some(self.documentation.to_string())
    }

    fn members(&self) -> SymbolTableRef {
        empty_table()
    }

    fn signatures(&self) -> Vec<Signature> {
        vec![Signature {
            arguments: empty_table(),
            result: Arc::clone(&self.result),
        }]
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        (args.len() == self.arity).then(|| Signature {
            arguments: empty_table(),
            result: Arc::clone(&self.result),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
