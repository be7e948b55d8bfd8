//! In-memory `SymbolQuery` for unit tests.

use crate::query::{AnalysisSession, SymbolQuery};
use crate::symbols::{
    BuiltinType, ListSymbolTable, Signature, Symbol, SymbolKind, SymbolRef, SymbolTableRef,
    empty_table,
};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::sync::Arc;
use tmpl_parser::ast::LiteralValue;
use tmpl_parser::template::TypeReference;

/// A test type.
#[derive(Debug)]
pub(crate) struct TestType {
    name: String,
    kind: BuiltinType,
    non_null: Option<SymbolRef>,
    signature: Option<(usize, SymbolRef)>,
    members: Vec<SymbolRef>,
    element: Option<SymbolRef>,
    type_args: Vec<SymbolRef>,
}

impl TestType {
    pub(crate) fn new(name: &str, kind: BuiltinType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            non_null: None,
            signature: None,
            members: Vec::new(),
            element: None,
            type_args: Vec::new(),
        }
    }

    /// A class type (kind `Other`).
    pub(crate) fn class(name: &str) -> Self {
        Self::new(name, BuiltinType::Other)
    }

    /// `inner | null`. Has no members of its own.
    pub(crate) fn nullable(inner: &SymbolRef, kind: BuiltinType) -> SymbolRef {
        let mut ty = Self::new(&format!("{} | null", inner.name()), kind);
        ty.non_null = Some(Arc::clone(inner));
        Arc::new(ty)
    }

    /// A function type taking `arity` arguments.
    pub(crate) fn function(arity: usize, result: &SymbolRef) -> SymbolRef {
        let mut ty = Self::class("function");
        ty.signature = Some((arity, Arc::clone(result)));
        Arc::new(ty)
    }

    pub(crate) fn array(element: &SymbolRef) -> SymbolRef {
        let mut ty = Self::class(&format!("{}[]", element.name()));
        ty.element = Some(Arc::clone(element));
        Arc::new(ty)
    }

    pub(crate) fn member(mut self, name: &str, ty: &SymbolRef) -> Self {
        self.members.push(TestMember::new(name, ty).into_ref());
        self
    }

    pub(crate) fn private_member(mut self, name: &str, ty: &SymbolRef) -> Self {
        self.members.push(TestMember::new(name, ty).private().into_ref());
        self
    }

    pub(crate) fn method(mut self, name: &str, arity: usize, result: &SymbolRef) -> Self {
        let function = Self::function(arity, result);
        self.members
            .push(TestMember::new(name, &function).kind(SymbolKind::Method).into_ref());
        self
    }

    pub(crate) fn type_args(mut self, args: &[SymbolRef]) -> Self {
        self.type_args = args.to_vec();
        self
    }

    pub(crate) fn into_ref(self) -> SymbolRef {
        Arc::new(self)
    }
}

impl Symbol for TestType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Type
    }

    fn ty(&self) -> Option<SymbolRef> {
        None
    }

    fn is_callable(&self) -> bool {
        self.signature.is_some()
    }

    fn is_nullable(&self) -> bool {
        self.non_null.is_some()
    }

    fn members(&self) -> SymbolTableRef {
        Arc::new(ListSymbolTable::new(self.members.iter().cloned()))
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        let (arity, result) = self.signature.as_ref()?;
        (args.len() == *arity).then(|| Signature {
            arguments: empty_table(),
            result: Arc::clone(result),
        })
    }

    fn indexed(&self, _key: &SymbolRef, _literal: Option<&LiteralValue>) -> Option<SymbolRef> {
        self.element.clone()
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        (!self.type_args.is_empty()).then(|| self.type_args.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A member (or pipe) of a test type.
#[derive(Debug)]
pub(crate) struct TestMember {
    name: String,
    kind: SymbolKind,
    ty: SymbolRef,
    public: bool,
}

impl TestMember {
    pub(crate) fn new(name: &str, ty: &SymbolRef) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Property,
            ty: Arc::clone(ty),
            public: true,
        }
    }

    pub(crate) fn kind(mut self, kind: SymbolKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub(crate) fn into_ref(self) -> SymbolRef {
        Arc::new(self)
    }
}

impl Symbol for TestMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn ty(&self) -> Option<SymbolRef> {
        Some(Arc::clone(&self.ty))
    }

    fn is_public(&self) -> bool {
        self.public
    }

    fn is_callable(&self) -> bool {
        self.ty.is_callable()
    }

    fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    fn members(&self) -> SymbolTableRef {
        self.ty.members()
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        self.ty.select_signature(args)
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        self.ty.type_arguments()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A `SymbolQuery` over explicitly registered types.
pub(crate) struct TestQuery {
    builtins: Vec<SymbolRef>,
    pipes: Vec<SymbolRef>,
    contexts: FxHashMap<String, SymbolTableRef>,
    types: FxHashMap<String, SymbolRef>,
}

impl TestQuery {
    pub(crate) fn new() -> Self {
        let builtins = BuiltinType::ALL
            .iter()
            .map(|kind| TestType::new(&format!("{kind:?}").to_lowercase(), *kind).into_ref())
            .collect();
        Self {
            builtins,
            pipes: Vec::new(),
            contexts: FxHashMap::default(),
            types: FxHashMap::default(),
        }
    }

    pub(crate) fn builtin(&self, kind: BuiltinType) -> SymbolRef {
        Arc::clone(&self.builtins[kind.index()])
    }

    /// Register a pipe taking `arity` arguments (operand included).
    pub(crate) fn pipe(mut self, name: &str, arity: usize, result: &SymbolRef) -> Self {
        let function = TestType::function(arity, result);
        self.pipes
            .push(TestMember::new(name, &function).kind(SymbolKind::Pipe).into_ref());
        self
    }

    pub(crate) fn context(mut self, directive: &str, members: Vec<SymbolRef>) -> Self {
        self.contexts
            .insert(directive.to_string(), Arc::new(ListSymbolTable::new(members)));
        self
    }

    pub(crate) fn type_symbol(mut self, name: &str, ty: &SymbolRef) -> Self {
        self.types.insert(name.to_string(), Arc::clone(ty));
        self
    }

    pub(crate) fn into_session(self) -> AnalysisSession {
        AnalysisSession::new(Arc::new(self))
    }

    fn kind_of(symbol: &SymbolRef, depth: u32) -> BuiltinType {
        if let Some(ty) = symbol.as_any().downcast_ref::<TestType>() {
            return ty.kind;
        }
        match symbol.ty() {
            Some(next) if depth < 8 => Self::kind_of(&next, depth + 1),
            _ => BuiltinType::Other,
        }
    }
}

impl SymbolQuery for TestQuery {
    fn get_type_kind(&self, symbol: &SymbolRef) -> BuiltinType {
        Self::kind_of(symbol, 0)
    }

    fn get_builtin_type(&self, kind: BuiltinType) -> SymbolRef {
        self.builtin(kind)
    }

    fn get_type_union(&self, types: &[SymbolRef]) -> SymbolRef {
        match types.split_first() {
            Some((first, rest))
                if rest
                    .iter()
                    .all(|ty| std::ptr::addr_eq(Arc::as_ptr(ty), Arc::as_ptr(first))) =>
            {
                Arc::clone(first)
            }
            _ => self.builtin(BuiltinType::Any),
        }
    }

    fn get_array_type(&self, element: &SymbolRef) -> SymbolRef {
        TestType::array(element)
    }

    fn get_element_type(&self, array: &SymbolRef) -> Option<SymbolRef> {
        array
            .as_any()
            .downcast_ref::<TestType>()
            .and_then(|ty| ty.element.clone())
    }

    fn get_non_nullable_type(&self, symbol: &SymbolRef) -> SymbolRef {
        symbol
            .as_any()
            .downcast_ref::<TestType>()
            .and_then(|ty| ty.non_null.clone())
            .unwrap_or_else(|| Arc::clone(symbol))
    }

    fn get_pipes(&self) -> SymbolTableRef {
        Arc::new(ListSymbolTable::new(self.pipes.iter().cloned()))
    }

    fn get_template_context(&self, type_ref: &TypeReference) -> Option<SymbolTableRef> {
        self.contexts.get(&type_ref.name).cloned()
    }

    fn get_type_symbol(&self, type_ref: &TypeReference) -> Option<SymbolRef> {
        self.types.get(&type_ref.name).cloned()
    }
}
