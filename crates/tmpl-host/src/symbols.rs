//! Host symbols: types, members and pipes.

use crate::program::{HostProgram, ResolvedMember};
use crate::types::{Intrinsic, TypeData, TypeId};
use bitflags::bitflags;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tmpl_checker::{
    Definition, ListSymbolTable, Signature, Symbol, SymbolKind, SymbolRef, SymbolTableRef,
};
use tmpl_parser::ast::LiteralValue;

bitflags! {
    /// Declaration modifiers of a class member.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const OPTIONAL = 1 << 2;
        const READONLY = 1 << 3;
        /// Declared with a function type.
        const METHOD = 1 << 4;
    }
}

impl MemberFlags {
    #[must_use]
    pub fn is_public(self) -> bool {
        !self.intersects(Self::PRIVATE | Self::PROTECTED)
    }
}

/// A host type.
pub struct HostType {
    program: Arc<HostProgram>,
    id: TypeId,
    name: String,
    members: OnceCell<SymbolTableRef>,
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostType")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl HostType {
    #[must_use]
    pub fn new(program: Arc<HostProgram>, id: TypeId) -> Self {
        let name = match program.interner().lookup(id) {
            Some(TypeData::Class { name, .. }) => name,
            _ => program.interner().display(id),
        };
        Self {
            program,
            id,
            name,
            members: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The host type behind `symbol`, if it is one.
    #[must_use]
    pub fn of(symbol: &dyn Symbol) -> Option<&HostType> {
        symbol.as_any().downcast_ref::<HostType>()
    }

    fn data(&self) -> Option<TypeData> {
        self.program.interner().lookup(self.id)
    }

    fn symbol(&self, id: TypeId) -> SymbolRef {
        self.program.type_symbol(id)
    }

    fn signature(&self) -> Option<Signature> {
        let Some(TypeData::Function(shape)) = self.data() else {
            return None;
        };
        let arguments: Vec<SymbolRef> = shape
            .params
            .iter()
            .map(|param| {
                let mut flags = MemberFlags::empty();
                flags.set(MemberFlags::OPTIONAL, param.optional);
                HostMember {
                    program: Arc::clone(&self.program),
                    name: param.name.clone(),
                    kind: SymbolKind::Variable,
                    flags,
                    ty: self.symbol(param.ty),
                    container: None,
                    definition: None,
                    docs: None,
                }
                .into_ref()
            })
            .collect();
        Some(Signature {
            arguments: Arc::new(ListSymbolTable::new(arguments)),
            result: self.symbol(shape.result),
        })
    }

    fn class_location(&self) -> Option<(Option<Definition>, Option<String>)> {
        let Some(TypeData::Class { name, .. }) = self.data() else {
            return None;
        };
        let class = self.program.class(&name)?;
        Some((
            class.location.as_ref().map(|l| l.to_definition()),
            class.docs.clone(),
        ))
    }
}

impl Symbol for HostType {
    /// Declared name for classes, display text otherwise.
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> String {
        self.program.interner().display(self.id)
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Type
    }

    fn ty(&self) -> Option<SymbolRef> {
        None
    }

    fn is_callable(&self) -> bool {
        matches!(self.data(), Some(TypeData::Function(_)))
    }

    fn is_nullable(&self) -> bool {
        self.program.interner().is_nullable(self.id)
    }

    fn definition(&self) -> Option<Vec<Definition>> {
        let (definition, _) = self.class_location()?;
        definition.map(|d| vec![d])
    }

    fn documentation(&self) -> Option<String> {
        self.class_location().and_then(|(_, docs)| docs)
    }

    fn members(&self) -> SymbolTableRef {
        Arc::clone(self.members.get_or_init(|| {
            let members: Vec<SymbolRef> = self
                .program
                .members_of(self.id)
                .into_iter()
                .map(|member| HostMember::resolved(&self.program, member).into_ref())
                .collect();
            Arc::new(ListSymbolTable::new(members))
        }))
    }

    fn signatures(&self) -> Vec<Signature> {
        self.signature().into_iter().collect()
    }

    fn select_signature(&self, args: &[SymbolRef]) -> Option<Signature> {
        match self.data() {
            Some(TypeData::Function(shape)) if shape.accepts(args.len()) => self.signature(),
            _ => None,
        }
    }

    fn indexed(&self, _key: &SymbolRef, literal: Option<&LiteralValue>) -> Option<SymbolRef> {
        match self.data()? {
            TypeData::Array(element) => Some(self.symbol(element)),
            TypeData::Tuple(elements) => {
                let position = match literal {
                    Some(LiteralValue::Number(n)) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as usize),
                    _ => None,
                };
                match position {
                    Some(index) => elements.get(index).map(|&id| self.symbol(id)),
                    None => Some(self.symbol(self.program.interner().union(elements))),
                }
            }
            TypeData::Intrinsic(Intrinsic::String) => Some(self.symbol(self.id)),
            _ => None,
        }
    }

    fn type_arguments(&self) -> Option<Vec<SymbolRef>> {
        match self.data()? {
            TypeData::Class { args, .. } if !args.is_empty() => {
                Some(args.into_iter().map(|id| self.symbol(id)).collect())
            }
            TypeData::Array(element) => Some(vec![self.symbol(element)]),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A class member, a pipe, or a function parameter.
///
/// Behavior is delegated to the member's type.
pub struct HostMember {
    program: Arc<HostProgram>,
    name: String,
    kind: SymbolKind,
    flags: MemberFlags,
    ty: SymbolRef,
    container: Option<TypeId>,
    definition: Option<Definition>,
    docs: Option<String>,
}

impl fmt::Debug for HostMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMember")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("ty", &self.ty.name())
            .finish_non_exhaustive()
    }
}

impl HostMember {
    pub(crate) fn resolved(program: &Arc<HostProgram>, member: ResolvedMember<'_>) -> Self {
        let kind = if member.info.flags.contains(MemberFlags::METHOD) {
            SymbolKind::Method
        } else {
            SymbolKind::Property
        };
        Self {
            program: Arc::clone(program),
            name: member.info.name.clone(),
            kind,
            flags: member.info.flags,
            ty: program.type_symbol(member.ty),
            container: member.container,
            definition: member.info.location.as_ref().map(|l| l.to_definition()),
            docs: member.info.docs.clone(),
        }
    }

    pub(crate) fn pipe(
        program: &Arc<HostProgram>,
        name: &str,
        ty: SymbolRef,
        definition: Option<Definition>,
        docs: Option<String>,
    ) -> Self {
        Self {
            program: Arc::clone(program),
            name: name.to_string(),
            kind: SymbolKind::Pipe,
            flags: MemberFlags::METHOD,
            ty,
            container: None,
            definition,
            docs,
        }
    }

    #[must_use]
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    #[must_use]
    pub fn into_ref(self) -> SymbolRef {
        Arc::new(self)
    }
}

impl Symbol for HostMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn ty(&self) -> Option<SymbolRef> {
        Some(Arc::clone(&self.ty))
    }

    fn container(&self) -> Option<SymbolRef> {
        self.container.map(|id| self.program.type_symbol(id))
    }

    fn is_public(&self) -> bool {
        self.flags.is_public()
    }

    fn is_callable(&self) -> bool {
        self.ty.is_callable()
    }

    fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    fn definition(&self) -> Option<Vec<Definition>> {
        self.definition.clone().map(|d| vec![d])
    }

    fn documentation(&self) -> Option<String> {
        self.docs.clone()
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
