//! Interned host types.
//!
//! Every structurally distinct type gets one [`TypeId`]; two symbols denote
//! the same type exactly when their ids are equal. The interner is shared
//! by all queries of a program and may be used from several threads.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU32, Ordering};
use tmpl_checker::BuiltinType;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(Intrinsic::Any as u32);
    pub const STRING: TypeId = TypeId(Intrinsic::String as u32);
    pub const NUMBER: TypeId = TypeId(Intrinsic::Number as u32);
    pub const BOOLEAN: TypeId = TypeId(Intrinsic::Boolean as u32);
    pub const NULL: TypeId = TypeId(Intrinsic::Null as u32);
    pub const UNDEFINED: TypeId = TypeId(Intrinsic::Undefined as u32);
    pub const VOID: TypeId = TypeId(Intrinsic::Void as u32);
    pub const NEVER: TypeId = TypeId(Intrinsic::Never as u32);
    pub const OBJECT: TypeId = TypeId(Intrinsic::Object as u32);
}

/// Types with a keyword name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Any,
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Void,
    Never,
    Object,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 9] = [
        Self::Any,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Null,
        Self::Undefined,
        Self::Void,
        Self::Never,
        Self::Object,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "any" | "unknown" => Self::Any,
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "void" => Self::Void,
            "never" => Self::Never,
            "object" => Self::Object,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Never => "never",
            Self::Object => "object",
        }
    }

    #[must_use]
    pub const fn kind(self) -> BuiltinType {
        match self {
            Self::Any => BuiltinType::Any,
            Self::String => BuiltinType::String,
            Self::Number => BuiltinType::Number,
            Self::Boolean => BuiltinType::Boolean,
            Self::Null => BuiltinType::Null,
            Self::Undefined | Self::Void => BuiltinType::Undefined,
            Self::Never | Self::Object => BuiltinType::Other,
        }
    }

    #[must_use]
    pub const fn is_nullish(self) -> bool {
        matches!(self, Self::Null | Self::Undefined | Self::Void)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamShape {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamShape>,
    pub result: TypeId,
}

impl FunctionShape {
    #[must_use]
    pub fn required(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }

    #[must_use]
    pub fn accepts(&self, arity: usize) -> bool {
        self.required() <= arity && arity <= self.params.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(Intrinsic),
    /// A type parameter nothing substituted.
    Param(String),
    /// A class instance with its type arguments.
    Class { name: String, args: Vec<TypeId> },
    Array(TypeId),
    Tuple(Vec<TypeId>),
    /// Flattened, deduplicated, at least two members.
    Union(Vec<TypeId>),
    Function(FunctionShape),
}

/// Thread-safe type interner.
#[derive(Debug)]
pub struct TypeInterner {
    ids: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: DashMap<TypeId, TypeData, FxBuildHasher>,
    next_id: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            ids: DashMap::with_hasher(FxBuildHasher),
            types: DashMap::with_hasher(FxBuildHasher),
            next_id: AtomicU32::new(0),
        };
        for intrinsic in Intrinsic::ALL {
            interner.intern(TypeData::Intrinsic(intrinsic));
        }
        interner
    }

    /// Id of `data`, allocating one on first sight.
    ///
    /// Unions should go through [`TypeInterner::union`] so they are normalized.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.ids.get(&data) {
            return *id;
        }
        match self.ids.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeId(self.next_id.fetch_add(1, Ordering::SeqCst));
                trace!(id = id.0, data = ?entry.key(), "intern type");
                self.types.insert(id, entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    #[must_use]
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types.get(&id).map(|data| data.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[must_use]
    pub fn intrinsic(&self, intrinsic: Intrinsic) -> TypeId {
        self.intern(TypeData::Intrinsic(intrinsic))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    /// Normalized union: nested unions are flattened, duplicates and
    /// `never` dropped, and `any` absorbs everything.
    pub fn union(&self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::new();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(inner)) => {
                    for id in inner {
                        if !flat.contains(&id) {
                            flat.push(id);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        flat.retain(|&id| id != TypeId::NEVER);
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    /// Whether `null`, `undefined` or `void` is a member of `id`.
    #[must_use]
    pub fn is_nullable(&self, id: TypeId) -> bool {
        match self.lookup(id) {
            Some(TypeData::Union(members)) => members.iter().any(|&m| self.is_nullish(m)),
            _ => false,
        }
    }

    fn is_nullish(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), Some(TypeData::Intrinsic(i)) if i.is_nullish())
    }

    /// `id` without its nullish members.
    pub fn non_nullable(&self, id: TypeId) -> TypeId {
        match self.lookup(id) {
            Some(TypeData::Union(members)) => {
                let rest: Vec<TypeId> = members.into_iter().filter(|&m| !self.is_nullish(m)).collect();
                self.union(rest)
            }
            _ => id,
        }
    }

    /// Coarse kind. A union is its members' kind when they all agree.
    #[must_use]
    pub fn kind(&self, id: TypeId) -> BuiltinType {
        match self.lookup(id) {
            Some(TypeData::Intrinsic(intrinsic)) => intrinsic.kind(),
            Some(TypeData::Param(_)) => BuiltinType::Unbound,
            Some(TypeData::Union(members)) => {
                let mut kinds = members.iter().map(|&m| self.kind(m));
                let first = kinds.next().unwrap_or(BuiltinType::Other);
                if kinds.all(|k| k == first) {
                    first
                } else {
                    BuiltinType::Other
                }
            }
            _ => BuiltinType::Other,
        }
    }

    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(id, &mut out);
        out
    }

    fn write_type(&self, id: TypeId, out: &mut String) {
        let Some(data) = self.lookup(id) else {
            out.push_str("?");
            return;
        };
        match data {
            TypeData::Intrinsic(intrinsic) => out.push_str(intrinsic.name()),
            TypeData::Param(name) => out.push_str(&name),
            TypeData::Class { name, args } => {
                out.push_str(&name);
                if !args.is_empty() {
                    out.push('<');
                    self.write_list(&args, ", ", out);
                    out.push('>');
                }
            }
            TypeData::Array(element) => {
                let wrap = matches!(
                    self.lookup(element),
                    Some(TypeData::Union(_) | TypeData::Function(_))
                );
                if wrap {
                    out.push('(');
                }
                self.write_type(element, out);
                if wrap {
                    out.push(')');
                }
                out.push_str("[]");
            }
            TypeData::Tuple(elements) => {
                out.push('[');
                self.write_list(&elements, ", ", out);
                out.push(']');
            }
            TypeData::Union(members) => self.write_list(&members, " | ", out),
            TypeData::Function(shape) => {
                out.push('(');
                for (index, param) in shape.params.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}{}: ", param.name, if param.optional { "?" } else { "" });
                    self.write_type(param.ty, out);
                }
                out.push_str(") => ");
                self.write_type(shape.result, out);
            }
        }
    }

    fn write_list(&self, ids: &[TypeId], separator: &str, out: &mut String) {
        for (index, &id) in ids.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            self.write_type(id, out);
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
