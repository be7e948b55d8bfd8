//! A loaded, validated host program.
//!
//! Loading parses every type text once and resolves it against the declared
//! names, so lookups made later by the checker cannot fail on malformed
//! input. Member types of generic classes are resolved per instantiation.

use crate::error::{HostError, Result};
use crate::model::{ClassDecl, HostModel, Location, MemberDecl, PipeDecl, Visibility};
use crate::symbols::{HostType, MemberFlags};
use crate::type_syntax::{TypeExpr, parse_type};
use crate::types::{FunctionShape, Intrinsic, ParamShape, TypeData, TypeId, TypeInterner};
use dashmap::DashMap;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::{Arc, Weak};
use tmpl_checker::SymbolRef;
use tmpl_common::limits::MAX_TYPE_CHAIN_DEPTH;
use tracing::{debug, error};

/// Type parameter name to the type bound to it.
pub type TypeEnv = FxHashMap<String, TypeId>;

/// Members every string has.
const STRING_MEMBERS: &[(&str, &str)] = &[
    ("length", "number"),
    ("toUpperCase", "() => string"),
    ("toLowerCase", "() => string"),
    ("trim", "() => string"),
    ("includes", "(search: string) => boolean"),
    ("startsWith", "(search: string) => boolean"),
    ("split", "(separator: string) => string[]"),
];

/// Members every array has; `T` is the element type.
const ARRAY_MEMBERS: &[(&str, &str)] = &[
    ("length", "number"),
    ("includes", "(item: T) => boolean"),
    ("indexOf", "(item: T) => number"),
    ("join", "(separator?: string) => string"),
    ("slice", "(start?: number, end?: number) => T[]"),
    ("concat", "(items: T[]) => T[]"),
];

#[derive(Debug)]
pub struct MemberInfo {
    pub name: String,
    pub ty: TypeExpr,
    pub flags: MemberFlags,
    pub docs: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug)]
pub struct ClassInfo {
    pub name: String,
    pub type_parameters: Vec<String>,
    pub members: Vec<MemberInfo>,
    pub context: Option<TypeExpr>,
    pub docs: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug)]
pub struct PipeInfo {
    pub name: String,
    pub ty: TypeExpr,
    pub docs: Option<String>,
    pub location: Option<Location>,
}

/// A member with its type resolved for one receiver.
#[derive(Clone, Debug)]
pub struct ResolvedMember<'p> {
    pub info: &'p MemberInfo,
    pub ty: TypeId,
    /// The declaring class instance, when there is one.
    pub container: Option<TypeId>,
}

#[derive(Debug)]
pub struct HostProgram {
    interner: TypeInterner,
    classes: IndexMap<String, ClassInfo, FxBuildHasher>,
    aliases: FxHashMap<String, TypeExpr>,
    pipes: Vec<PipeInfo>,
    string_members: Vec<MemberInfo>,
    array_members: Vec<MemberInfo>,
    symbols: DashMap<TypeId, Weak<HostType>, FxBuildHasher>,
}

impl HostProgram {
    pub fn from_json(text: &str) -> Result<Arc<Self>> {
        Self::load(HostModel::from_json(text)?)
    }

    /// Parse and validate a model.
    pub fn load(model: HostModel) -> Result<Arc<Self>> {
        let mut classes = IndexMap::with_hasher(FxBuildHasher);
        for decl in model.classes {
            if classes.contains_key(&decl.name) {
                return Err(HostError::Duplicate { name: decl.name });
            }
            let info = class_info(decl)?;
            classes.insert(info.name.clone(), info);
        }

        let mut aliases = FxHashMap::default();
        for alias in model.aliases {
            if classes.contains_key(&alias.name) || aliases.contains_key(&alias.name) {
                return Err(HostError::Duplicate { name: alias.name });
            }
            aliases.insert(alias.name, parse_type(&alias.ty)?);
        }

        let mut pipes: Vec<PipeInfo> = Vec::new();
        for PipeDecl {
            name,
            ty,
            docs,
            location,
        } in model.pipes
        {
            if pipes.iter().any(|p| p.name == name) {
                return Err(HostError::Duplicate { name });
            }
            pipes.push(PipeInfo {
                name,
                ty: parse_type(&ty)?,
                docs,
                location,
            });
        }

        let program = Self {
            interner: TypeInterner::new(),
            classes,
            aliases,
            pipes,
            string_members: builtin_members(STRING_MEMBERS)?,
            array_members: builtin_members(ARRAY_MEMBERS)?,
            symbols: DashMap::with_hasher(FxBuildHasher),
        };
        program.validate()?;
        debug!(
            classes = program.classes.len(),
            pipes = program.pipes.len(),
            aliases = program.aliases.len(),
            "host program loaded"
        );
        Ok(Arc::new(program))
    }

    /// Resolve every declared type once so unknown names surface at load.
    fn validate(&self) -> Result<()> {
        for (name, expr) in &self.aliases {
            self.resolve(expr, &TypeEnv::default(), name)?;
        }
        for class in self.classes.values() {
            let env = self.param_env(class);
            for member in &class.members {
                self.resolve(&member.ty, &env, &format!("{}.{}", class.name, member.name))?;
            }
            if let Some(context) = &class.context {
                self.resolve(context, &env, &format!("the context of {}", class.name))?;
            }
        }
        for pipe in &self.pipes {
            let ty = self.resolve(&pipe.ty, &TypeEnv::default(), &format!("pipe '{}'", pipe.name))?;
            if !matches!(self.interner.lookup(ty), Some(TypeData::Function(_))) {
                return Err(HostError::TypeSyntax {
                    text: self.interner.display(ty),
                    offset: 0,
                    message: format!("pipe '{}' must have a function type", pipe.name),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    #[must_use]
    pub fn pipes(&self) -> &[PipeInfo] {
        &self.pipes
    }

    /// A class instantiated with its own (unbound) type parameters.
    #[must_use]
    pub fn instance_type(&self, name: &str) -> Option<TypeId> {
        let class = self.classes.get(name)?;
        let args = class
            .type_parameters
            .iter()
            .map(|param| self.interner.intern(TypeData::Param(param.clone())))
            .collect();
        Some(self.interner.intern(TypeData::Class {
            name: class.name.clone(),
            args,
        }))
    }

    /// Context type a structural directive class declares, with its type
    /// parameters left unbound.
    #[must_use]
    pub fn context_type(&self, name: &str) -> Option<TypeId> {
        let class = self.classes.get(name)?;
        let context = class.context.as_ref()?;
        Some(self.resolve_or_any(context, &self.param_env(class), &class.name))
    }

    pub fn pipe_type(&self, pipe: &PipeInfo) -> TypeId {
        self.resolve_or_any(&pipe.ty, &TypeEnv::default(), &pipe.name)
    }

    fn param_env(&self, class: &ClassInfo) -> TypeEnv {
        class
            .type_parameters
            .iter()
            .map(|param| (param.clone(), self.interner.intern(TypeData::Param(param.clone()))))
            .collect()
    }

    /// Resolve type text against declared names; `context` names the
    /// declaration for error messages.
    pub fn resolve(&self, expr: &TypeExpr, env: &TypeEnv, context: &str) -> Result<TypeId> {
        self.resolve_at(expr, env, context, 0)
    }

    fn resolve_or_any(&self, expr: &TypeExpr, env: &TypeEnv, context: &str) -> TypeId {
        self.resolve(expr, env, context).unwrap_or_else(|err| {
            error!(%err, context, "validated type failed to resolve");
            debug_assert!(false, "validated type failed to resolve: {err}");
            TypeId::ANY
        })
    }

    fn resolve_at(&self, expr: &TypeExpr, env: &TypeEnv, context: &str, depth: u32) -> Result<TypeId> {
        let recurse = |e: &TypeExpr| self.resolve_at(e, env, context, depth);
        Ok(match expr {
            TypeExpr::Named { name, args } => return self.resolve_named(name, args, env, context, depth),
            TypeExpr::Array(element) => {
                let element = recurse(element)?;
                self.interner.array(element)
            }
            TypeExpr::Tuple(elements) => {
                let elements = elements.iter().map(recurse).collect::<Result<Vec<_>>>()?;
                self.interner.intern(TypeData::Tuple(elements))
            }
            TypeExpr::Union(members) => {
                let members = members.iter().map(recurse).collect::<Result<Vec<_>>>()?;
                self.interner.union(members)
            }
            TypeExpr::Function { params, result } => {
                let params = params
                    .iter()
                    .map(|param| {
                        Ok(ParamShape {
                            name: param.name.clone(),
                            ty: recurse(&param.ty)?,
                            optional: param.optional,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let result = recurse(result)?;
                self.interner.intern(TypeData::Function(FunctionShape { params, result }))
            }
        })
    }

    fn resolve_named(
        &self,
        name: &str,
        args: &[TypeExpr],
        env: &TypeEnv,
        context: &str,
        depth: u32,
    ) -> Result<TypeId> {
        let arity = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(HostError::TypeArity {
                    name: name.to_string(),
                    expected,
                    found: args.len(),
                })
            }
        };
        if let Some(&bound) = env.get(name) {
            arity(0)?;
            return Ok(bound);
        }
        if let Some(intrinsic) = Intrinsic::from_name(name) {
            arity(0)?;
            return Ok(self.interner.intrinsic(intrinsic));
        }
        if name == "Array" || name == "ReadonlyArray" {
            arity(1)?;
            let element = self.resolve_at(&args[0], env, context, depth)?;
            return Ok(self.interner.array(element));
        }
        if let Some(alias) = self.aliases.get(name) {
            arity(0)?;
            if depth >= MAX_TYPE_CHAIN_DEPTH {
                return Err(HostError::CyclicAlias {
                    name: name.to_string(),
                });
            }
            return self.resolve_at(alias, &TypeEnv::default(), context, depth + 1);
        }
        let Some(class) = self.classes.get(name) else {
            return Err(HostError::UnknownType {
                name: name.to_string(),
                context: context.to_string(),
            });
        };
        let args = if args.is_empty() {
            // A bare generic class reads as `any` for each parameter.
            vec![TypeId::ANY; class.type_parameters.len()]
        } else {
            arity(class.type_parameters.len())?;
            args.iter()
                .map(|arg| self.resolve_at(arg, env, context, depth))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(self.interner.intern(TypeData::Class {
            name: class.name.clone(),
            args,
        }))
    }

    /// Members of a type, resolved for that type.
    ///
    /// A union exposes the members all its non-nullish members share, each
    /// typed as the union of the per-member types.
    pub fn members_of(&self, id: TypeId) -> Vec<ResolvedMember<'_>> {
        let Some(data) = self.interner.lookup(id) else {
            return Vec::new();
        };
        match data {
            TypeData::Class { name, args } => {
                let Some(class) = self.classes.get(&name) else {
                    return Vec::new();
                };
                let env: TypeEnv = class.type_parameters.iter().cloned().zip(args).collect();
                class
                    .members
                    .iter()
                    .map(|info| ResolvedMember {
                        info,
                        ty: self.resolve_or_any(&info.ty, &env, &info.name),
                        container: Some(id),
                    })
                    .collect()
            }
            TypeData::Array(element) => {
                let env: TypeEnv = std::iter::once(("T".to_string(), element)).collect();
                self.builtin_members(&self.array_members, &env)
            }
            TypeData::Intrinsic(Intrinsic::String) => {
                self.builtin_members(&self.string_members, &TypeEnv::default())
            }
            TypeData::Union(_) => self.union_members(self.interner.non_nullable(id)),
            _ => Vec::new(),
        }
    }

    fn builtin_members<'p>(&'p self, members: &'p [MemberInfo], env: &TypeEnv) -> Vec<ResolvedMember<'p>> {
        members
            .iter()
            .map(|info| ResolvedMember {
                info,
                ty: self.resolve_or_any(&info.ty, env, &info.name),
                container: None,
            })
            .collect()
    }

    fn union_members(&self, id: TypeId) -> Vec<ResolvedMember<'_>> {
        let Some(TypeData::Union(members)) = self.interner.lookup(id) else {
            return self.members_of(id);
        };
        let mut per_member = members.iter().map(|&m| self.members_of(m));
        let Some(first) = per_member.next() else {
            return Vec::new();
        };
        let rest: Vec<_> = per_member.collect();
        first
            .into_iter()
            .filter_map(|member| {
                let mut types = vec![member.ty];
                for other in &rest {
                    let same = other.iter().find(|m| m.info.name == member.info.name)?;
                    types.push(same.ty);
                }
                Some(ResolvedMember {
                    ty: self.interner.union(types),
                    container: None,
                    ..member
                })
            })
            .collect()
    }

    /// Shared symbol for a type id; the same `Arc` while anyone holds it.
    pub fn type_symbol(self: &Arc<Self>, id: TypeId) -> SymbolRef {
        if let Some(existing) = self.symbols.get(&id).and_then(|weak| weak.upgrade()) {
            return existing;
        }
        let symbol = Arc::new(HostType::new(Arc::clone(self), id));
        self.symbols.insert(id, Arc::downgrade(&symbol));
        symbol
    }
}

fn class_info(decl: ClassDecl) -> Result<ClassInfo> {
    let mut members: Vec<MemberInfo> = Vec::with_capacity(decl.members.len());
    for member in decl.members {
        if members.iter().any(|m| m.name == member.name) {
            return Err(HostError::Duplicate {
                name: format!("{}.{}", decl.name, member.name),
            });
        }
        members.push(member_info(member)?);
    }
    Ok(ClassInfo {
        name: decl.name,
        type_parameters: decl.type_parameters,
        members,
        context: decl.context.as_deref().map(parse_type).transpose()?,
        docs: decl.docs,
        location: decl.location,
    })
}

fn member_info(decl: MemberDecl) -> Result<MemberInfo> {
    let mut ty = parse_type(&decl.ty)?;
    let mut flags = MemberFlags::empty();
    flags.set(MemberFlags::PRIVATE, decl.visibility == Visibility::Private);
    flags.set(MemberFlags::PROTECTED, decl.visibility == Visibility::Protected);
    flags.set(MemberFlags::READONLY, decl.readonly);
    flags.set(MemberFlags::METHOD, ty.is_function());
    if decl.optional {
        flags |= MemberFlags::OPTIONAL;
        ty = TypeExpr::Union(vec![ty, TypeExpr::named("undefined")]);
    }
    Ok(MemberInfo {
        name: decl.name,
        ty,
        flags,
        docs: decl.docs,
        location: decl.location,
    })
}

fn builtin_members(table: &[(&str, &str)]) -> Result<Vec<MemberInfo>> {
    table
        .iter()
        .map(|&(name, ty)| {
            let ty = parse_type(ty)?;
            let mut flags = MemberFlags::READONLY;
            flags.set(MemberFlags::METHOD, ty.is_function());
            Ok(MemberInfo {
                name: name.to_string(),
                ty,
                flags,
                docs: None,
                location: None,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod tests;
