//! [`SymbolQuery`] over a [`HostProgram`].

use crate::error::{HostError, Result};
use crate::outline::TemplateOutline;
use crate::program::HostProgram;
use crate::symbols::{HostMember, HostType};
use crate::types::{TypeData, TypeId};
use std::sync::Arc;
use tmpl_checker::{
    AnalysisSession, BuiltinType, ListSymbolTable, SymbolQuery, SymbolRef, SymbolTableRef,
    TemplateInfo,
};
use tmpl_common::limits::MAX_TYPE_CHAIN_DEPTH;
use tmpl_parser::template::TypeReference;
use tracing::debug;

/// Name of the type standing in for an unresolved type parameter.
const UNBOUND_PARAMETER: &str = "T";

#[derive(Clone, Debug)]
pub struct HostQuery {
    program: Arc<HostProgram>,
}

impl HostQuery {
    #[must_use]
    pub fn new(program: Arc<HostProgram>) -> Self {
        Self { program }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(HostProgram::from_json(text)?))
    }

    #[must_use]
    pub fn program(&self) -> &Arc<HostProgram> {
        &self.program
    }

    #[must_use]
    pub fn into_session(self) -> AnalysisSession {
        AnalysisSession::new(Arc::new(self))
    }

    /// Build the template of `outline`, with the members of its component.
    pub fn template_info(&self, outline: &TemplateOutline) -> Result<TemplateInfo> {
        let component = self
            .program
            .instance_type(&outline.component)
            .ok_or_else(|| HostError::UnknownType {
                name: outline.component.clone(),
                context: format!("template '{}'", outline.file_name),
            })?;
        let members = self.program.type_symbol(component).members();
        let nodes = outline.build()?;
        debug!(file = %outline.file_name, nodes = nodes.len(), "template outline built");
        Ok(TemplateInfo::new(outline.file_name.clone(), members, nodes).with_offset(outline.offset))
    }

    /// Type id behind a symbol, following value symbols to their type.
    fn type_id(&self, symbol: &SymbolRef) -> Option<TypeId> {
        let mut current = Arc::clone(symbol);
        for _ in 0..MAX_TYPE_CHAIN_DEPTH {
            if let Some(host) = HostType::of(current.as_ref()) {
                return Some(host.id());
            }
            current = current.ty()?;
        }
        None
    }

    fn symbol(&self, id: TypeId) -> SymbolRef {
        self.program.type_symbol(id)
    }
}

impl SymbolQuery for HostQuery {
    fn get_type_kind(&self, symbol: &SymbolRef) -> BuiltinType {
        self.type_id(symbol)
            .map_or(BuiltinType::Other, |id| self.program.interner().kind(id))
    }

    fn get_builtin_type(&self, kind: BuiltinType) -> SymbolRef {
        let id = match kind {
            BuiltinType::Any => TypeId::ANY,
            BuiltinType::String => TypeId::STRING,
            BuiltinType::Number => TypeId::NUMBER,
            BuiltinType::Boolean => TypeId::BOOLEAN,
            BuiltinType::Null => TypeId::NULL,
            BuiltinType::Undefined => TypeId::UNDEFINED,
            BuiltinType::Other => TypeId::OBJECT,
            BuiltinType::Unbound => self
                .program
                .interner()
                .intern(TypeData::Param(UNBOUND_PARAMETER.to_string())),
        };
        self.symbol(id)
    }

    fn get_type_union(&self, types: &[SymbolRef]) -> SymbolRef {
        let Some((first, rest)) = types.split_first() else {
            return self.symbol(TypeId::ANY);
        };
        let first_id = self.type_id(first);
        let same = rest.iter().all(|other| {
            Arc::ptr_eq(first, other) || (first_id.is_some() && self.type_id(other) == first_id)
        });
        if same {
            Arc::clone(first)
        } else {
            self.symbol(TypeId::ANY)
        }
    }

    fn get_array_type(&self, element: &SymbolRef) -> SymbolRef {
        let element = self.type_id(element).unwrap_or(TypeId::ANY);
        self.symbol(self.program.interner().array(element))
    }

    fn get_element_type(&self, array: &SymbolRef) -> Option<SymbolRef> {
        let interner = self.program.interner();
        match interner.lookup(self.type_id(array)?)? {
            TypeData::Array(element) => Some(self.symbol(element)),
            TypeData::Tuple(elements) => Some(self.symbol(interner.union(elements))),
            _ => None,
        }
    }

    fn get_non_nullable_type(&self, symbol: &SymbolRef) -> SymbolRef {
        let Some(id) = self.type_id(symbol) else {
            return self.symbol(TypeId::ANY);
        };
        let stripped = self.program.interner().non_nullable(id);
        if stripped == id {
            Arc::clone(symbol)
        } else {
            self.symbol(stripped)
        }
    }

    fn get_pipes(&self) -> SymbolTableRef {
        let pipes: Vec<SymbolRef> = self
            .program
            .pipes()
            .iter()
            .map(|pipe| {
                let ty = self.symbol(self.program.pipe_type(pipe));
                let definition = pipe.location.as_ref().map(|l| l.to_definition());
                HostMember::pipe(&self.program, &pipe.name, ty, definition, pipe.docs.clone())
                    .into_ref()
            })
            .collect();
        Arc::new(ListSymbolTable::new(pipes))
    }

    fn get_template_context(&self, type_ref: &TypeReference) -> Option<SymbolTableRef> {
        let context = self.program.context_type(&type_ref.name)?;
        Some(self.symbol(context).members())
    }

    fn get_type_symbol(&self, type_ref: &TypeReference) -> Option<SymbolRef> {
        let id = self.program.instance_type(&type_ref.name)?;
        Some(self.symbol(id))
    }
}

#[cfg(test)]
#[path = "../tests/query_tests.rs"]
mod tests;
