//! Declarative host program for the tmpl engine.
//!
//! A host program (classes, pipes, type aliases with textual types) is
//! loaded from JSON, validated, and exposed to the engine through
//! [`HostQuery`], an implementation of `tmpl_checker::SymbolQuery`.
//!
//! Template outlines ([`TemplateOutline`]) turn a template text plus the
//! list of its elements and directive matches into the engine's tree model,
//! so fixtures, benches and the CLI need no markup parser.
//!
//! This crate provides:
//! - `model` - Serde model of a host program
//! - `type_syntax` - Parser for type text
//! - `types` - Interned types (`TypeId`, `TypeData`, `TypeInterner`)
//! - `program` - Loaded, validated program and member resolution
//! - `symbols` - `HostType` and `HostMember` symbols
//! - `query` - `HostQuery`
//! - `outline` - Template outlines

pub mod error;
pub use error::{HostError, Result};

pub mod model;
pub use model::{AliasDecl, ClassDecl, HostModel, Location, MemberDecl, PipeDecl, Visibility};

pub mod type_syntax;
pub use type_syntax::{ParamExpr, TypeExpr, parse_type};

pub mod types;
pub use types::{Intrinsic, TypeData, TypeId, TypeInterner};

pub mod program;
pub use program::HostProgram;

pub mod symbols;
pub use symbols::{HostMember, HostType, MemberFlags};

pub mod query;
pub use query::HostQuery;

pub mod outline;
pub use outline::{AttrOutline, ElementOutline, NodeOutline, TemplateOutline};
