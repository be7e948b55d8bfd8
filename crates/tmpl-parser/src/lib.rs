//! Expression parser and template tree model for the tmpl analysis engine.
//!
//! This crate provides:
//! - `ast` - The closed expression AST (`ExprKind`) stored in an `ExprArena`
//! - `parser` - Binding, action and interpolation entry points
//! - `microsyntax` - Structural attribute bindings (`let item of items; trackBy: id`)
//! - `template` - The element/template tree the engine walks, and path search

pub mod ast;
pub use ast::{
    BinaryOperator, ExprArena, ExprId, ExprKind, ExprNode, LiteralMapKey, LiteralValue,
    ParsedExpression,
};

pub mod parser;
pub use parser::{parse_action, parse_binding, parse_interpolation};

pub mod microsyntax;
pub use microsyntax::{
    IMPLICIT_CONTEXT_MEMBER, TemplateBinding, TemplateBindingParseResult, parse_template_bindings,
};

pub mod template;
pub use template::{
    BoundAttribute, BoundEvent, BoundText, DirectiveMatch, DirectiveProperty, Element,
    EmbeddedTemplate, NodeRef, Reference, TemplateNode, TemplatePath, Text, TextAttribute,
    TypeReference, Variable, find_template_path, walk_template,
};
