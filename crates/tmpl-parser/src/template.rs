//! Template tree model.
//!
//! The markup parser is not part of this workspace; whoever owns it builds
//! these nodes (with the directives the compiler matched on each element)
//! and hands them to the engine. Spans are offsets into the template text.
//!
//! Expression-bearing nodes own a [`ParsedExpression`] whose `base_offset` is
//! the template offset of the expression text.
//!
//! Structural attributes (`*ngFor="..."`) are desugared here: the
//! microsyntax entries become template variables and synthetic directive
//! inputs on the [`EmbeddedTemplate`] (see [`EmbeddedTemplate::structural`]).

use crate::ast::ParsedExpression;
use crate::microsyntax::{IMPLICIT_CONTEXT_MEMBER, TemplateBindingParseResult, parse_template_bindings};
use crate::parser::{parse_action, parse_binding, parse_interpolation};
use serde::{Deserialize, Serialize};
use tmpl_common::span::Span;
use tracing::trace;

// =============================================================================
// Directives
// =============================================================================

/// Reference to a class declared in the host program.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl TypeReference {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_path: None,
        }
    }
}

/// A directive input or output: class field and public binding name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveProperty {
    pub field: String,
    pub binding: String,
}

/// A component or directive the compiler matched on an element or template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMatch {
    #[serde(rename = "type")]
    pub type_ref: TypeReference,
    #[serde(default)]
    pub is_component: bool,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub export_as: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<DirectiveProperty>,
    #[serde(default)]
    pub outputs: Vec<DirectiveProperty>,
}

impl DirectiveMatch {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_ref: TypeReference::new(type_name),
            is_component: false,
            selector: None,
            export_as: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn component(mut self) -> Self {
        self.is_component = true;
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_export_as(mut self, name: impl Into<String>) -> Self {
        self.export_as.push(name.into());
        self
    }

    /// Add an input whose binding name equals the field name.
    #[must_use]
    pub fn with_input(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.with_aliased_input(field.clone(), field)
    }

    #[must_use]
    pub fn with_aliased_input(mut self, field: impl Into<String>, binding: impl Into<String>) -> Self {
        self.inputs.push(DirectiveProperty {
            field: field.into(),
            binding: binding.into(),
        });
        self
    }

    /// Add an output whose event name equals the field name.
    #[must_use]
    pub fn with_output(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.outputs.push(DirectiveProperty {
            binding: field.clone(),
            field,
        });
        self
    }

    /// Class field backing the input bound as `binding`.
    #[must_use]
    pub fn input_field(&self, binding: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|p| p.binding == binding)
            .map(|p| p.field.as_str())
    }

    /// Class field backing the output emitted as `event`.
    #[must_use]
    pub fn output_field(&self, event: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|p| p.binding == event)
            .map(|p| p.field.as_str())
    }

    #[must_use]
    pub fn exports(&self, name: &str) -> bool {
        self.export_as.iter().any(|e| e == name)
    }

    /// Whether the selector names element `tag`.
    #[must_use]
    pub fn selects_element(&self, tag: &str) -> bool {
        self.selector_parts()
            .any(|part| selector_element(part).is_some_and(|el| el.eq_ignore_ascii_case(tag)))
    }

    /// Whether the selector requires attribute `name`.
    #[must_use]
    pub fn selects_attribute(&self, name: &str) -> bool {
        self.selector_parts()
            .any(|part| selector_attributes(part).any(|attr| attr.eq_ignore_ascii_case(name)))
    }

    fn selector_parts(&self) -> impl Iterator<Item = &str> {
        self.selector
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Element name of a simple selector (`input[type=text]` -> `input`).
fn selector_element(part: &str) -> Option<&str> {
    let end = part.find(['[', '.', ':']).unwrap_or(part.len());
    let name = part[..end].trim();
    (!name.is_empty()).then_some(name)
}

/// Attribute names of a simple selector (`[a][b=c]` -> `a`, `b`).
fn selector_attributes(part: &str) -> impl Iterator<Item = &str> {
    part.split('[').skip(1).filter_map(|chunk| {
        let inner = chunk.split(']').next()?;
        let name = inner.split('=').next()?.trim();
        (!name.is_empty()).then_some(name)
    })
}

// =============================================================================
// Leaf nodes
// =============================================================================

/// A plain `name="value"` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextAttribute {
    pub name: String,
    pub value: String,
    pub span: Span,
    pub value_span: Option<Span>,
}

impl TextAttribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, span: Span, value_span: Option<Span>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
            value_span,
        }
    }
}

/// A property binding (`[value]="expr"`) or a structural input (`ngForOf`).
#[derive(Clone, Debug)]
pub struct BoundAttribute {
    /// Binding name without brackets.
    pub name: String,
    pub span: Span,
    pub key_span: Span,
    pub value_span: Span,
    pub value: ParsedExpression,
}

impl BoundAttribute {
    /// Parse the binding value found at `value_span` of `template`.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span, key_span: Span, value_span: Span, template: &str) -> Self {
        let name = name.into();
        let text = value_span.slice(template).unwrap_or_default();
        let value = parse_binding(text, &format!("[{name}]"), value_span.start);
        Self {
            name,
            span,
            key_span,
            value_span,
            value,
        }
    }
}

/// An event binding (`(click)="handler()"`).
#[derive(Clone, Debug)]
pub struct BoundEvent {
    pub name: String,
    pub span: Span,
    pub key_span: Span,
    pub handler_span: Span,
    pub handler: ParsedExpression,
}

impl BoundEvent {
    /// Parse the handler found at `handler_span` of `template`.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span, key_span: Span, handler_span: Span, template: &str) -> Self {
        let name = name.into();
        let text = handler_span.slice(template).unwrap_or_default();
        let handler = parse_action(text, &format!("({name})"), handler_span.start);
        Self {
            name,
            span,
            key_span,
            handler_span,
            handler,
        }
    }
}

/// An element reference (`#box` or `#form="ngForm"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    /// Requested export name; empty for a bare `#name`.
    pub value: String,
    pub span: Span,
}

impl Reference {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
        }
    }
}

/// A template variable (`let-item` or a microsyntax `let`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    /// Context member the variable reads.
    pub value: String,
    pub span: Span,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
        }
    }
}

/// Text with interpolations.
#[derive(Clone, Debug)]
pub struct BoundText {
    pub span: Span,
    pub value: ParsedExpression,
}

impl BoundText {
    /// Parse the text at `span` of `template`; `None` when it holds no `{{ }}`.
    #[must_use]
    pub fn new(span: Span, template: &str) -> Option<Self> {
        let text = span.slice(template)?;
        let value = parse_interpolation(text, "text", span.start)?;
        Some(Self { span, value })
    }
}

/// Static text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub span: Span,
    pub value: String,
}

// =============================================================================
// Containers
// =============================================================================

#[derive(Clone, Debug)]
pub struct Element {
    pub name: String,
    pub span: Span,
    pub attrs: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub references: Vec<Reference>,
    pub directives: Vec<DirectiveMatch>,
    pub children: Vec<TemplateNode>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            attrs: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            references: Vec::new(),
            directives: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, attr: TextAttribute) -> Self {
        self.attrs.push(attr);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: BoundAttribute) -> Self {
        self.inputs.push(input);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: BoundEvent) -> Self {
        self.outputs.push(output);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveMatch) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<TemplateNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// An embedded template: `<ng-template>` or the desugaring of a structural attribute.
#[derive(Clone, Debug)]
pub struct EmbeddedTemplate {
    pub span: Span,
    /// The `*key="..."` attribute this template was desugared from.
    pub structural_attr: Option<TextAttribute>,
    /// Parsed microsyntax of `structural_attr`.
    pub microsyntax: Option<TemplateBindingParseResult>,
    pub attrs: Vec<TextAttribute>,
    /// Explicit `[input]` bindings on an `<ng-template>`.
    pub inputs: Vec<BoundAttribute>,
    /// Inputs produced by the microsyntax (`ngForOf`, `ngIf`, ...).
    pub template_bindings: Vec<BoundAttribute>,
    pub references: Vec<Reference>,
    pub variables: Vec<Variable>,
    pub directives: Vec<DirectiveMatch>,
    pub children: Vec<TemplateNode>,
}

impl EmbeddedTemplate {
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            span,
            structural_attr: None,
            microsyntax: None,
            attrs: Vec::new(),
            inputs: Vec::new(),
            template_bindings: Vec::new(),
            references: Vec::new(),
            variables: Vec::new(),
            directives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Desugar `<el *key="value">` into a template wrapping `el`.
    ///
    /// Microsyntax variables become template variables and valued entries
    /// become inputs on the template; each value is re-parsed as a standalone
    /// binding so it carries its own template offset.
    #[must_use]
    pub fn structural(attr: TextAttribute, template: &str, directives: Vec<DirectiveMatch>, child: Element) -> Self {
        let template_key = attr.name.trim_start_matches('*').to_string();
        let base = attr.value_span.map_or(attr.span.end, |s| s.start);
        let value_text = attr.value_span.and_then(|s| s.slice(template)).unwrap_or_default();
        let parsed = parse_template_bindings(&template_key, value_text, &attr.name, base);
        trace!(key = %template_key, bindings = parsed.bindings.len(), "desugar structural attribute");

        let mut variables = Vec::new();
        let mut template_bindings = Vec::new();
        for binding in &parsed.bindings {
            let span = binding.span.offset(base);
            if binding.key_is_var {
                let value = binding.name.as_deref().unwrap_or(IMPLICIT_CONTEXT_MEMBER);
                variables.push(Variable::new(binding.key.clone(), value, span));
            } else if let Some(value_span) = binding.value_span {
                let key_span = binding.key_span.map_or(attr.span, |s| s.offset(base));
                template_bindings.push(BoundAttribute::new(
                    binding.key.clone(),
                    span,
                    key_span,
                    value_span.offset(base),
                    template,
                ));
            }
        }

        let mut result = Self::new(child.span);
        result.structural_attr = Some(attr);
        result.microsyntax = Some(parsed);
        result.variables = variables;
        result.template_bindings = template_bindings;
        result.directives = directives;
        result.children.push(TemplateNode::Element(child));
        result
    }

    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: BoundAttribute) -> Self {
        self.inputs.push(input);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveMatch) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<TemplateNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Input bound under `name`, looking at microsyntax inputs first.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&BoundAttribute> {
        self.template_bindings
            .iter()
            .chain(&self.inputs)
            .find(|input| input.name == name)
    }
}

/// A node of the template tree.
#[derive(Clone, Debug)]
pub enum TemplateNode {
    Element(Element),
    Template(EmbeddedTemplate),
    BoundText(BoundText),
    Text(Text),
}

impl TemplateNode {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Element(el) => el.span,
            Self::Template(tpl) => tpl.span,
            Self::BoundText(text) => text.span,
            Self::Text(text) => text.span,
        }
    }
}

impl From<Element> for TemplateNode {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<EmbeddedTemplate> for TemplateNode {
    fn from(value: EmbeddedTemplate) -> Self {
        Self::Template(value)
    }
}

impl From<BoundText> for TemplateNode {
    fn from(value: BoundText) -> Self {
        Self::BoundText(value)
    }
}

impl From<Text> for TemplateNode {
    fn from(value: Text) -> Self {
        Self::Text(value)
    }
}

// =============================================================================
// Paths
// =============================================================================

/// Borrowed view of anything a position can land on.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'t> {
    Element(&'t Element),
    Template(&'t EmbeddedTemplate),
    BoundText(&'t BoundText),
    Text(&'t Text),
    Attribute(&'t TextAttribute),
    /// The `*key="..."` attribute of a desugared template.
    StructuralAttribute(&'t TextAttribute),
    Property(&'t BoundAttribute),
    Event(&'t BoundEvent),
    Reference(&'t Reference),
    Variable(&'t Variable),
}

impl NodeRef<'_> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Element(el) => el.span,
            Self::Template(tpl) => tpl.span,
            Self::BoundText(text) => text.span,
            Self::Text(text) => text.span,
            Self::Attribute(attr) | Self::StructuralAttribute(attr) => attr.span,
            Self::Property(prop) => prop.span,
            Self::Event(event) => event.span,
            Self::Reference(reference) => reference.span,
            Self::Variable(variable) => variable.span,
        }
    }
}

/// Nodes containing a position, root first.
#[derive(Clone, Debug, Default)]
pub struct TemplatePath<'t> {
    nodes: Vec<NodeRef<'t>>,
    position: u32,
}

impl<'t> TemplatePath<'t> {
    #[must_use]
    pub fn new(nodes: Vec<NodeRef<'t>>, position: u32) -> Self {
        Self { nodes, position }
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeRef<'t>] {
        &self.nodes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Innermost node.
    #[must_use]
    pub fn tail(&self) -> Option<NodeRef<'t>> {
        self.nodes.last().copied()
    }

    /// Embedded templates on the path, root first.
    pub fn templates(&self) -> impl Iterator<Item = &'t EmbeddedTemplate> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            NodeRef::Template(tpl) => Some(*tpl),
            _ => None,
        })
    }

    /// Innermost embedded template.
    #[must_use]
    pub fn nearest_template(&self) -> Option<&'t EmbeddedTemplate> {
        self.templates().last()
    }

    /// Directives matched on the innermost element or template.
    #[must_use]
    pub fn nearest_directives(&self) -> &'t [DirectiveMatch] {
        self.nodes
            .iter()
            .rev()
            .find_map(|node| match node {
                NodeRef::Element(el) => Some(el.directives.as_slice()),
                NodeRef::Template(tpl) => Some(tpl.directives.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Innermost element.
    #[must_use]
    pub fn nearest_element(&self) -> Option<&'t Element> {
        self.nodes.iter().rev().find_map(|node| match node {
            NodeRef::Element(el) => Some(*el),
            _ => None,
        })
    }

    /// Copy of the path truncated after `len` nodes.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            nodes: self.nodes[..len.min(self.nodes.len())].to_vec(),
            position: self.position,
        }
    }
}

struct PathFinder<'t> {
    position: u32,
    nodes: Vec<NodeRef<'t>>,
}

impl<'t> PathFinder<'t> {
    /// Push `node` when it contains the position and is no wider than the current tail.
    fn enter(&mut self, node: NodeRef<'t>) -> bool {
        let span = node.span();
        if !span.contains(self.position) {
            return false;
        }
        let tail = self.nodes.last().map(NodeRef::span);
        if span.is_narrower_than(tail) {
            self.nodes.push(node);
        }
        true
    }

    fn visit_all(&mut self, nodes: &'t [TemplateNode]) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit(&mut self, node: &'t TemplateNode) {
        match node {
            TemplateNode::Element(el) => {
                if !self.enter(NodeRef::Element(el)) {
                    return;
                }
                for attr in &el.attrs {
                    self.enter(NodeRef::Attribute(attr));
                }
                for input in &el.inputs {
                    self.enter(NodeRef::Property(input));
                }
                for output in &el.outputs {
                    self.enter(NodeRef::Event(output));
                }
                for reference in &el.references {
                    self.enter(NodeRef::Reference(reference));
                }
                self.visit_all(&el.children);
            }
            TemplateNode::Template(tpl) => {
                if !self.enter(NodeRef::Template(tpl)) {
                    return;
                }
                if let Some(attr) = &tpl.structural_attr {
                    self.enter(NodeRef::StructuralAttribute(attr));
                }
                for attr in &tpl.attrs {
                    self.enter(NodeRef::Attribute(attr));
                }
                for input in &tpl.inputs {
                    self.enter(NodeRef::Property(input));
                }
                for reference in &tpl.references {
                    self.enter(NodeRef::Reference(reference));
                }
                // Microsyntax variables live inside the structural attribute,
                // which already claims those positions.
                if tpl.structural_attr.is_none() {
                    for variable in &tpl.variables {
                        self.enter(NodeRef::Variable(variable));
                    }
                }
                self.visit_all(&tpl.children);
            }
            TemplateNode::BoundText(text) => {
                self.enter(NodeRef::BoundText(text));
            }
            TemplateNode::Text(text) => {
                self.enter(NodeRef::Text(text));
            }
        }
    }
}

/// Find the nodes containing `position`, root first.
///
/// A node is added only when it fits inside the previously added one, so the
/// tail is the tightest node; of two candidates with equal extent the later
/// one wins.
#[must_use]
pub fn find_template_path(nodes: &[TemplateNode], position: u32) -> TemplatePath<'_> {
    let mut finder = PathFinder {
        position,
        nodes: Vec::new(),
    };
    finder.visit_all(nodes);
    TemplatePath::new(finder.nodes, position)
}

/// Visit every node of a tree in document order, with its path.
///
/// The path passed to `f` ends with the visited node.
pub fn walk_template<'t>(nodes: &'t [TemplateNode], f: &mut dyn FnMut(&TemplatePath<'t>)) {
    fn walk<'t>(nodes: &'t [TemplateNode], stack: &mut Vec<NodeRef<'t>>, f: &mut dyn FnMut(&TemplatePath<'t>)) {
        for node in nodes {
            let (node_ref, children) = match node {
                TemplateNode::Element(el) => (NodeRef::Element(el), el.children.as_slice()),
                TemplateNode::Template(tpl) => (NodeRef::Template(tpl), tpl.children.as_slice()),
                TemplateNode::BoundText(text) => (NodeRef::BoundText(text), &[][..]),
                TemplateNode::Text(text) => (NodeRef::Text(text), &[][..]),
            };
            stack.push(node_ref);
            let position = node_ref.span().start;
            f(&TemplatePath::new(stack.clone(), position));
            let leaves: Vec<NodeRef<'t>> = match node {
                TemplateNode::Element(el) => el
                    .inputs
                    .iter()
                    .map(NodeRef::Property)
                    .chain(el.outputs.iter().map(NodeRef::Event))
                    .chain(el.references.iter().map(NodeRef::Reference))
                    .collect(),
                TemplateNode::Template(tpl) => tpl
                    .inputs
                    .iter()
                    .chain(&tpl.template_bindings)
                    .map(NodeRef::Property)
                    .chain(tpl.variables.iter().map(NodeRef::Variable))
                    .chain(tpl.references.iter().map(NodeRef::Reference))
                    .collect(),
                TemplateNode::BoundText(_) | TemplateNode::Text(_) => Vec::new(),
            };
            for leaf in leaves {
                stack.push(leaf);
                f(&TemplatePath::new(stack.clone(), leaf.span().start));
                stack.pop();
            }
            walk(children, stack, f);
            stack.pop();
        }
    }
    let mut stack = Vec::new();
    walk(nodes, &mut stack, f);
}

#[cfg(test)]
#[path = "../tests/template_tests.rs"]
mod tests;
