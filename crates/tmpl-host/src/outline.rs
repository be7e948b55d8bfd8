//! Template outlines.
//!
//! An outline lists a template's elements, attributes and texts in source
//! order together with the directives matched on each element. Building it
//! locates every listed piece in the template text and produces the tree
//! model the engine consumes; the source is never tokenized as markup.

use crate::error::{HostError, Result};
use serde::{Deserialize, Serialize};
use tmpl_common::span::Span;
use tmpl_parser::template::{
    BoundAttribute, BoundEvent, BoundText, DirectiveMatch, Element, EmbeddedTemplate, Reference,
    TemplateNode, Text, TextAttribute, Variable,
};
use tmpl_parser::IMPLICIT_CONTEXT_MEMBER;
use tracing::trace;

const NG_TEMPLATE: &str = "ng-template";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOutline {
    pub file_name: String,
    /// Class whose members the template binds to.
    pub component: String,
    /// Offset of the template text inside `file_name`.
    #[serde(default)]
    pub offset: u32,
    pub source: String,
    #[serde(default)]
    pub nodes: Vec<NodeOutline>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeOutline {
    Element(ElementOutline),
    /// Static text or text with `{{ }}` interpolations.
    Text { text: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementOutline {
    pub name: String,
    pub attrs: Vec<AttrOutline>,
    /// Directives matched on the element.
    pub directives: Vec<DirectiveMatch>,
    /// Directives matched on the template desugared from a `*` attribute.
    pub template_directives: Vec<DirectiveMatch>,
    pub children: Vec<NodeOutline>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttrOutline {
    /// Attribute name as written: `class`, `[value]`, `(click)`, `#ref`,
    /// `*ngFor`, `let-item`, `[(ngModel)]`, `bind-x`, `on-x`, `ref-x`.
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl TemplateOutline {
    /// Locate the outline in its source and build the tree.
    pub fn build(&self) -> Result<Vec<TemplateNode>> {
        let mut builder = OutlineBuilder {
            file: &self.file_name,
            source: &self.source,
            cursor: 0,
        };
        self.nodes.iter().map(|node| builder.node(node)).collect()
    }
}

struct OutlineBuilder<'a> {
    file: &'a str,
    source: &'a str,
    cursor: usize,
}

/// Where an attribute landed in the source.
struct Located<'o> {
    attr: &'o AttrOutline,
    span: Span,
    value_span: Option<Span>,
}

impl Located<'_> {
    fn value(&self) -> &str {
        self.attr.value.as_deref().unwrap_or_default()
    }

    /// Span of `inner` inside the attribute name, e.g. `click` in `(click)`.
    fn key_span(&self, prefix_len: usize, inner: &str) -> Span {
        Span::from_len(self.span.start + prefix_len as u32, inner.len() as u32)
    }

    fn value_or_end(&self) -> Span {
        self.value_span.unwrap_or(Span::at(self.span.end))
    }
}

impl<'a> OutlineBuilder<'a> {
    fn find(&self, needle: &str, from: usize) -> Result<usize> {
        self.source
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|index| from + index)
            .ok_or_else(|| HostError::Outline {
                file: self.file.to_string(),
                needle: needle.to_string(),
                from,
            })
    }

    fn node(&mut self, node: &NodeOutline) -> Result<TemplateNode> {
        match node {
            NodeOutline::Text { text } => {
                let start = self.find(text, self.cursor)?;
                self.cursor = start + text.len();
                let span = Span::from_len(start as u32, text.len() as u32);
                Ok(match BoundText::new(span, self.source) {
                    Some(bound) => bound.into(),
                    None => Text {
                        span,
                        value: text.clone(),
                    }
                    .into(),
                })
            }
            NodeOutline::Element(element) => self.element(element),
        }
    }

    fn locate<'o>(&self, attr: &'o AttrOutline, from: usize) -> Result<Located<'o>> {
        let start = self.find(&attr.name, from)?;
        let name_end = start + attr.name.len();
        let Some(value) = &attr.value else {
            return Ok(Located {
                attr,
                span: Span::new(start as u32, name_end as u32),
                value_span: None,
            });
        };
        let value_start = self.find(value, name_end)?;
        let value_end = value_start + value.len();
        // Include the closing quote when there is one.
        let end = match self.source.as_bytes().get(value_end) {
            Some(b'"' | b'\'') => value_end + 1,
            _ => value_end,
        };
        Ok(Located {
            attr,
            span: Span::new(start as u32, end as u32),
            value_span: Some(Span::new(value_start as u32, value_end as u32)),
        })
    }

    fn element(&mut self, outline: &ElementOutline) -> Result<TemplateNode> {
        let start = self.find(&format!("<{}", outline.name), self.cursor)?;
        let mut position = start + outline.name.len() + 1;
        let mut located = Vec::with_capacity(outline.attrs.len());
        for attr in &outline.attrs {
            let found = self.locate(attr, position)?;
            position = found.span.end as usize;
            located.push(found);
        }
        let open_end = self.find(">", position)? + 1;
        self.cursor = open_end;

        let children = outline
            .children
            .iter()
            .map(|child| self.node(child))
            .collect::<Result<Vec<_>>>()?;

        // Closed when the next tag is this element's end tag.
        let close = format!("</{}>", outline.name);
        let end = match self.source[self.cursor..].find('<') {
            Some(index) if self.source[self.cursor + index..].starts_with(&close) => {
                self.cursor + index + close.len()
            }
            _ => open_end,
        };
        self.cursor = end;
        let span = Span::new(start as u32, end as u32);
        trace!(element = %outline.name, start, end, "outline element located");

        if outline.name == NG_TEMPLATE {
            return Ok(self.ng_template(outline, span, &located, children).into());
        }

        let mut element = Element::new(outline.name.clone(), span);
        let mut structural = None;
        for found in &located {
            if found.attr.name.starts_with('*') {
                structural = Some(found);
            } else {
                element = self.apply_attribute(element, found);
            }
        }
        element.directives.clone_from(&outline.directives);
        element.children = children;

        Ok(match structural {
            Some(found) => {
                let attr = TextAttribute::new(found.attr.name.clone(), found.value(), found.span, found.value_span);
                EmbeddedTemplate::structural(attr, self.source, outline.template_directives.clone(), element).into()
            }
            None => element.into(),
        })
    }

    fn apply_attribute(&self, mut element: Element, found: &Located<'_>) -> Element {
        let name = found.attr.name.as_str();
        if let Some(inner) = name.strip_prefix("[(").and_then(|n| n.strip_suffix(")]")) {
            let key_span = found.key_span(2, inner);
            element = element
                .with_input(BoundAttribute::new(inner, found.span, key_span, found.value_or_end(), self.source))
                .with_output(BoundEvent::new(
                    format!("{inner}Change"),
                    found.span,
                    key_span,
                    found.value_or_end(),
                    self.source,
                ));
        } else if let Some(inner) = bracketed(name, '[', ']').or_else(|| name.strip_prefix("bind-")) {
            let prefix = name.len() - inner.len() - usize::from(name.ends_with(']'));
            let key_span = found.key_span(prefix, inner);
            element = element.with_input(BoundAttribute::new(
                inner,
                found.span,
                key_span,
                found.value_or_end(),
                self.source,
            ));
        } else if let Some(inner) = bracketed(name, '(', ')').or_else(|| name.strip_prefix("on-")) {
            let prefix = name.len() - inner.len() - usize::from(name.ends_with(')'));
            let key_span = found.key_span(prefix, inner);
            element = element.with_output(BoundEvent::new(
                inner,
                found.span,
                key_span,
                found.value_or_end(),
                self.source,
            ));
        } else if let Some(inner) = name.strip_prefix('#').or_else(|| name.strip_prefix("ref-")) {
            element = element.with_reference(Reference::new(inner, found.value(), found.span));
        } else {
            element = element.with_attr(TextAttribute::new(name, found.value(), found.span, found.value_span));
        }
        element
    }

    fn ng_template(
        &self,
        outline: &ElementOutline,
        span: Span,
        located: &[Located<'_>],
        children: Vec<TemplateNode>,
    ) -> EmbeddedTemplate {
        let mut template = EmbeddedTemplate::new(span);
        for found in located {
            let name = found.attr.name.as_str();
            if let Some(variable) = name.strip_prefix("let-") {
                let value = match found.value() {
                    "" => IMPLICIT_CONTEXT_MEMBER,
                    value => value,
                };
                template = template.with_variable(Variable::new(variable, value, found.span));
            } else {
                // Inputs, references and plain attributes read the same as on elements.
                let probe = self.apply_attribute(Element::new(NG_TEMPLATE, span), found);
                template.inputs.extend(probe.inputs);
                template.references.extend(probe.references);
                template.attrs.extend(probe.attrs);
            }
        }
        template.directives.clone_from(&outline.directives);
        template.children = children;
        template
    }
}

/// `inner` of `[inner]` / `(inner)`.
fn bracketed(name: &str, open: char, close: char) -> Option<&str> {
    name.strip_prefix(open).and_then(|n| n.strip_suffix(close))
}

#[cfg(test)]
#[path = "../tests/outline_tests.rs"]
mod tests;
