//! Type text parser.
//!
//! Grammar:
//!
//! ```text
//! type     := postfix ('|' postfix)*
//! postfix  := primary ('[' ']')*
//! primary  := IDENT ('<' type (',' type)* '>')?
//!           | '(' params ')' '=>' type
//!           | '(' type ')'
//!           | '[' (type (',' type)*)? ']'
//! params   := (IDENT '?'? ':' type (',' IDENT '?'? ':' type)*)?
//! ```
//!
//! Names are not resolved here; `string` and `Person` are both
//! [`TypeExpr::Named`].

use crate::error::{HostError, Result};
use tmpl_common::chars::{is_identifier_part, is_identifier_start, is_whitespace};
use tmpl_common::limits::MAX_PARSE_DEPTH;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Named { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
    Function {
        params: Vec<ParamExpr>,
        result: Box<TypeExpr>,
    },
}

impl TypeExpr {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamExpr {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
}

/// Parse a complete type text.
pub fn parse_type(text: &str) -> Result<TypeExpr> {
    let mut parser = TypeParser {
        text,
        pos: 0,
        depth: 0,
    };
    let ty = parser.parse_union()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing text"));
    }
    Ok(ty)
}

struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
    depth: u32,
}

impl TypeParser<'_> {
    fn error(&self, message: &str) -> HostError {
        HostError::TypeSyntax {
            text: self.text.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.text[self.pos..].chars().next() {
            if !is_whitespace(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.text[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: &str) -> bool {
        self.skip_whitespace();
        if self.text[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &str) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, ch)) if is_identifier_start(ch) => {}
            _ => return None,
        }
        let end = chars
            .find(|&(_, ch)| !is_identifier_part(ch))
            .map_or(rest.len(), |(index, _)| index);
        self.pos += end;
        Some(rest[..end].to_string())
    }

    fn parse_union(&mut self) -> Result<TypeExpr> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.error("type is nested too deeply"));
        }
        let mut members = vec![self.parse_postfix()?];
        while self.eat("|") {
            members.push(self.parse_postfix()?);
        }
        self.depth -= 1;
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeExpr::Union(members)
        })
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr> {
        let mut ty = self.parse_primary()?;
        loop {
            let save = self.pos;
            if self.eat("[") && self.eat("]") {
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                self.pos = save;
                return Ok(ty);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeExpr> {
        match self.peek() {
            Some('(') if self.at_function() => self.parse_function(),
            Some('(') => {
                self.pos += 1;
                let inner = self.parse_union()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some('[') => {
                self.pos += 1;
                let mut elements = Vec::new();
                if !self.eat("]") {
                    loop {
                        elements.push(self.parse_union()?);
                        if !self.eat(",") {
                            break;
                        }
                    }
                    self.expect("]")?;
                }
                Ok(TypeExpr::Tuple(elements))
            }
            _ => {
                let Some(name) = self.identifier() else {
                    return Err(self.error("expected a type"));
                };
                let mut args = Vec::new();
                if self.eat("<") {
                    loop {
                        args.push(self.parse_union()?);
                        if !self.eat(",") {
                            break;
                        }
                    }
                    self.expect(">")?;
                }
                Ok(TypeExpr::Named { name, args })
            }
        }
    }

    /// `(` starts a function type when followed by `)` or `name:` / `name?`.
    fn at_function(&mut self) -> bool {
        let save = self.pos;
        self.pos += 1;
        let result = if self.eat(")") {
            true
        } else if self.identifier().is_some() {
            matches!(self.peek(), Some(':' | '?'))
        } else {
            false
        };
        self.pos = save;
        result
    }

    fn parse_function(&mut self) -> Result<TypeExpr> {
        self.expect("(")?;
        let mut params = Vec::new();
        if !self.eat(")") {
            loop {
                let Some(name) = self.identifier() else {
                    return Err(self.error("expected a parameter name"));
                };
                let optional = self.eat("?");
                self.expect(":")?;
                let ty = self.parse_union()?;
                params.push(ParamExpr { name, ty, optional });
                if !self.eat(",") {
                    break;
                }
            }
            self.expect(")")?;
        }
        self.expect("=>")?;
        let result = self.parse_union()?;
        Ok(TypeExpr::Function {
            params,
            result: Box::new(result),
        })
    }
}

#[cfg(test)]
#[path = "../tests/type_syntax_tests.rs"]
mod tests;
