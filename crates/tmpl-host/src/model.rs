//! Serde model of a host program.
//!
//! A host program is a flat list of classes, pipes and type aliases whose
//! types are written as type text (`Person[]`, `Observable<Hero>`,
//! `(value: string) => string`). See [`crate::type_syntax`] for the grammar.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tmpl_checker::Definition;
use tmpl_common::span::Span;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostModel {
    pub classes: Vec<ClassDecl>,
    pub pipes: Vec<PipeDecl>,
    pub aliases: Vec<AliasDecl>,
}

impl HostModel {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    /// Type of the context a structural directive hands its template.
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub docs: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub docs: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A pipe and its transform signature (`(value: string) => string`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub docs: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AliasDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Where a declaration lives in its source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start: u32,
    pub end: u32,
}

impl Location {
    #[must_use]
    pub fn to_definition(&self) -> Definition {
        Definition {
            file_name: self.file.clone(),
            span: Span::new(self.start, self.end),
        }
    }
}
