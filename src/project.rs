//! Projects: a host program, its templates and the analysis options, read
//! from one JSON file.
//!
//! ```json
//! {
//!   "host": { "classes": [...], "pipes": [...], "aliases": [...] },
//!   "templates": [{ "fileName": "app.component.html", "component": "AppComponent", "source": "...", "nodes": [...] }],
//!   "checker": { "checkEventCallable": true },
//!   "service": { "hiddenMemberPrefix": "__" }
//! }
//! ```

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tmpl_checker::CheckerOptions;
use tmpl_common::diagnostics::Diagnostic;
use tmpl_host::{HostModel, HostProgram, HostQuery, TemplateOutline};
use tmpl_lsp::{LanguageService, ServiceOptions, TemplateDocument};
use tracing::{debug, info, instrument};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFile {
    pub host: HostModel,
    pub templates: Vec<TemplateOutline>,
    pub checker: CheckerOptions,
    pub service: ServiceOptions,
}

/// Diagnostics of one template.
#[derive(Debug)]
pub struct TemplateReport<'p> {
    pub document: &'p TemplateDocument,
    pub diagnostics: Vec<Diagnostic>,
}

impl TemplateReport<'_> {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// A loaded project, ready for queries.
#[derive(Debug)]
pub struct Project {
    service: LanguageService,
    documents: Vec<TemplateDocument>,
}

impl Project {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid project {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file: ProjectFile = serde_json::from_str(text).context("malformed project JSON")?;
        Self::from_file(file)
    }

    #[instrument(level = "debug", skip_all, fields(templates = file.templates.len()))]
    pub fn from_file(file: ProjectFile) -> Result<Self> {
        let program = HostProgram::load(file.host).context("invalid host program")?;
        let query = HostQuery::new(program);
        let documents = file
            .templates
            .iter()
            .map(|outline| {
                let info = query
                    .template_info(outline)
                    .with_context(|| format!("cannot build template {}", outline.file_name))?;
                debug!(file = %outline.file_name, offset = outline.offset, "template loaded");
                Ok(TemplateDocument::new(info, outline.source.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let service = LanguageService::new(query.into_session())
            .with_options(file.service)
            .with_checker_options(file.checker);
        info!(templates = documents.len(), "project loaded");
        Ok(Self { service, documents })
    }

    #[must_use]
    pub fn service(&self) -> &LanguageService {
        &self.service
    }

    #[must_use]
    pub fn documents(&self) -> &[TemplateDocument] {
        &self.documents
    }

    /// The template of `file_name` covering file offset `position`.
    #[must_use]
    pub fn document_at(&self, file_name: &str, position: u32) -> Option<&TemplateDocument> {
        self.documents
            .iter()
            .find(|d| d.file_name() == file_name && d.template_position(position).is_some())
    }

    /// Diagnostics of every template, checked in parallel, in project order.
    #[must_use]
    pub fn check_all(&self) -> Vec<TemplateReport<'_>> {
        self.documents
            .par_iter()
            .map(|document| TemplateReport {
                document,
                diagnostics: self.service.diagnostics(document),
            })
            .collect()
    }
}
