//! The language service entry points.

use crate::completions::{Completions, completions_at};
use crate::definition::DefinitionInfo;
use crate::document::TemplateDocument;
use crate::hover::HoverInfo;
use crate::locate::{LocatedSymbol, locate_symbol_at};
use crate::options::ServiceOptions;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use tmpl_checker::{
    AnalysisSession, CheckerOptions, ScopeBuilder, SymbolTableRef, empty_table,
    template_diagnostics,
};
use tmpl_common::diagnostics::Diagnostic;
use tmpl_parser::template::TemplatePath;
use tracing::{error, instrument};

/// Answers editor queries about templates against one host snapshot.
///
/// Every query is guarded: a panic inside the engine propagates in debug
/// builds and turns into an empty answer in release builds.
#[derive(Debug)]
pub struct LanguageService {
    session: AnalysisSession,
    options: ServiceOptions,
    checker_options: CheckerOptions,
}

impl LanguageService {
    #[must_use]
    pub fn new(session: AnalysisSession) -> Self {
        Self {
            session,
            options: ServiceOptions::default(),
            checker_options: CheckerOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_checker_options(mut self, options: CheckerOptions) -> Self {
        self.checker_options = options;
        self
    }

    #[must_use]
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    #[must_use]
    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Drop cached host answers after the host program changed.
    pub fn invalidate(&mut self) {
        self.session.invalidate();
    }

    /// Parse errors of the document, or its type errors when it parsed cleanly.
    #[instrument(level = "debug", skip_all, fields(file = %document.file_name()))]
    pub fn diagnostics(&self, document: &TemplateDocument) -> Vec<Diagnostic> {
        guarded("diagnostics", Vec::new(), || {
            template_diagnostics(&self.session, &document.info, &self.checker_options)
        })
    }

    /// Completions at a file position. `None` when nothing can be offered.
    #[instrument(level = "debug", skip_all, fields(file = %document.file_name(), position))]
    pub fn completions_at(&self, document: &TemplateDocument, position: u32) -> Option<Completions> {
        guarded("completions", None, || {
            completions_at(&self.session, &self.options, document, position)
        })
    }

    pub fn locate_symbol_at(&self, document: &TemplateDocument, position: u32) -> Option<LocatedSymbol> {
        guarded("locate", None, || {
            locate_symbol_at(&self.session, document, position)
        })
    }

    pub fn hover_at(&self, document: &TemplateDocument, position: u32) -> Option<HoverInfo> {
        guarded("hover", None, || {
            locate_symbol_at(&self.session, document, position).map(|located| HoverInfo::from_located(&located))
        })
    }

    pub fn definition_at(&self, document: &TemplateDocument, position: u32) -> Option<DefinitionInfo> {
        guarded("definition", None, || {
            locate_symbol_at(&self.session, document, position)
                .and_then(|located| DefinitionInfo::from_located(&located))
        })
    }

    /// Names visible at the tail of `path`, a path into `document`.
    pub fn scope_at(&self, document: &TemplateDocument, path: &TemplatePath<'_>) -> SymbolTableRef {
        guarded("scope", empty_table(), || {
            ScopeBuilder::new(&self.session, &document.info).scope_at(path)
        })
    }
}

fn guarded<T>(operation: &'static str, fallback: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            if cfg!(debug_assertions) {
                resume_unwind(payload);
            }
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            error!(operation, %message, "language service query panicked");
            fallback
        }
    }
}

#[cfg(test)]
#[path = "../tests/service_tests.rs"]
mod tests;
