use colored::Colorize;
use tmpl_common::diagnostics::{Diagnostic, DiagnosticCategory};
use tmpl_common::position::LineMap;
use tmpl_lsp::TemplateDocument;

/// Renders diagnostics against the template text they point into.
///
/// Locations are `file:line:column`, counted from the start of the template
/// (1-based), followed by the template line with the span underlined.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    #[must_use]
    pub fn render(&self, document: &TemplateDocument, diagnostics: &[Diagnostic]) -> String {
        let line_map = LineMap::build(&document.source);
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(document, &line_map, diagnostic));
        }
        out
    }

    fn format_diagnostic(&self, document: &TemplateDocument, line_map: &LineMap, diagnostic: &Diagnostic) -> String {
        let start = diagnostic.span.start.saturating_sub(document.info.offset);
        let position = line_map.offset_to_position(start);

        let mut output = format!(
            "{}:{}:{} - {} {}: {}",
            document.file_name(),
            position.line + 1,
            position.character + 1,
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message.render(),
        );
        if let Some(snippet) = self.format_snippet(&document.source, line_map, start, diagnostic.span.len()) {
            output.push_str(&snippet);
        }
        output
    }

    /// The template line holding `start`, with `~` under the span.
    fn format_snippet(&self, source: &str, line_map: &LineMap, start: u32, length: u32) -> Option<String> {
        let position = line_map.offset_to_position(start);
        let line_text = source.lines().nth(position.line as usize)?;
        let column = position.character as usize;
        let available = line_text.len().saturating_sub(column);
        let width = (length as usize).clamp(1, available.max(1));

        let underline = "~".repeat(width);
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n  {:>3}   {}\n        {}{}",
            position.line + 1,
            line_text,
            " ".repeat(column),
            underline
        ))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("TPL{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
