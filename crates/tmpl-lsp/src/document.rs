//! Templates as the language service sees them.

use tmpl_checker::TemplateInfo;
use tmpl_parser::template::{TemplatePath, find_template_path};

/// A template tree together with its text.
///
/// Positions passed to the language service are offsets in
/// `info.file_name`; the template text starts at `info.offset`.
#[derive(Clone, Debug)]
pub struct TemplateDocument {
    pub info: TemplateInfo,
    pub source: String,
}

impl TemplateDocument {
    #[must_use]
    pub fn new(info: TemplateInfo, source: impl Into<String>) -> Self {
        Self {
            info,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.info.file_name
    }

    /// Offset inside the template of a file position, if the template covers it.
    #[must_use]
    pub fn template_position(&self, position: u32) -> Option<u32> {
        let relative = position.checked_sub(self.info.offset)?;
        (relative as usize <= self.source.len()).then_some(relative)
    }

    #[must_use]
    pub fn path_at(&self, template_position: u32) -> TemplatePath<'_> {
        find_template_path(&self.info.nodes, template_position)
    }
}
