//! Editor queries over templates.
//!
//! This crate provides:
//! - `document` - A template tree with its text and file offset
//! - `expressions` - Path, completion and symbol queries inside one expression
//! - `completions` - What can be typed at a position
//! - `locate` - The symbol under the cursor
//! - `hover` / `definition` - Quick info and go-to-definition over `locate`
//! - `service` - `LanguageService`, the guarded public entry points
//!
//! Positions given to `LanguageService` and spans it returns are byte
//! offsets in the file holding the template.

pub mod options;
pub use options::{DEFAULT_HIDDEN_MEMBER_PREFIX, ServiceOptions};

pub mod document;
pub use document::TemplateDocument;

pub mod word;
pub use word::bounded_word_span;

pub mod expressions;
pub use expressions::{expression_completions, expression_path, expression_symbol};

pub mod completions;
pub use completions::{CompletionEntry, Completions};

pub mod locate;
pub use locate::LocatedSymbol;

pub mod hover;
pub use hover::HoverInfo;

pub mod definition;
pub use definition::DefinitionInfo;

pub mod service;
pub use service::LanguageService;

#[cfg(test)]
#[path = "../tests/support/heroes.rs"]
pub(crate) mod test_fixture;
