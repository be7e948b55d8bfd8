//! Errors raised while loading a host model or a template outline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("invalid host description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type '{name}' in {context}")]
    UnknownType { name: String, context: String },

    #[error("malformed type '{text}' at byte {offset}: {message}")]
    TypeSyntax {
        text: String,
        offset: usize,
        message: String,
    },

    #[error("'{name}' expects {expected} type argument(s), found {found}")]
    TypeArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("'{name}' is declared more than once")]
    Duplicate { name: String },

    #[error("type alias '{name}' refers to itself")]
    CyclicAlias { name: String },

    #[error("cannot find '{needle}' in template '{file}' after byte {from}")]
    Outline {
        file: String,
        needle: String,
        from: usize,
    },
}

pub type Result<T> = std::result::Result<T, HostError>;
