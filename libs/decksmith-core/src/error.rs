//! Error types for decksmith-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing a card template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated tag at offset {offset}")]
    UnclosedTag { offset: usize },

    #[error("empty tag at offset {offset}")]
    EmptyTag { offset: usize },

    #[error("section {name} is never closed")]
    UnclosedSection { name: String },

    #[error("closing tag {name} has no open section")]
    UnexpectedClose { name: String },

    #[error("expected closing tag for {expected}, found {found}")]
    MismatchedClose { expected: String, found: String },
}

/// Errors produced by card generation and notetype migration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid or unsupported notetype kind: {0}")]
    UnsupportedNotetypeKind(i32),

    #[error("cannot process note with no fields")]
    EmptyNote,

    #[error("sort_field_idx {index} is out of bounds for note with {field_count} fields")]
    SortFieldOutOfBounds { index: u32, field_count: usize },

    #[error("note has {found} fields but its notetype defines {expected}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("ordinal {ordinal} does not exist in a list of {len}")]
    InvalidOrdinal { ordinal: u32, len: usize },

    #[error("ordinal {0} is claimed more than once")]
    DuplicateOrdinal(u32),

    #[error("template parse error: {0}")]
    Template(#[from] TemplateError),

    #[error("invalid cloze number: {0}")]
    InvalidClozeNumber(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("invalid deck name: {0:?}")]
    InvalidDeckName(String),
}

/// Broad classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Parse,
    Render,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedNotetypeKind(_) | Self::EmptyNote => ErrorKind::Configuration,
            Self::SortFieldOutOfBounds { .. }
            | Self::FieldCountMismatch { .. }
            | Self::InvalidOrdinal { .. }
            | Self::DuplicateOrdinal(_)
            | Self::InvalidDeckName(_) => ErrorKind::Validation,
            Self::Template(_) | Self::InvalidClozeNumber(_) => ErrorKind::Parse,
            Self::Render(_) => ErrorKind::Render,
        }
    }
}
