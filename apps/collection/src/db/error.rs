//! Database error types.

use decksmith_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("note not found: {0}")]
    NoteNotFound(i64),

    #[error("card not found: {0}")]
    CardNotFound(i64),

    #[error("notetype not found: {0}")]
    NotetypeNotFound(i64),

    #[error("deck not found: {0}")]
    DeckNotFound(i64),

    #[error("deck config not found: {0}")]
    DeckConfigNotFound(i64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
