//! Collection configuration loaded from the environment.

use std::path::PathBuf;
use thiserror::Error;

pub const COLLECTION_PATH_VAR: &str = "DECKSMITH_COLLECTION";
pub const DEFAULT_DECK_VAR: &str = "DECKSMITH_DEFAULT_DECK";

/// Deck used when a card has no better home.
pub use decksmith_core::DEFAULT_DECK_ID;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub path: PathBuf,
    /// Deck for cards generated for a note that has no card to borrow a deck from.
    pub default_deck_id: i64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            path: default_collection_path(),
            default_deck_id: DEFAULT_DECK_ID,
        }
    }
}

impl CollectionConfig {
    /// Read settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(COLLECTION_PATH_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_collection_path);

        let default_deck_id = match lookup(DEFAULT_DECK_VAR) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: DEFAULT_DECK_VAR,
                    value,
                })?,
            None => DEFAULT_DECK_ID,
        };

        Ok(Self {
            path,
            default_deck_id,
        })
    }
}

/// `<local data dir>/decksmith/collection.anki2`.
pub fn default_collection_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("decksmith")
        .join("collection.anki2")
}
