//! Card generation and notetype migration engine.
//!
//! Provides:
//! - Notetype, note and card types
//! - Hierarchical deck names, decks and deck options
//! - A pluggable template evaluator with a built-in mustache subset
//! - Sentinel-based rendering checks and field requirement analysis
//! - Cloze number extraction
//! - Card generation for normal and cloze notetypes
//! - Planning of notetype edits (field reorders, template moves/removals/additions)

pub mod cardgen;
pub mod cloze;
pub mod deck;
pub mod error;
pub mod fields;
pub mod migration;
pub mod render;
pub mod requirements;
pub mod template;
pub mod types;

pub use cardgen::{cards_required, field_is_empty, generate_cards, CardToGenerate};
pub use cloze::cloze_numbers_in_fields;
pub use deck::{
    Deck, DeckCommon, DeckConfig, DeckKind, DeckName, DeckOptions, NewCardOrder,
    DEFAULT_DECK_CONFIG_ID, DEFAULT_DECK_ID,
};
pub use error::{CoreError, ErrorKind, Result, TemplateError};
pub use fields::{prepare_note_fields, PreparedFields};
pub use migration::{NotetypeChanges, TemplateChanges};
pub use render::{renders_with_fields, SentinelProbe};
pub use requirements::{field_requirements, FieldRequirements};
pub use template::{MustacheEvaluator, TemplateEvaluator};
pub use types::{
    Card, CardQueue, CardType, Field, FieldConfig, Note, Notetype, NotetypeConfig, NotetypeKind,
    Template, TemplateConfig, USN_PENDING,
};
