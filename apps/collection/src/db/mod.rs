//! Collection database: schema, repositories and id allocation.

pub mod date_utils;
pub mod error;
pub mod ids;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use ids::{next_id, random_guid, resolve_id, IdTable};
pub use repository::{
    initialize, CardFilter, CardRepository, CollectionStats, DeckConfigRepository, DeckRepository,
    GraveKind, GraveRepository, NoteRepository, NotetypeRepository, StatsRepository,
};
