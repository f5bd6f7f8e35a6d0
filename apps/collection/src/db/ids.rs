//! Identifier and GUID allocation.
//!
//! Ids are millisecond timestamps bumped past the largest id already in the
//! table, so allocation inside one transaction is monotonic and never collides.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::error::DbError;

type Result<T> = std::result::Result<T, DbError>;

/// Tables whose rows get allocated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdTable {
    Notes,
    Cards,
    Notetypes,
    Decks,
    DeckConfigs,
}

impl IdTable {
    fn name(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Cards => "cards",
            Self::Notetypes => "notetypes",
            Self::Decks => "decks",
            Self::DeckConfigs => "deck_config",
        }
    }
}

/// A fresh id for `table`.
pub fn next_id(conn: &Connection, table: IdTable) -> Result<i64> {
    let max: i64 = conn.query_row(
        &format!("SELECT coalesce(max(id), 0) FROM {}", table.name()),
        [],
        |row| row.get(0),
    )?;
    Ok(Utc::now().timestamp_millis().max(max + 1))
}

/// Keep a caller-assigned id unless it is unset or already taken.
pub fn resolve_id(conn: &Connection, table: IdTable, requested: i64) -> Result<i64> {
    if requested == 0 {
        return next_id(conn, table);
    }
    let taken = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1", table.name()),
            params![requested],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if taken {
        next_id(conn, table)
    } else {
        Ok(requested)
    }
}

/// Random GUID for a new note.
pub fn random_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}
