//! A collection: notes, cards and notetypes in one SQLite database.

use crate::config::{CollectionConfig, DEFAULT_DECK_ID};
use crate::db::date_utils::now_secs;
use crate::db::{
    initialize, next_id, random_guid, resolve_id, CardFilter, CardRepository, CollectionStats,
    DbError, GraveKind, GraveRepository, IdTable, NoteRepository, NotetypeRepository,
    StatsRepository,
};
use decksmith_core::{
    generate_cards, prepare_note_fields, Card, MustacheEvaluator, Note, Notetype,
    TemplateEvaluator, USN_PENDING,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

pub(crate) type Result<T> = std::result::Result<T, DbError>;

pub struct Collection {
    pub(crate) conn: Connection,
    pub(crate) evaluator: Box<dyn TemplateEvaluator + Send + Sync>,
    pub(crate) default_deck_id: i64,
}

impl Collection {
    /// Open the collection at `path`, creating it (and its directory) if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory collection (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_config(config: &CollectionConfig) -> Result<Self> {
        Ok(Self::open(&config.path)?.with_default_deck(config.default_deck_id))
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        initialize(&conn)?;
        Ok(Self {
            conn,
            evaluator: Box::new(MustacheEvaluator),
            default_deck_id: DEFAULT_DECK_ID,
        })
    }

    /// Render templates with `evaluator` instead of the built-in one.
    pub fn with_evaluator(mut self, evaluator: impl TemplateEvaluator + Send + Sync + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn with_default_deck(mut self, deck_id: i64) -> Self {
        self.default_deck_id = deck_id;
        self
    }

    pub fn stats(&self) -> Result<CollectionStats> {
        self.conn.get_stats()
    }

    // Notes

    pub fn get_note(&self, id: i64) -> Result<Note> {
        self.conn.get_note(id)?.ok_or(DbError::NoteNotFound(id))
    }

    pub fn list_notes(&self, notetype_id: Option<i64>) -> Result<Vec<Note>> {
        self.conn.list_notes(notetype_id)
    }

    /// Save a new note and create the cards it requires in `deck_id`.
    ///
    /// On success `note` carries its assigned id, guid and checksum.
    pub fn add_note(&mut self, deck_id: i64, note: &mut Note) -> Result<Vec<Card>> {
        let tx = self.conn.transaction()?;
        let notetype = load_notetype(&tx, note.notetype_id)?;

        let mut saved = note.clone();
        saved.id = resolve_id(&tx, IdTable::Notes, saved.id)?;
        if saved.guid.is_empty() {
            saved.guid = random_guid();
        }
        let sort_field = stamp_note(&mut saved, &notetype)?;
        tx.insert_note(&saved, &sort_field)?;

        let cards = add_cards(
            &tx,
            &*self.evaluator,
            deck_id,
            &saved,
            &notetype,
            &HashSet::new(),
        )?;
        tx.commit()?;

        debug!(note_id = saved.id, cards = cards.len(), "added note");
        *note = saved;
        Ok(cards)
    }

    /// Save an edited note and add any cards its new content requires.
    ///
    /// New cards go to the deck of one of the note's existing cards, or the
    /// default deck if it has none.
    pub fn update_note(&mut self, note: &mut Note) -> Result<Vec<Card>> {
        let tx = self.conn.transaction()?;
        let stored = tx.get_note(note.id)?.ok_or(DbError::NoteNotFound(note.id))?;
        if stored.notetype_id != note.notetype_id {
            return Err(DbError::InvalidData(format!(
                "note {} cannot move from notetype {} to {}",
                note.id, stored.notetype_id, note.notetype_id
            )));
        }
        let notetype = load_notetype(&tx, note.notetype_id)?;

        let mut saved = note.clone();
        let sort_field = stamp_note(&mut saved, &notetype)?;
        tx.update_note(&saved, &sort_field)?;

        let existing = tx.list_cards(&CardFilter::note(saved.id))?;
        let deck_id = existing
            .first()
            .map(|card| card.deck_id)
            .unwrap_or(self.default_deck_id);
        let ordinals: HashSet<u32> = existing.iter().map(|card| card.ordinal).collect();
        let cards = add_cards(
            &tx,
            &*self.evaluator,
            deck_id,
            &saved,
            &notetype,
            &ordinals,
        )?;
        tx.commit()?;

        debug!(note_id = saved.id, cards = cards.len(), "updated note");
        *note = saved;
        Ok(cards)
    }

    /// Delete a note and its cards, leaving graves for all of them.
    pub fn delete_note(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        if tx.get_note(id)?.is_none() {
            return Err(DbError::NoteNotFound(id));
        }
        let cards = remove_note(&tx, id)?;
        tx.commit()?;

        debug!(note_id = id, cards, "deleted note");
        Ok(())
    }

    // Cards

    pub fn get_card(&self, id: i64) -> Result<Card> {
        self.conn.get_card(id)?.ok_or(DbError::CardNotFound(id))
    }

    pub fn list_cards(&self, filter: &CardFilter) -> Result<Vec<Card>> {
        self.conn.list_cards(filter)
    }

    /// Save a modified card, marking it for sync.
    ///
    /// A card stays bound to its note and template; only its deck and
    /// scheduling state can change.
    pub fn update_card(&mut self, card: &mut Card) -> Result<()> {
        let tx = self.conn.transaction()?;
        let stored = tx.get_card(card.id)?.ok_or(DbError::CardNotFound(card.id))?;
        if (stored.note_id, stored.ordinal) != (card.note_id, card.ordinal) {
            return Err(DbError::InvalidData(format!(
                "card {} cannot move from note {} ordinal {} to note {} ordinal {}",
                card.id, stored.note_id, stored.ordinal, card.note_id, card.ordinal
            )));
        }

        let mut saved = card.clone();
        saved.modified = now_secs();
        saved.usn = USN_PENDING;
        tx.update_card(&saved)?;
        tx.commit()?;

        *card = saved;
        Ok(())
    }

    pub fn delete_card(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        if tx.get_card(id)?.is_none() {
            return Err(DbError::CardNotFound(id));
        }
        tx.delete_card(id)?;
        tx.add_grave(id, GraveKind::Card)?;
        tx.commit()?;
        Ok(())
    }

    /// Add every card that should exist but does not, across all notes.
    ///
    /// Returns the number of cards created.
    pub fn generate_missing_cards(&mut self) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut added = 0;

        for notetype in tx.list_notetypes(None)? {
            for note in tx.list_notes(Some(notetype.id))? {
                let existing = tx.list_cards(&CardFilter::note(note.id))?;
                let deck_id = existing
                    .first()
                    .map(|card| card.deck_id)
                    .unwrap_or(self.default_deck_id);
                let ordinals: HashSet<u32> = existing.iter().map(|card| card.ordinal).collect();
                added += add_cards(
                    &tx,
                    &*self.evaluator,
                    deck_id,
                    &note,
                    &notetype,
                    &ordinals,
                )?
                .len();
            }
        }
        tx.commit()?;

        info!(added, "generated missing cards");
        Ok(added)
    }
}

pub(crate) fn load_notetype(conn: &Connection, id: i64) -> Result<Notetype> {
    conn.get_notetype(id)?.ok_or(DbError::NotetypeNotFound(id))
}

/// Refresh derived note values and mark it modified. Returns the sort field.
pub(crate) fn stamp_note(note: &mut Note, notetype: &Notetype) -> Result<String> {
    let prepared = prepare_note_fields(note, notetype)?;
    note.checksum = prepared.checksum;
    note.modified = now_secs();
    note.usn = USN_PENDING;
    Ok(prepared.sort_field)
}

/// Generate and insert the cards `note` requires beyond `existing` ordinals.
pub(crate) fn add_cards(
    conn: &Connection,
    evaluator: &dyn TemplateEvaluator,
    deck_id: i64,
    note: &Note,
    notetype: &Notetype,
    existing: &HashSet<u32>,
) -> Result<Vec<Card>> {
    let mut cards = generate_cards(evaluator, deck_id, note, notetype, existing)?;
    let now = now_secs();
    for card in &mut cards {
        card.id = next_id(conn, IdTable::Cards)?;
        card.modified = now;
        card.usn = USN_PENDING;
        conn.insert_card(card)?;
    }
    Ok(cards)
}

/// Delete a note and its cards with graves. Returns the number of cards removed.
pub(crate) fn remove_note(conn: &Connection, note_id: i64) -> Result<usize> {
    let cards = conn.list_cards(&CardFilter::note(note_id))?;
    for card in &cards {
        conn.delete_card(card.id)?;
        conn.add_grave(card.id, GraveKind::Card)?;
    }
    conn.delete_note(note_id)?;
    conn.add_grave(note_id, GraveKind::Note)?;
    Ok(cards.len())
}
