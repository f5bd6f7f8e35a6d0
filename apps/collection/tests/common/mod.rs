//! Shared setup for collection integration tests.
//!
//! - `TestContext` wraps an in-memory collection with a saved "Basic" notetype
//! - `fixtures` builds notetypes, notes and decks

#![allow(dead_code)]

pub mod fixtures;

use decksmith_collection::{CardFilter, Collection};
use decksmith_core::{Card, Note, Notetype};

/// Deck the fixtures add notes to.
pub const DECK: i64 = 5;

pub struct TestContext {
    pub col: Collection,
    pub notetype: Notetype,
}

impl TestContext {
    /// In-memory collection with the two-template "Basic" notetype saved.
    pub fn new() -> Self {
        Self::with_notetype(fixtures::basic_notetype())
    }

    pub fn with_notetype(mut notetype: Notetype) -> Self {
        let mut col = Collection::open_in_memory().expect("open in-memory collection");
        col.add_notetype(&mut notetype).expect("add notetype");
        Self { col, notetype }
    }

    /// Add a note of the context notetype to [`DECK`].
    pub fn add_note(&mut self, fields: &[&str]) -> Note {
        let mut note = fixtures::note(self.notetype.id, fields);
        self.col.add_note(DECK, &mut note).expect("add note");
        note
    }

    /// Reload the context notetype as saved.
    pub fn saved_notetype(&self) -> Notetype {
        self.col.get_notetype(self.notetype.id).expect("load notetype")
    }

    pub fn cards_of(&self, note: &Note) -> Vec<Card> {
        self.col
            .list_cards(&CardFilter::note(note.id))
            .expect("list cards")
    }

    pub fn ordinals_of(&self, note: &Note) -> Vec<u32> {
        self.cards_of(note).iter().map(|card| card.ordinal).collect()
    }
}
