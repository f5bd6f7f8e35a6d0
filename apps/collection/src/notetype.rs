//! Notetype storage and migration of existing notes and cards when a
//! notetype is edited.

use crate::collection::{add_cards, load_notetype, remove_note, stamp_note, Collection, Result};
use crate::db::date_utils::now_secs;
use crate::db::{
    resolve_id, CardFilter, CardRepository, DbError, GraveKind, GraveRepository, IdTable,
    NoteRepository, NotetypeRepository,
};
use decksmith_core::migration::reorder_note_fields;
use decksmith_core::{
    CoreError, NotetypeChanges, Notetype, NotetypeKind, TemplateEvaluator, USN_PENDING,
};
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// What a notetype update did to existing notes and cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub notes_updated: usize,
    pub cards_removed: usize,
    pub cards_moved: usize,
    pub cards_added: usize,
}

impl Collection {
    pub fn get_notetype(&self, id: i64) -> Result<Notetype> {
        load_notetype(&self.conn, id)
    }

    /// All notetypes, or those called `name` (including `name+…` variants).
    pub fn list_notetypes(&self, name: Option<&str>) -> Result<Vec<Notetype>> {
        self.conn.list_notetypes(name)
    }

    /// Save a new notetype, numbering its fields and templates by position.
    pub fn add_notetype(&mut self, notetype: &mut Notetype) -> Result<()> {
        validate_sort_field(notetype)?;
        let tx = self.conn.transaction()?;

        let mut saved = notetype.clone();
        saved.id = resolve_id(&tx, IdTable::Notetypes, saved.id)?;
        stamp_notetype(&mut saved);
        tx.insert_notetype(&saved)?;
        tx.commit()?;

        debug!(notetype_id = saved.id, name = %saved.name, "added notetype");
        *notetype = saved;
        Ok(())
    }

    /// Save an edited notetype and bring its notes and cards in line with it.
    ///
    /// Fields and templates of `notetype` carry the ordinal they were loaded
    /// with, or `None` if they were added. Existing notes get their field
    /// values permuted, cards of removed templates are deleted, cards of moved
    /// templates are renumbered and newly required cards are generated. Either
    /// all of it is applied or nothing is.
    pub fn update_notetype(&mut self, notetype: &mut Notetype) -> Result<MigrationSummary> {
        validate_sort_field(notetype)?;
        let tx = self.conn.transaction()?;
        let previous = load_notetype(&tx, notetype.id)?;
        let changes = NotetypeChanges::between(&previous, notetype)?;
        let mut summary = MigrationSummary::default();

        if !changes.field_renames.is_empty() {
            debug!(renames = ?changes.field_renames, "fields renamed or removed");
        }
        if changes.notes_need_update() {
            summary.notes_updated = update_notes_for_changed_fields(&tx, notetype, &changes)?;
        }

        summary.cards_removed = remove_cards_of_removed_templates(&tx, notetype.id, &changes)?;
        summary.cards_moved = renumber_cards_of_moved_templates(&tx, notetype.id, &changes)?;

        if changes.needs_regeneration() {
            match notetype.kind() {
                NotetypeKind::Normal => {
                    summary.cards_added =
                        add_cards_for_changed_templates(&tx, &*self.evaluator, notetype)?;
                }
                NotetypeKind::Cloze => {
                    warn!(
                        notetype_id = notetype.id,
                        "template change on cloze notetype; skipping card regeneration"
                    );
                }
            }
        }

        let mut saved = notetype.clone();
        stamp_notetype(&mut saved);
        tx.update_notetype(&saved)?;
        tx.replace_fields_and_templates(&saved)?;
        tx.commit()?;

        info!(
            notetype_id = saved.id,
            notes_updated = summary.notes_updated,
            cards_removed = summary.cards_removed,
            cards_moved = summary.cards_moved,
            cards_added = summary.cards_added,
            "updated notetype"
        );
        *notetype = saved;
        Ok(summary)
    }

    /// Delete a notetype with all of its notes and their cards.
    pub fn delete_notetype(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        if tx.get_notetype(id)?.is_none() {
            return Err(DbError::NotetypeNotFound(id));
        }

        let notes = tx.list_notes(Some(id))?;
        let mut cards = 0;
        for note in &notes {
            cards += remove_note(&tx, note.id)?;
        }
        tx.delete_notetype(id)?;
        tx.add_grave(id, GraveKind::Notetype)?;
        tx.commit()?;

        info!(notetype_id = id, notes = notes.len(), cards, "deleted notetype");
        Ok(())
    }
}

fn validate_sort_field(notetype: &Notetype) -> Result<()> {
    let index = notetype.config.sort_field_idx;
    if index as usize >= notetype.fields.len().max(1) {
        return Err(CoreError::SortFieldOutOfBounds {
            index,
            field_count: notetype.fields.len(),
        }
        .into());
    }
    Ok(())
}

/// Mark the notetype and its templates modified and number them by position.
fn stamp_notetype(notetype: &mut Notetype) {
    notetype.modified = now_secs();
    notetype.usn = USN_PENDING;
    for template in &mut notetype.templates {
        template.modified = notetype.modified;
        template.usn = USN_PENDING;
    }
    notetype.assign_ordinals();
}

/// Permute each note's fields into the new order and re-save it.
fn update_notes_for_changed_fields(
    conn: &Connection,
    notetype: &Notetype,
    changes: &NotetypeChanges,
) -> Result<usize> {
    let notes = conn.list_notes(Some(notetype.id))?;
    for mut note in notes.iter().cloned() {
        if changes.fields_reordered {
            note.fields = reorder_note_fields(&note.fields, &changes.field_ords);
        }
        let sort_field = stamp_note(&mut note, notetype)?;
        conn.update_note(&note, &sort_field)?;
    }
    Ok(notes.len())
}

fn remove_cards_of_removed_templates(
    conn: &Connection,
    notetype_id: i64,
    changes: &NotetypeChanges,
) -> Result<usize> {
    if changes.templates.removed.is_empty() {
        return Ok(0);
    }
    let filter =
        CardFilter::notetype(notetype_id).with_ordinals(changes.templates.removed.iter().copied());
    let cards = conn.list_cards(&filter)?;
    for card in &cards {
        conn.delete_card(card.id)?;
        conn.add_grave(card.id, GraveKind::Card)?;
    }
    Ok(cards.len())
}

/// Cards are all selected before any is renumbered, so swaps and shifts
/// never pick up a card that was already moved.
fn renumber_cards_of_moved_templates(
    conn: &Connection,
    notetype_id: i64,
    changes: &NotetypeChanges,
) -> Result<usize> {
    let moved = &changes.templates.moved;
    if moved.is_empty() {
        return Ok(0);
    }
    let filter = CardFilter::notetype(notetype_id).with_ordinals(moved.keys().copied());
    let cards = conn.list_cards(&filter)?;
    let now = now_secs();
    for mut card in cards.iter().cloned() {
        if let Some(ordinal) = moved.get(&card.ordinal) {
            card.ordinal = *ordinal;
            card.modified = now;
            card.usn = USN_PENDING;
            conn.update_card(&card)?;
        }
    }
    Ok(cards.len())
}

struct NoteCards {
    deck_id: i64,
    ordinals: HashSet<u32>,
}

/// Generate cards newly required by added or changed templates, for every
/// note that already has at least one card.
fn add_cards_for_changed_templates(
    conn: &Connection,
    evaluator: &dyn TemplateEvaluator,
    notetype: &Notetype,
) -> Result<usize> {
    let mut by_note: BTreeMap<i64, NoteCards> = BTreeMap::new();
    for card in conn.list_cards(&CardFilter::notetype(notetype.id))? {
        by_note
            .entry(card.note_id)
            .or_insert_with(|| NoteCards {
                deck_id: card.deck_id,
                ordinals: HashSet::new(),
            })
            .ordinals
            .insert(card.ordinal);
    }

    let mut added = 0;
    for (note_id, existing) in by_note {
        if existing.ordinals.len() == notetype.templates.len() {
            continue;
        }
        let note = conn
            .get_note(note_id)?
            .ok_or(DbError::NoteNotFound(note_id))?;
        let cards = add_cards(
            conn,
            evaluator,
            existing.deck_id,
            &note,
            notetype,
            &existing.ordinals,
        )?;
        debug!(note_id, cards = cards.len(), "generated cards for changed templates");
        added += cards.len();
    }
    Ok(added)
}
