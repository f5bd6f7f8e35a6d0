//! Card generation: which cards a note must have under its notetype.

use crate::cloze::cloze_numbers_in_fields;
use crate::error::Result;
use crate::render::renders_with_fields;
use crate::template::TemplateEvaluator;
use crate::types::{Card, Note, Notetype, NotetypeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMPTY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:\s|</?(?:br|div)\s*/?>)*$").expect("valid empty field regex"));

/// True if `text` holds only whitespace and/or empty `<br>`/`<div>` tags.
pub fn field_is_empty(text: &str) -> bool {
    EMPTY_FIELD.is_match(text)
}

/// Names of the note's fields that are not empty, in field order.
pub fn nonempty_fields<'a>(note: &Note, notetype: &'a Notetype) -> Vec<&'a str> {
    note.fields
        .iter()
        .zip(&notetype.fields)
        .filter(|(text, _)| !field_is_empty(text))
        .map(|(_, field)| field.name.as_str())
        .collect()
}

/// A card slot that must exist for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardToGenerate {
    pub ordinal: u32,
    pub deck_id: i64,
}

/// Every card slot the note requires, regardless of what already exists.
pub fn cards_required(
    evaluator: &dyn TemplateEvaluator,
    deck_id: i64,
    note: &Note,
    notetype: &Notetype,
) -> Result<Vec<CardToGenerate>> {
    match notetype.kind() {
        NotetypeKind::Normal => cards_required_normal(evaluator, deck_id, note, notetype),
        NotetypeKind::Cloze => cards_required_cloze(deck_id, note),
    }
}

fn cards_required_normal(
    evaluator: &dyn TemplateEvaluator,
    deck_id: i64,
    note: &Note,
    notetype: &Notetype,
) -> Result<Vec<CardToGenerate>> {
    let fields = nonempty_fields(note, notetype);
    let mut cards = Vec::with_capacity(notetype.templates.len());

    for (ord, template) in notetype.templates.iter().enumerate() {
        if renders_with_fields(evaluator, &template.config.q_format, &fields)? {
            cards.push(CardToGenerate {
                ordinal: ord as u32,
                deck_id: template.config.target_deck_id.unwrap_or(deck_id),
            });
        }
    }

    Ok(cards)
}

fn cards_required_cloze(deck_id: i64, note: &Note) -> Result<Vec<CardToGenerate>> {
    let numbers = cloze_numbers_in_fields(&note.fields)?;
    Ok(numbers
        .into_iter()
        .map(|number| CardToGenerate {
            ordinal: number - 1,
            deck_id,
        })
        .collect())
}

/// New cards for the slots the note requires but does not have yet.
///
/// `existing` holds the ordinals the note already has cards for; those slots
/// are skipped, so calling this again with the result folded into `existing`
/// yields nothing.
pub fn generate_cards(
    evaluator: &dyn TemplateEvaluator,
    deck_id: i64,
    note: &Note,
    notetype: &Notetype,
    existing: &HashSet<u32>,
) -> Result<Vec<Card>> {
    let cards = cards_required(evaluator, deck_id, note, notetype)?
        .into_iter()
        .filter(|card| !existing.contains(&card.ordinal))
        .map(|card| Card::new(note.id, card.deck_id, card.ordinal))
        .collect();
    Ok(cards)
}
