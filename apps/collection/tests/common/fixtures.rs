//! Notetype and note builders.

use decksmith_core::{Deck, DeckName, Note, Notetype, NotetypeKind};

/// Fields Front/Back; "Card 1" asks {{Front}}, "Card 2" asks {{Back}}.
pub fn basic_notetype() -> Notetype {
    let mut notetype = Notetype::new("Basic", NotetypeKind::Normal);
    notetype
        .add_field("Front")
        .add_field("Back")
        .add_template("Card 1", "{{Front}}", "{{FrontSide}}<hr>{{Back}}")
        .add_template("Card 2", "{{Back}}", "{{FrontSide}}<hr>{{Front}}");
    notetype
}

/// Fields Text/Extra with a single cloze template.
pub fn cloze_notetype() -> Notetype {
    let mut notetype = Notetype::new("Cloze", NotetypeKind::Cloze);
    notetype
        .add_field("Text")
        .add_field("Extra")
        .add_template("Cloze", "{{cloze:Text}}", "{{cloze:Text}}<br>{{Extra}}");
    notetype
}

pub fn note(notetype_id: i64, fields: &[&str]) -> Note {
    Note::new(notetype_id, fields.iter().map(|f| f.to_string()).collect())
}

/// A normal deck named with `::` separators, as a user would type it.
pub fn deck(name: &str) -> Deck {
    Deck::new(DeckName::from_human(name))
}
