//! Collections stored on disk.

mod common;

use common::{fixtures, DECK};
use decksmith_collection::{CardFilter, Collection, CollectionConfig};

#[test]
fn test_reopen_keeps_notes_and_cards() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile").join("collection.anki2");

    let (notetype_id, note_id) = {
        let mut col = Collection::open(&path).unwrap();
        let mut notetype = fixtures::basic_notetype();
        col.add_notetype(&mut notetype).unwrap();
        let mut note = fixtures::note(notetype.id, &["hi", "there"]);
        col.add_note(DECK, &mut note).unwrap();
        (notetype.id, note.id)
    };

    let col = Collection::open(&path).unwrap();
    assert_eq!(col.get_notetype(notetype_id).unwrap().templates.len(), 2);
    assert_eq!(col.get_note(note_id).unwrap().fields, vec!["hi", "there"]);
    assert_eq!(col.list_cards(&CardFilter::note(note_id)).unwrap().len(), 2);
}

#[test]
fn test_from_config_uses_default_deck() {
    let dir = tempfile::tempdir().unwrap();
    let config = CollectionConfig {
        path: dir.path().join("collection.anki2"),
        default_deck_id: 7,
    };

    let mut col = Collection::from_config(&config).unwrap();
    let mut notetype = fixtures::basic_notetype();
    col.add_notetype(&mut notetype).unwrap();
    let mut note = fixtures::note(notetype.id, &["hi", ""]);
    col.add_note(DECK, &mut note).unwrap();

    note.fields[1] = "there".to_string();
    let card = col.list_cards(&CardFilter::note(note.id)).unwrap().remove(0);
    col.delete_card(card.id).unwrap();
    let added = col.update_note(&mut note).unwrap();

    assert_eq!(added.len(), 2);
    assert!(added.iter().all(|card| card.deck_id == 7));
    assert!(config.path.exists());
}
