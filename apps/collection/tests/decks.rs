//! Deck hierarchy and deck options groups.

mod common;

use common::fixtures;
use decksmith_collection::{Collection, DbError};
use decksmith_core::{
    CoreError, DeckConfig, DeckKind, DeckName, DEFAULT_DECK_CONFIG_ID, DEFAULT_DECK_ID,
    USN_PENDING,
};
use pretty_assertions::assert_eq;

fn names(col: &Collection) -> Vec<String> {
    col.list_decks()
        .unwrap()
        .iter()
        .map(|deck| deck.name.human_string())
        .collect()
}

#[test]
fn test_new_collection_has_default_deck() {
    let col = Collection::open_in_memory().unwrap();
    let deck = col.get_deck(DEFAULT_DECK_ID).unwrap();
    assert_eq!(deck.name.human_string(), "Default");
    assert_eq!(deck.config_id(), Some(DEFAULT_DECK_CONFIG_ID));
    assert_eq!(col.stats().unwrap().decks, 1);
}

#[test]
fn test_add_deck_creates_missing_parents() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut deck = fixtures::deck("Languages::Spanish::Verbs");
    deck.usn = 12;

    assert_eq!(col.add_deck(&mut deck).unwrap(), 2);
    assert_ne!(deck.id, 0);
    assert_eq!(deck.usn, USN_PENDING);
    assert_eq!(
        names(&col),
        vec![
            "Default",
            "Languages",
            "Languages::Spanish",
            "Languages::Spanish::Verbs"
        ]
    );

    let parent = col
        .find_deck(&DeckName::from_human("Languages::Spanish"))
        .unwrap()
        .unwrap();
    assert!(parent.common.study_collapsed);
    assert!(parent.common.browser_collapsed);
    assert_eq!(parent.config_id(), Some(DEFAULT_DECK_CONFIG_ID));
    assert_eq!(parent.usn, deck.usn);
    assert_ne!(parent.id, deck.id);
    assert!(!col.get_deck(deck.id).unwrap().common.study_collapsed);
}

#[test]
fn test_add_deck_reuses_existing_parents() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut parent = fixtures::deck("Languages");
    parent.common.description = "mine".to_string();
    col.add_deck(&mut parent).unwrap();

    let mut child = fixtures::deck("Languages::French");
    assert_eq!(col.add_deck(&mut child).unwrap(), 0);

    let kept = col.get_deck(parent.id).unwrap();
    assert_eq!(kept.common.description, "mine");
    assert!(!kept.common.study_collapsed);
    assert_eq!(col.stats().unwrap().decks, 3);
}

#[test]
fn test_add_deck_fills_gap_between_existing_decks() {
    let mut col = Collection::open_in_memory().unwrap();
    col.add_deck(&mut fixtures::deck("A")).unwrap();
    assert_eq!(col.add_deck(&mut fixtures::deck("A::B::C")).unwrap(), 1);
    assert_eq!(names(&col), vec!["A", "A::B", "A::B::C", "Default"]);
}

#[test]
fn test_caller_assigned_deck_id_is_kept() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut deck = fixtures::deck("Top::Child");
    deck.id = 5;
    col.add_deck(&mut deck).unwrap();
    assert_eq!(deck.id, 5);
    assert_eq!(col.get_deck(5).unwrap().name.human_string(), "Top::Child");
}

#[test]
fn test_add_duplicate_deck_is_rejected() {
    let mut col = Collection::open_in_memory().unwrap();
    col.add_deck(&mut fixtures::deck("Spanish")).unwrap();
    let result = col.add_deck(&mut fixtures::deck("Spanish"));
    assert!(matches!(result, Err(DbError::InvalidData(_))));
    assert_eq!(col.stats().unwrap().decks, 2);
}

#[test]
fn test_add_deck_rejects_empty_name_component() {
    let mut col = Collection::open_in_memory().unwrap();
    let result = col.add_deck(&mut fixtures::deck("A::::B"));
    assert!(matches!(
        result,
        Err(DbError::Core(CoreError::InvalidDeckName(_)))
    ));
    assert_eq!(col.stats().unwrap().decks, 1);
}

#[test]
fn test_add_deck_requires_known_config() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut deck = fixtures::deck("Parent::Child");
    deck.kind = DeckKind::Normal { config_id: 77 };
    let result = col.add_deck(&mut deck);
    assert!(matches!(result, Err(DbError::DeckConfigNotFound(77))));
    assert_eq!(names(&col), vec!["Default"]);
}

#[test]
fn test_filtered_deck_cannot_have_children() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut filtered = fixtures::deck("Cram");
    filtered.kind = DeckKind::Filtered {
        search: "is:due".to_string(),
        reschedule: false,
    };
    col.add_deck(&mut filtered).unwrap();

    let result = col.add_deck(&mut fixtures::deck("Cram::Inner"));
    assert!(matches!(result, Err(DbError::InvalidData(_))));
    assert_eq!(names(&col), vec!["Cram", "Default"]);
}

#[test]
fn test_get_missing_deck() {
    let col = Collection::open_in_memory().unwrap();
    assert!(matches!(col.get_deck(404), Err(DbError::DeckNotFound(404))));
    assert_eq!(col.find_deck(&DeckName::from_human("Nope")).unwrap(), None);
}

#[test]
fn test_deck_config_lifecycle() {
    let mut col = Collection::open_in_memory().unwrap();
    let defaults = col.get_deck_config(DEFAULT_DECK_CONFIG_ID).unwrap();
    assert_eq!(defaults.config.reviews_per_day, 200);

    let mut config = DeckConfig::new("Exam prep");
    config.config.new_per_day = 100;
    col.add_deck_config(&mut config).unwrap();
    assert_ne!(config.id, 0);
    assert_eq!(config.usn, USN_PENDING);
    assert_eq!(col.get_deck_config(config.id).unwrap(), config);
    assert_eq!(col.list_deck_configs().unwrap().len(), 2);

    col.delete_deck_config(config.id).unwrap();
    assert!(matches!(
        col.get_deck_config(config.id),
        Err(DbError::DeckConfigNotFound(_))
    ));
    assert!(matches!(
        col.delete_deck_config(config.id),
        Err(DbError::DeckConfigNotFound(_))
    ));
}

#[test]
fn test_deleting_deck_config_moves_decks_to_default() {
    let mut col = Collection::open_in_memory().unwrap();
    let mut config = DeckConfig::new("Slow");
    col.add_deck_config(&mut config).unwrap();
    let mut deck = fixtures::deck("Slow deck");
    deck.kind = DeckKind::Normal {
        config_id: config.id,
    };
    col.add_deck(&mut deck).unwrap();

    col.delete_deck_config(config.id).unwrap();
    assert_eq!(
        col.get_deck(deck.id).unwrap().config_id(),
        Some(DEFAULT_DECK_CONFIG_ID)
    );
}

#[test]
fn test_default_deck_config_cannot_be_deleted() {
    let mut col = Collection::open_in_memory().unwrap();
    let result = col.delete_deck_config(DEFAULT_DECK_CONFIG_ID);
    assert!(matches!(result, Err(DbError::InvalidData(_))));
    assert_eq!(col.list_deck_configs().unwrap().len(), 1);
}

#[test]
fn test_decks_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.anki2");
    let id = {
        let mut col = Collection::open(&path).unwrap();
        let mut deck = fixtures::deck("Saved::Here");
        col.add_deck(&mut deck).unwrap();
        deck.id
    };

    let col = Collection::open(&path).unwrap();
    assert_eq!(col.get_deck(id).unwrap().name.human_string(), "Saved::Here");
    assert_eq!(names(&col), vec!["Default", "Saved", "Saved::Here"]);
}
