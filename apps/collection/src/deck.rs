//! Decks and deck options groups.

use crate::collection::{Collection, Result};
use crate::db::date_utils::now_secs;
use crate::db::{next_id, resolve_id, DbError, DeckConfigRepository, DeckRepository, IdTable};
use decksmith_core::{Deck, DeckConfig, DeckKind, DeckName, DEFAULT_DECK_CONFIG_ID, USN_PENDING};
use tracing::{debug, info};

impl Collection {
    pub fn get_deck(&self, id: i64) -> Result<Deck> {
        self.conn.get_deck(id)?.ok_or(DbError::DeckNotFound(id))
    }

    pub fn find_deck(&self, name: &DeckName) -> Result<Option<Deck>> {
        self.conn.get_deck_by_name(name)
    }

    /// All decks ordered by name, each parent directly followed by its children.
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        self.conn.list_decks()
    }

    /// Save a new deck, creating any missing parent decks first.
    ///
    /// Implicitly created parents are collapsed and use the default options
    /// group. Returns the number of parents created.
    pub fn add_deck(&mut self, deck: &mut Deck) -> Result<usize> {
        deck.name.validate()?;
        let tx = self.conn.transaction()?;
        if tx.get_deck_by_name(&deck.name)?.is_some() {
            return Err(DbError::InvalidData(format!(
                "deck {} already exists",
                deck.name
            )));
        }
        if let DeckKind::Normal { config_id } = deck.kind {
            if tx.get_deck_config(config_id)?.is_none() {
                return Err(DbError::DeckConfigNotFound(config_id));
            }
        }

        let mut saved = deck.clone();
        saved.id = resolve_id(&tx, IdTable::Decks, saved.id)?;
        saved.modified = now_secs();
        saved.usn = USN_PENDING;
        tx.insert_deck(&saved)?;

        let mut created = 0;
        for name in saved.name.ancestors() {
            if let Some(existing) = tx.get_deck_by_name(&name)? {
                if existing.is_filtered() {
                    return Err(DbError::InvalidData(format!(
                        "filtered deck {name} cannot have child decks"
                    )));
                }
                // Its own parents were created along with it.
                break;
            }
            let mut parent = Deck::new(name);
            parent.id = next_id(&tx, IdTable::Decks)?;
            parent.modified = saved.modified;
            parent.usn = saved.usn;
            parent.common.study_collapsed = true;
            parent.common.browser_collapsed = true;
            tx.insert_deck(&parent)?;
            debug!(deck_id = parent.id, name = %parent.name, "created parent deck");
            created += 1;
        }
        tx.commit()?;

        info!(deck_id = saved.id, name = %saved.name, parents = created, "added deck");
        *deck = saved;
        Ok(created)
    }

    pub fn get_deck_config(&self, id: i64) -> Result<DeckConfig> {
        self.conn
            .get_deck_config(id)?
            .ok_or(DbError::DeckConfigNotFound(id))
    }

    pub fn list_deck_configs(&self) -> Result<Vec<DeckConfig>> {
        self.conn.list_deck_configs()
    }

    pub fn add_deck_config(&mut self, config: &mut DeckConfig) -> Result<()> {
        let tx = self.conn.transaction()?;
        let mut saved = config.clone();
        saved.id = resolve_id(&tx, IdTable::DeckConfigs, saved.id)?;
        saved.modified = now_secs();
        saved.usn = USN_PENDING;
        tx.insert_deck_config(&saved)?;
        tx.commit()?;

        debug!(config_id = saved.id, name = %saved.name, "added deck config");
        *config = saved;
        Ok(())
    }

    /// Delete an options group. Decks using it fall back to the default group,
    /// which itself cannot be deleted.
    pub fn delete_deck_config(&mut self, id: i64) -> Result<()> {
        if id == DEFAULT_DECK_CONFIG_ID {
            return Err(DbError::InvalidData(
                "the default deck config cannot be deleted".to_string(),
            ));
        }
        let tx = self.conn.transaction()?;
        if tx.get_deck_config(id)?.is_none() {
            return Err(DbError::DeckConfigNotFound(id));
        }

        let now = now_secs();
        let mut reassigned = 0;
        for mut deck in tx.list_decks()? {
            if deck.config_id() == Some(id) {
                deck.kind = DeckKind::Normal {
                    config_id: DEFAULT_DECK_CONFIG_ID,
                };
                deck.modified = now;
                deck.usn = USN_PENDING;
                tx.update_deck(&deck)?;
                reassigned += 1;
            }
        }
        tx.delete_deck_config(id)?;
        tx.commit()?;

        info!(config_id = id, decks = reassigned, "deleted deck config");
        Ok(())
    }
}
