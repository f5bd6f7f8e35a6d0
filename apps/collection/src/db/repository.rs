//! Repository pattern for database access.
//!
//! Every repository is implemented for [`Connection`], so the same calls work
//! on a plain connection and inside a [`rusqlite::Transaction`].

use crate::db::date_utils::{from_secs, to_secs};
use crate::db::error::DbError;
use crate::db::schema::{INIT_COL, SCHEMA, SCHEMA_VERSION};
use chrono::Utc;
use decksmith_core::fields::{join_fields, join_tags, split_fields, split_tags};
use decksmith_core::{
    Card, CardQueue, CardType, Deck, DeckConfig, DeckName, Field, FieldConfig, Note, Notetype,
    NotetypeConfig, NotetypeKind, Template, TemplateConfig, DEFAULT_DECK_CONFIG_ID,
    DEFAULT_DECK_ID, USN_PENDING,
};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, DbError>;

/// Create tables, the collection row, the default options group and the
/// default deck if they do not exist yet.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    let now = Utc::now();
    conn.execute(
        INIT_COL,
        params![now.timestamp(), now.timestamp_millis(), SCHEMA_VERSION],
    )?;

    if conn.get_deck_config(DEFAULT_DECK_CONFIG_ID)?.is_none() {
        let mut config = DeckConfig::new("Default");
        config.id = DEFAULT_DECK_CONFIG_ID;
        conn.insert_deck_config(&config)?;
    }
    if conn.get_deck(DEFAULT_DECK_ID)?.is_none() {
        let mut deck = Deck::new(DeckName::from_native("Default"));
        deck.id = DEFAULT_DECK_ID;
        conn.insert_deck(&deck)?;
    }
    Ok(())
}

/// Repository for note operations.
pub trait NoteRepository {
    fn get_note(&self, id: i64) -> Result<Option<Note>>;
    fn insert_note(&self, note: &Note, sort_field: &str) -> Result<()>;
    fn update_note(&self, note: &Note, sort_field: &str) -> Result<()>;
    fn delete_note(&self, id: i64) -> Result<()>;
    fn list_notes(&self, notetype_id: Option<i64>) -> Result<Vec<Note>>;
}

/// Restricts [`CardRepository::list_cards`]; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    pub note_id: Option<i64>,
    pub notetype_id: Option<i64>,
    pub ordinals: Option<Vec<u32>>,
}

impl CardFilter {
    pub fn note(note_id: i64) -> Self {
        Self {
            note_id: Some(note_id),
            ..Default::default()
        }
    }

    pub fn notetype(notetype_id: i64) -> Self {
        Self {
            notetype_id: Some(notetype_id),
            ..Default::default()
        }
    }

    pub fn with_ordinals(mut self, ordinals: impl IntoIterator<Item = u32>) -> Self {
        self.ordinals = Some(ordinals.into_iter().collect());
        self
    }
}

/// Repository for card operations.
pub trait CardRepository {
    fn get_card(&self, id: i64) -> Result<Option<Card>>;
    fn insert_card(&self, card: &Card) -> Result<()>;
    fn update_card(&self, card: &Card) -> Result<()>;
    fn delete_card(&self, id: i64) -> Result<()>;
    fn list_cards(&self, filter: &CardFilter) -> Result<Vec<Card>>;
}

/// Repository for notetype operations, including their fields and templates.
pub trait NotetypeRepository {
    fn get_notetype(&self, id: i64) -> Result<Option<Notetype>>;
    fn insert_notetype(&self, notetype: &Notetype) -> Result<()>;
    /// Update the notetype row only.
    fn update_notetype(&self, notetype: &Notetype) -> Result<()>;
    /// Replace the stored fields and templates with the notetype's, by position.
    fn replace_fields_and_templates(&self, notetype: &Notetype) -> Result<()>;
    fn delete_notetype(&self, id: i64) -> Result<()>;
    /// All notetypes, or those called `name` (including `name+…` variants).
    fn list_notetypes(&self, name: Option<&str>) -> Result<Vec<Notetype>>;
}

/// Repository for deck operations.
pub trait DeckRepository {
    fn get_deck(&self, id: i64) -> Result<Option<Deck>>;
    fn get_deck_by_name(&self, name: &DeckName) -> Result<Option<Deck>>;
    fn insert_deck(&self, deck: &Deck) -> Result<()>;
    fn update_deck(&self, deck: &Deck) -> Result<()>;
    /// All decks, each parent directly followed by its children.
    fn list_decks(&self) -> Result<Vec<Deck>>;
}

/// Repository for deck options groups.
pub trait DeckConfigRepository {
    fn get_deck_config(&self, id: i64) -> Result<Option<DeckConfig>>;
    fn insert_deck_config(&self, config: &DeckConfig) -> Result<()>;
    fn delete_deck_config(&self, id: i64) -> Result<()>;
    fn list_deck_configs(&self) -> Result<Vec<DeckConfig>>;
}

/// Kind of object a grave records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraveKind {
    Card,
    Note,
    Notetype,
}

impl GraveKind {
    pub fn code(self) -> i64 {
        match self {
            Self::Card => 0,
            Self::Note => 1,
            Self::Notetype => 2,
        }
    }
}

/// Repository for deletion records.
pub trait GraveRepository {
    fn add_grave(&self, oid: i64, kind: GraveKind) -> Result<()>;
}

/// Row counts of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CollectionStats {
    pub notetypes: usize,
    pub notes: usize,
    pub cards: usize,
    pub new_cards: usize,
    pub graves: usize,
    pub decks: usize,
}

/// Repository for statistics operations.
pub trait StatsRepository {
    fn get_stats(&self) -> Result<CollectionStats>;
}

/// Notetype config as stored; the kind is kept as its integer code.
#[derive(Debug, Serialize, Deserialize)]
struct StoredNotetypeConfig {
    kind: i32,
    #[serde(default)]
    sort_field_idx: u32,
    #[serde(default)]
    css: String,
}

impl From<&NotetypeConfig> for StoredNotetypeConfig {
    fn from(config: &NotetypeConfig) -> Self {
        Self {
            kind: config.kind.code(),
            sort_field_idx: config.sort_field_idx,
            css: config.css.clone(),
        }
    }
}

impl TryFrom<StoredNotetypeConfig> for NotetypeConfig {
    type Error = DbError;

    fn try_from(stored: StoredNotetypeConfig) -> Result<Self> {
        Ok(Self {
            kind: NotetypeKind::try_from(stored.kind)?,
            sort_field_idx: stored.sort_field_idx,
            css: stored.css,
        })
    }
}

const NOTE_COLUMNS: &str = "id, guid, mid, mod, usn, tags, flds, csum, flags, data";

fn note_from_row(row: &Row) -> rusqlite::Result<Note> {
    let tags: String = row.get(5)?;
    let fields: String = row.get(6)?;
    let checksum: i64 = row.get(7)?;
    Ok(Note {
        id: row.get(0)?,
        guid: row.get(1)?,
        notetype_id: row.get(2)?,
        modified: from_secs(row.get(3)?),
        usn: row.get(4)?,
        tags: split_tags(&tags),
        fields: split_fields(&fields),
        checksum: u32::try_from(checksum)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(7, checksum))?,
        flags: row.get(8)?,
        data: row.get(9)?,
    })
}

impl NoteRepository for Connection {
    fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let note = self
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                params![id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn insert_note(&self, note: &Note, sort_field: &str) -> Result<()> {
        self.execute(
            "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                note.id,
                note.guid,
                note.notetype_id,
                to_secs(note.modified),
                note.usn,
                join_tags(&note.tags),
                join_fields(&note.fields),
                sort_field,
                note.checksum,
                note.flags,
                note.data,
            ],
        )?;
        Ok(())
    }

    fn update_note(&self, note: &Note, sort_field: &str) -> Result<()> {
        let changed = self.execute(
            "UPDATE notes SET guid = ?2, mid = ?3, mod = ?4, usn = ?5, tags = ?6, flds = ?7,
                 sfld = ?8, csum = ?9, flags = ?10, data = ?11
             WHERE id = ?1",
            params![
                note.id,
                note.guid,
                note.notetype_id,
                to_secs(note.modified),
                note.usn,
                join_tags(&note.tags),
                join_fields(&note.fields),
                sort_field,
                note.checksum,
                note.flags,
                note.data,
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NoteNotFound(note.id));
        }
        Ok(())
    }

    fn delete_note(&self, id: i64) -> Result<()> {
        self.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_notes(&self, notetype_id: Option<i64>) -> Result<Vec<Note>> {
        let notes = match notetype_id {
            Some(mid) => {
                let mut stmt = self.prepare(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE mid = ?1 ORDER BY id"
                ))?;
                let rows = stmt.query_map(params![mid], note_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt =
                    self.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;
                let rows = stmt.query_map([], note_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(notes)
    }
}

const CARD_COLUMNS: &str = "id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, \
                            lapses, left, odue, odid, flags, data";

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    let type_code: i64 = row.get(6)?;
    let queue_code: i64 = row.get(7)?;
    Ok(Card {
        id: row.get(0)?,
        note_id: row.get(1)?,
        deck_id: row.get(2)?,
        ordinal: row.get(3)?,
        modified: from_secs(row.get(4)?),
        usn: row.get(5)?,
        card_type: CardType::from_code(type_code)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(6, type_code))?,
        queue: CardQueue::from_code(queue_code)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(7, queue_code))?,
        due: row.get(8)?,
        interval: row.get(9)?,
        factor: row.get(10)?,
        repetitions: row.get(11)?,
        lapses: row.get(12)?,
        left: row.get(13)?,
        original_due: row.get(14)?,
        original_deck_id: row.get(15)?,
        flags: row.get(16)?,
        data: row.get(17)?,
    })
}

impl CardRepository for Connection {
    fn get_card(&self, id: i64) -> Result<Option<Card>> {
        let card = self
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id],
                card_from_row,
            )
            .optional()?;
        Ok(card)
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        self.execute(
            "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps,
                 lapses, left, odue, odid, flags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                card.id,
                card.note_id,
                card.deck_id,
                card.ordinal,
                to_secs(card.modified),
                card.usn,
                card.card_type.code(),
                card.queue.code(),
                card.due,
                card.interval,
                card.factor,
                card.repetitions,
                card.lapses,
                card.left,
                card.original_due,
                card.original_deck_id,
                card.flags,
                card.data,
            ],
        )?;
        Ok(())
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        let changed = self.execute(
            "UPDATE cards SET nid = ?2, did = ?3, ord = ?4, mod = ?5, usn = ?6, type = ?7,
                 queue = ?8, due = ?9, ivl = ?10, factor = ?11, reps = ?12, lapses = ?13,
                 left = ?14, odue = ?15, odid = ?16, flags = ?17, data = ?18
             WHERE id = ?1",
            params![
                card.id,
                card.note_id,
                card.deck_id,
                card.ordinal,
                to_secs(card.modified),
                card.usn,
                card.card_type.code(),
                card.queue.code(),
                card.due,
                card.interval,
                card.factor,
                card.repetitions,
                card.lapses,
                card.left,
                card.original_due,
                card.original_deck_id,
                card.flags,
                card.data,
            ],
        )?;
        if changed == 0 {
            return Err(DbError::CardNotFound(card.id));
        }
        Ok(())
    }

    fn delete_card(&self, id: i64) -> Result<()> {
        self.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_cards(&self, filter: &CardFilter) -> Result<Vec<Card>> {
        let mut conditions = Vec::new();
        let mut values: Vec<i64> = Vec::new();

        if let Some(note_id) = filter.note_id {
            values.push(note_id);
            conditions.push(format!("nid = ?{}", values.len()));
        }
        if let Some(notetype_id) = filter.notetype_id {
            values.push(notetype_id);
            conditions.push(format!(
                "nid IN (SELECT id FROM notes WHERE mid = ?{})",
                values.len()
            ));
        }
        if let Some(ordinals) = &filter.ordinals {
            if ordinals.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders: Vec<String> = ordinals
                .iter()
                .map(|ord| {
                    values.push(i64::from(*ord));
                    format!("?{}", values.len())
                })
                .collect();
            conditions.push(format!("ord IN ({})", placeholders.join(", ")));
        }

        let mut sql = format!("SELECT {CARD_COLUMNS} FROM cards");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY nid, ord");

        let mut stmt = self.prepare(&sql)?;
        let cards = stmt
            .query_map(params_from_iter(values), card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }
}

impl NotetypeRepository for Connection {
    fn get_notetype(&self, id: i64) -> Result<Option<Notetype>> {
        let row = self
            .query_row(
                "SELECT id, name, mtime_secs, usn, config FROM notetypes WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Vec<u8>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, mtime_secs, usn, config)) = row else {
            return Ok(None);
        };
        let stored: StoredNotetypeConfig = serde_json::from_slice(&config)?;

        Ok(Some(Notetype {
            id,
            name,
            modified: from_secs(mtime_secs),
            usn,
            fields: load_fields(self, id)?,
            templates: load_templates(self, id)?,
            config: NotetypeConfig::try_from(stored)?,
        }))
    }

    fn insert_notetype(&self, notetype: &Notetype) -> Result<()> {
        let config = serde_json::to_vec(&StoredNotetypeConfig::from(&notetype.config))?;
        self.execute(
            "INSERT INTO notetypes (id, name, mtime_secs, usn, config) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                notetype.id,
                notetype.name,
                to_secs(notetype.modified),
                notetype.usn,
                config
            ],
        )?;
        self.replace_fields_and_templates(notetype)
    }

    fn update_notetype(&self, notetype: &Notetype) -> Result<()> {
        let config = serde_json::to_vec(&StoredNotetypeConfig::from(&notetype.config))?;
        let changed = self.execute(
            "UPDATE notetypes SET name = ?2, mtime_secs = ?3, usn = ?4, config = ?5 WHERE id = ?1",
            params![
                notetype.id,
                notetype.name,
                to_secs(notetype.modified),
                notetype.usn,
                config
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotetypeNotFound(notetype.id));
        }
        Ok(())
    }

    fn replace_fields_and_templates(&self, notetype: &Notetype) -> Result<()> {
        self.execute("DELETE FROM fields WHERE ntid = ?1", params![notetype.id])?;
        self.execute("DELETE FROM templates WHERE ntid = ?1", params![notetype.id])?;

        for (ord, field) in notetype.fields.iter().enumerate() {
            self.execute(
                "INSERT INTO fields (ntid, ord, name, config) VALUES (?1, ?2, ?3, ?4)",
                params![
                    notetype.id,
                    ord as i64,
                    field.name,
                    serde_json::to_vec(&field.config)?
                ],
            )?;
        }

        for (ord, template) in notetype.templates.iter().enumerate() {
            self.execute(
                "INSERT INTO templates (ntid, ord, name, mtime_secs, usn, config)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    notetype.id,
                    ord as i64,
                    template.name,
                    to_secs(template.modified),
                    template.usn,
                    serde_json::to_vec(&template.config)?
                ],
            )?;
        }

        Ok(())
    }

    fn delete_notetype(&self, id: i64) -> Result<()> {
        self.execute("DELETE FROM fields WHERE ntid = ?1", params![id])?;
        self.execute("DELETE FROM templates WHERE ntid = ?1", params![id])?;
        self.execute("DELETE FROM notetypes WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_notetypes(&self, name: Option<&str>) -> Result<Vec<Notetype>> {
        let ids = match name {
            Some(name) => {
                let mut stmt = self.prepare(
                    r"SELECT id FROM notetypes WHERE name = ?1 OR name LIKE ?2 ESCAPE '\' ORDER BY id",
                )?;
                let pattern = format!("{}+%", escape_like(name));
                let rows = stmt.query_map(params![name, pattern], |row| row.get(0))?;
                rows.collect::<rusqlite::Result<Vec<i64>>>()?
            }
            None => {
                let mut stmt = self.prepare("SELECT id FROM notetypes ORDER BY id")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<rusqlite::Result<Vec<i64>>>()?
            }
        };

        let mut notetypes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(notetype) = self.get_notetype(id)? {
                notetypes.push(notetype);
            }
        }
        Ok(notetypes)
    }
}

/// Escape LIKE wildcards so `name` only matches itself.
fn escape_like(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn load_fields(conn: &Connection, notetype_id: i64) -> Result<Vec<Field>> {
    let mut stmt =
        conn.prepare("SELECT ord, name, config FROM fields WHERE ntid = ?1 ORDER BY ord")?;
    let rows = stmt
        .query_map(params![notetype_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(ord, name, config)| {
            Ok(Field {
                ordinal: Some(ord),
                name,
                config: serde_json::from_slice::<FieldConfig>(&config)?,
            })
        })
        .collect()
}

fn load_templates(conn: &Connection, notetype_id: i64) -> Result<Vec<Template>> {
    let mut stmt = conn.prepare(
        "SELECT ord, name, mtime_secs, usn, config FROM templates WHERE ntid = ?1 ORDER BY ord",
    )?;
    let rows = stmt
        .query_map(params![notetype_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Vec<u8>>(4)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(ord, name, mtime_secs, usn, config)| {
            Ok(Template {
                ordinal: Some(ord),
                name,
                modified: from_secs(mtime_secs),
                usn,
                config: serde_json::from_slice::<TemplateConfig>(&config)?,
            })
        })
        .collect()
}

impl GraveRepository for Connection {
    fn add_grave(&self, oid: i64, kind: GraveKind) -> Result<()> {
        self.execute(
            "INSERT INTO graves (usn, oid, type) VALUES (?1, ?2, ?3)",
            params![USN_PENDING, oid, kind.code()],
        )?;
        Ok(())
    }
}

const DECK_COLUMNS: &str = "id, name, mtime_secs, usn, common, kind";

type DeckRow = (i64, String, i64, i64, Vec<u8>, Vec<u8>);

fn deck_row(row: &Row) -> rusqlite::Result<DeckRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn deck_from_row((id, name, mtime_secs, usn, common, kind): DeckRow) -> Result<Deck> {
    Ok(Deck {
        id,
        name: DeckName::from_native(name),
        modified: from_secs(mtime_secs),
        usn,
        common: serde_json::from_slice(&common)?,
        kind: serde_json::from_slice(&kind)?,
    })
}

impl DeckRepository for Connection {
    fn get_deck(&self, id: i64) -> Result<Option<Deck>> {
        self.query_row(
            &format!("SELECT {DECK_COLUMNS} FROM decks WHERE id = ?1"),
            params![id],
            deck_row,
        )
        .optional()?
        .map(deck_from_row)
        .transpose()
    }

    fn get_deck_by_name(&self, name: &DeckName) -> Result<Option<Deck>> {
        self.query_row(
            &format!("SELECT {DECK_COLUMNS} FROM decks WHERE name = ?1"),
            params![name.as_native()],
            deck_row,
        )
        .optional()?
        .map(deck_from_row)
        .transpose()
    }

    fn insert_deck(&self, deck: &Deck) -> Result<()> {
        self.execute(
            "INSERT INTO decks (id, name, mtime_secs, usn, common, kind) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                deck.id,
                deck.name.as_native(),
                to_secs(deck.modified),
                deck.usn,
                serde_json::to_vec(&deck.common)?,
                serde_json::to_vec(&deck.kind)?
            ],
        )?;
        Ok(())
    }

    fn update_deck(&self, deck: &Deck) -> Result<()> {
        let changed = self.execute(
            "UPDATE decks SET name = ?2, mtime_secs = ?3, usn = ?4, common = ?5, kind = ?6 WHERE id = ?1",
            params![
                deck.id,
                deck.name.as_native(),
                to_secs(deck.modified),
                deck.usn,
                serde_json::to_vec(&deck.common)?,
                serde_json::to_vec(&deck.kind)?
            ],
        )?;
        if changed == 0 {
            return Err(DbError::DeckNotFound(deck.id));
        }
        Ok(())
    }

    fn list_decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self.prepare(&format!("SELECT {DECK_COLUMNS} FROM decks ORDER BY name"))?;
        let rows = stmt
            .query_map([], deck_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(deck_from_row).collect()
    }
}

type DeckConfigRow = (i64, String, i64, i64, Vec<u8>);

fn deck_config_row(row: &Row) -> rusqlite::Result<DeckConfigRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn deck_config_from_row(
    (id, name, mtime_secs, usn, config): DeckConfigRow,
) -> Result<DeckConfig> {
    Ok(DeckConfig {
        id,
        name,
        modified: from_secs(mtime_secs),
        usn,
        config: serde_json::from_slice(&config)?,
    })
}

impl DeckConfigRepository for Connection {
    fn get_deck_config(&self, id: i64) -> Result<Option<DeckConfig>> {
        self.query_row(
            "SELECT id, name, mtime_secs, usn, config FROM deck_config WHERE id = ?1",
            params![id],
            deck_config_row,
        )
        .optional()?
        .map(deck_config_from_row)
        .transpose()
    }

    fn insert_deck_config(&self, config: &DeckConfig) -> Result<()> {
        self.execute(
            "INSERT INTO deck_config (id, name, mtime_secs, usn, config) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                config.id,
                config.name,
                to_secs(config.modified),
                config.usn,
                serde_json::to_vec(&config.config)?
            ],
        )?;
        Ok(())
    }

    fn delete_deck_config(&self, id: i64) -> Result<()> {
        self.execute("DELETE FROM deck_config WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_deck_configs(&self) -> Result<Vec<DeckConfig>> {
        let mut stmt =
            self.prepare("SELECT id, name, mtime_secs, usn, config FROM deck_config ORDER BY id")?;
        let rows = stmt
            .query_map([], deck_config_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(deck_config_from_row).collect()
    }
}

impl StatsRepository for Connection {
    fn get_stats(&self) -> Result<CollectionStats> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.query_row(sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(CollectionStats {
            notetypes: count("SELECT count(*) FROM notetypes")?,
            notes: count("SELECT count(*) FROM notes")?,
            cards: count("SELECT count(*) FROM cards")?,
            new_cards: count("SELECT count(*) FROM cards WHERE queue = 0")?,
            graves: count("SELECT count(*) FROM graves")?,
            decks: count("SELECT count(*) FROM decks")?,
        })
    }
}
