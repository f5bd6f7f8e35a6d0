//! SQLite schema definitions.

/// Current schema version, stored in `col.ver`.
pub const SCHEMA_VERSION: i32 = 18;

/// Complete schema for a collection database.
pub const SCHEMA: &str = r#"
-- Collection-wide properties
CREATE TABLE IF NOT EXISTS col (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    crt INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    scm INTEGER NOT NULL,
    ver INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    ls INTEGER NOT NULL
);

-- Notes (field values joined by 0x1f)
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    guid TEXT NOT NULL,
    mid INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    tags TEXT NOT NULL,
    flds TEXT NOT NULL,
    sfld TEXT NOT NULL,
    csum INTEGER NOT NULL,
    flags INTEGER NOT NULL DEFAULT 0,
    data TEXT NOT NULL DEFAULT ''
);

-- Cards; (nid, ord) is kept unique by the collection, not by a constraint,
-- so ordinals can be permuted one row at a time
CREATE TABLE IF NOT EXISTS cards (
    id INTEGER PRIMARY KEY,
    nid INTEGER NOT NULL,
    did INTEGER NOT NULL,
    ord INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    type INTEGER NOT NULL,
    queue INTEGER NOT NULL,
    due INTEGER NOT NULL,
    ivl INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    reps INTEGER NOT NULL,
    lapses INTEGER NOT NULL,
    left INTEGER NOT NULL,
    odue INTEGER NOT NULL,
    odid INTEGER NOT NULL,
    flags INTEGER NOT NULL,
    data TEXT NOT NULL
);

-- Notetypes
CREATE TABLE IF NOT EXISTS notetypes (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    mtime_secs INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    config BLOB NOT NULL
);

-- Notetype fields
CREATE TABLE IF NOT EXISTS fields (
    ntid INTEGER NOT NULL,
    ord INTEGER NOT NULL,
    name TEXT NOT NULL,
    config BLOB NOT NULL,
    PRIMARY KEY (ntid, ord)
);

-- Notetype templates
CREATE TABLE IF NOT EXISTS templates (
    ntid INTEGER NOT NULL,
    ord INTEGER NOT NULL,
    name TEXT NOT NULL,
    mtime_secs INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    config BLOB NOT NULL,
    PRIMARY KEY (ntid, ord)
);

-- Decks; names are components joined by 0x1f
CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    mtime_secs INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    common BLOB NOT NULL,
    kind BLOB NOT NULL
);

-- Deck options groups
CREATE TABLE IF NOT EXISTS deck_config (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    mtime_secs INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    config BLOB NOT NULL
);

-- Deletion records for sync
CREATE TABLE IF NOT EXISTS graves (
    usn INTEGER NOT NULL,
    oid INTEGER NOT NULL,
    type INTEGER NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS ix_notes_usn ON notes (usn);
CREATE INDEX IF NOT EXISTS ix_notes_csum ON notes (csum);
CREATE INDEX IF NOT EXISTS ix_notes_mid ON notes (mid);
CREATE INDEX IF NOT EXISTS ix_cards_usn ON cards (usn);
CREATE INDEX IF NOT EXISTS ix_cards_nid ON cards (nid);
CREATE INDEX IF NOT EXISTS ix_cards_sched ON cards (did, queue, due);
CREATE INDEX IF NOT EXISTS ix_notetypes_usn ON notetypes (usn);
CREATE INDEX IF NOT EXISTS ix_templates_usn ON templates (usn);
CREATE INDEX IF NOT EXISTS ix_fields_ntid ON fields (ntid);
CREATE UNIQUE INDEX IF NOT EXISTS ix_decks_name ON decks (name);
"#;

/// Initialize collection properties if not present.
/// Parameters: creation secs, modification millis, schema version.
pub const INIT_COL: &str = r#"
INSERT OR IGNORE INTO col (id, crt, mod, scm, ver, usn, ls)
VALUES (1, ?1, ?2, ?2, ?3, 0, 0)
"#;
