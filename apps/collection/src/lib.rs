//! Collection storage for the decksmith card engine.
//!
//! Notes, cards, notetypes and decks live in a SQLite database. Adding or
//! editing a note generates its cards; editing a notetype migrates existing
//! notes and cards in a single transaction.

pub mod collection;
pub mod config;
pub mod db;
pub mod deck;
pub mod notetype;

pub use collection::Collection;
pub use config::{CollectionConfig, ConfigError};
pub use db::{CardFilter, CollectionStats, DbError, GraveKind};
pub use notetype::MigrationSummary;

use anyhow::bail;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Entry point of the `decksmith` binary.
///
/// `check` adds missing cards to every note, `decks` lists the deck tree and
/// `stats` (the default) reports row counts.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CollectionConfig::from_env()?;
    let command = std::env::args().nth(1).unwrap_or_else(|| "stats".into());

    tracing::info!(path = %config.path.display(), "Opening collection...");
    let mut col = Collection::from_config(&config)?;

    match command.as_str() {
        "check" => {
            let added = col.generate_missing_cards()?;
            tracing::info!(added, "Check complete");
        }
        "stats" => {
            let stats = col.stats()?;
            tracing::info!(
                notetypes = stats.notetypes,
                notes = stats.notes,
                cards = stats.cards,
                new_cards = stats.new_cards,
                graves = stats.graves,
                decks = stats.decks,
                "Collection stats"
            );
        }
        "decks" => {
            for deck in col.list_decks()? {
                tracing::info!(id = deck.id, name = %deck.name, "Deck");
            }
        }
        other => bail!("unknown command {other:?}, expected `check`, `decks` or `stats`"),
    }

    Ok(())
}
