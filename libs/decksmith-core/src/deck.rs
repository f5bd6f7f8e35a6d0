//! Decks, their hierarchical names and deck options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Separator between the components of a stored deck name.
pub const DECK_NAME_SEPARATOR: char = '\x1f';

/// Separator shown to users, as in `Languages::Spanish`.
pub const HUMAN_DECK_SEPARATOR: &str = "::";

/// Deck every collection starts with.
pub const DEFAULT_DECK_ID: i64 = 1;

/// Options group every collection starts with, used by decks created implicitly.
pub const DEFAULT_DECK_CONFIG_ID: i64 = 1;

/// A deck name as stored: components joined by [`DECK_NAME_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckName(String);

impl DeckName {
    pub fn join<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let components: Vec<String> = components
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        Self(components.join(&DECK_NAME_SEPARATOR.to_string()))
    }

    /// Parse a name typed by a user, e.g. `Parent::Child`.
    pub fn from_human(name: &str) -> Self {
        Self::join(name.split(HUMAN_DECK_SEPARATOR).map(str::trim))
    }

    /// Wrap a name already in stored form.
    pub fn from_native(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_native(&self) -> &str {
        &self.0
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split(DECK_NAME_SEPARATOR)
    }

    pub fn human_string(&self) -> String {
        self.0.replace(DECK_NAME_SEPARATOR, HUMAN_DECK_SEPARATOR)
    }

    /// The enclosing deck's name, or `None` for a top-level deck.
    pub fn parent(&self) -> Option<DeckName> {
        self.0
            .rfind(DECK_NAME_SEPARATOR)
            .map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Every enclosing deck name, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = DeckName> {
        std::iter::successors(self.parent(), DeckName::parent)
    }

    /// Reject names with an empty component, such as `A::::B` or `""`.
    pub fn validate(&self) -> Result<()> {
        if self.components().any(str::is_empty) {
            return Err(CoreError::InvalidDeckName(self.human_string()));
        }
        Ok(())
    }
}

impl fmt::Display for DeckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human_string())
    }
}

/// Settings shared by every kind of deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckCommon {
    pub study_collapsed: bool,
    pub browser_collapsed: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckKind {
    /// A deck holding its own cards, scheduled with an options group.
    Normal { config_id: i64 },
    /// A deck that temporarily gathers cards matching a search.
    Filtered { search: String, reschedule: bool },
}

impl Default for DeckKind {
    fn default() -> Self {
        Self::Normal {
            config_id: DEFAULT_DECK_CONFIG_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: DeckName,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub common: DeckCommon,
    pub kind: DeckKind,
}

impl Deck {
    /// A normal deck using the default options group. The id is assigned on save.
    pub fn new(name: DeckName) -> Self {
        Self {
            id: 0,
            name,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: 0,
            common: DeckCommon::default(),
            kind: DeckKind::default(),
        }
    }

    pub fn config_id(&self) -> Option<i64> {
        match self.kind {
            DeckKind::Normal { config_id } => Some(config_id),
            DeckKind::Filtered { .. } => None,
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.kind, DeckKind::Filtered { .. })
    }
}

/// What happens to new cards relative to reviews in a study session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewCardOrder {
    #[default]
    Due,
    Random,
}

/// Scheduling options, shared by every deck pointing at the same group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckOptions {
    /// Learning steps in minutes.
    pub learn_steps: Vec<f32>,
    pub relearn_steps: Vec<f32>,
    pub new_per_day: u32,
    pub reviews_per_day: u32,
    pub initial_ease: f32,
    pub easy_multiplier: f32,
    pub hard_multiplier: f32,
    pub lapse_multiplier: f32,
    pub interval_multiplier: f32,
    pub maximum_review_interval: u32,
    pub minimum_lapse_interval: u32,
    pub graduating_interval_good: u32,
    pub graduating_interval_easy: u32,
    pub new_card_order: NewCardOrder,
    pub leech_threshold: u32,
    pub cap_answer_time_to_secs: u32,
    pub show_timer: bool,
    pub wait_for_audio: bool,
    pub bury_new: bool,
    pub bury_reviews: bool,
    pub desired_retention: f32,
    pub historical_retention: f32,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            learn_steps: vec![1.0, 10.0],
            relearn_steps: vec![10.0],
            new_per_day: 20,
            reviews_per_day: 200,
            initial_ease: 2.5,
            easy_multiplier: 1.3,
            hard_multiplier: 1.2,
            lapse_multiplier: 0.0,
            interval_multiplier: 1.0,
            maximum_review_interval: 36_500,
            minimum_lapse_interval: 1,
            graduating_interval_good: 1,
            graduating_interval_easy: 4,
            new_card_order: NewCardOrder::Due,
            leech_threshold: 8,
            cap_answer_time_to_secs: 60,
            show_timer: false,
            wait_for_audio: true,
            bury_new: false,
            bury_reviews: false,
            desired_retention: 0.9,
            historical_retention: 0.9,
        }
    }
}

/// A named options group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub id: i64,
    pub name: String,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub config: DeckOptions,
}

impl DeckConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: 0,
            config: DeckOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_names_use_native_separator() {
        let name = DeckName::from_human("Languages :: Spanish::Verbs");
        assert_eq!(name.as_native(), "Languages\x1fSpanish\x1fVerbs");
        assert_eq!(name.human_string(), "Languages::Spanish::Verbs");
        assert_eq!(name.to_string(), "Languages::Spanish::Verbs");
        assert_eq!(
            name.components().collect::<Vec<_>>(),
            vec!["Languages", "Spanish", "Verbs"]
        );
    }

    #[test]
    fn parent_and_ancestors() {
        let name = DeckName::join(["A", "B", "C"]);
        assert_eq!(name.parent(), Some(DeckName::join(["A", "B"])));
        assert_eq!(DeckName::from_human("Top").parent(), None);
        assert_eq!(
            name.ancestors().collect::<Vec<_>>(),
            vec![DeckName::join(["A", "B"]), DeckName::from_native("A")]
        );
    }

    #[test]
    fn empty_components_are_invalid() {
        assert!(DeckName::from_human("A::B").validate().is_ok());
        assert!(matches!(
            DeckName::from_human("A::::B").validate(),
            Err(CoreError::InvalidDeckName(ref n)) if n == "A::::B"
        ));
        assert!(DeckName::default().validate().is_err());
    }

    #[test]
    fn new_deck_uses_default_options() {
        let deck = Deck::new(DeckName::from_human("Default"));
        assert_eq!(deck.config_id(), Some(DEFAULT_DECK_CONFIG_ID));
        assert!(!deck.is_filtered());

        let filtered = Deck {
            kind: DeckKind::Filtered {
                search: "is:due".to_string(),
                reschedule: true,
            },
            ..deck
        };
        assert_eq!(filtered.config_id(), None);
    }

    #[test]
    fn default_options() {
        let options = DeckOptions::default();
        assert_eq!(options.new_per_day, 20);
        assert_eq!(options.reviews_per_day, 200);
        assert_eq!(options.initial_ease, 2.5);
        assert_eq!(options.maximum_review_interval, 36_500);
        assert_eq!(options.leech_threshold, 8);
        assert!(options.wait_for_audio);
    }

    #[test]
    fn options_fill_missing_keys_with_defaults() {
        let options: DeckOptions = serde_json::from_str(r#"{"new_per_day": 5}"#).unwrap();
        assert_eq!(options.new_per_day, 5);
        assert_eq!(options.reviews_per_day, 200);
    }
}
