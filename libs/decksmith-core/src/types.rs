//! Core types for notes, notetypes and cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CoreError;

/// Update sequence number marking a row as modified locally and not yet synced.
pub const USN_PENDING: i64 = -1;

/// Which card generation strategy a notetype uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotetypeKind {
    #[default]
    Normal,
    Cloze,
}

impl NotetypeKind {
    /// Integer code used in persisted configuration.
    pub fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Cloze => 1,
        }
    }
}

impl TryFrom<i32> for NotetypeKind {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Cloze),
            other => Err(CoreError::UnsupportedNotetypeKind(other)),
        }
    }
}

/// Notetype-wide configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotetypeConfig {
    pub kind: NotetypeKind,
    /// Field used for sorting and duplicate checks. 0 means the first field.
    pub sort_field_idx: u32,
    pub css: String,
}

impl NotetypeConfig {
    pub fn new(kind: NotetypeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

/// Editor configuration of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub sticky: bool,
    pub rtl: bool,
    pub plain_text: bool,
    pub font_name: String,
    pub font_size: u32,
    pub description: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            sticky: false,
            rtl: false,
            plain_text: false,
            font_name: "Arial".to_string(),
            font_size: 20,
            description: String::new(),
        }
    }
}

/// A named field slot of a notetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Position the field had when the notetype was last saved.
    /// `None` for a field that has not been saved yet.
    pub ordinal: Option<u32>,
    pub name: String,
    pub config: FieldConfig,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ordinal: None,
            name: name.into(),
            config: FieldConfig::default(),
        }
    }
}

/// Question/answer formats of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub q_format: String,
    pub a_format: String,
    /// Deck that cards of this template go to instead of the note's deck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_deck_id: Option<i64>,
}

/// A card template of a notetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Position the template had when the notetype was last saved.
    /// `None` for a template that has not been saved yet.
    pub ordinal: Option<u32>,
    pub name: String,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub config: TemplateConfig,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        q_format: impl Into<String>,
        a_format: impl Into<String>,
    ) -> Self {
        Self {
            ordinal: None,
            name: name.into(),
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: 0,
            config: TemplateConfig {
                q_format: q_format.into(),
                a_format: a_format.into(),
                target_deck_id: None,
            },
        }
    }

    /// Send cards of this template to `deck_id`.
    pub fn with_target_deck(mut self, deck_id: i64) -> Self {
        self.config.target_deck_id = Some(deck_id);
        self
    }
}

/// The schema of a note: its fields, templates and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notetype {
    pub id: i64,
    pub name: String,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub fields: Vec<Field>,
    pub templates: Vec<Template>,
    pub config: NotetypeConfig,
}

impl Notetype {
    pub fn new(name: impl Into<String>, kind: NotetypeKind) -> Self {
        Self {
            id: 0,
            name: name.into(),
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: 0,
            fields: Vec::new(),
            templates: Vec::new(),
            config: NotetypeConfig::new(kind),
        }
    }

    pub fn kind(&self) -> NotetypeKind {
        self.config.kind
    }

    pub fn add_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.push(Field::new(name));
        self
    }

    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        q_format: impl Into<String>,
        a_format: impl Into<String>,
    ) -> &mut Self {
        self.templates.push(Template::new(name, q_format, a_format));
        self
    }

    /// Map from field name to its position in the field list.
    pub fn field_ordinals(&self) -> HashMap<String, u32> {
        self.fields
            .iter()
            .enumerate()
            .map(|(ord, field)| (field.name.clone(), ord as u32))
            .collect()
    }

    /// Stamp every field and template with its position.
    pub fn assign_ordinals(&mut self) {
        for (ord, field) in self.fields.iter_mut().enumerate() {
            field.ordinal = Some(ord as u32);
        }
        for (ord, template) in self.templates.iter_mut().enumerate() {
            template.ordinal = Some(ord as u32);
        }
    }
}

/// A user-authored record of field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub guid: String,
    pub notetype_id: i64,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub tags: Vec<String>,
    pub fields: Vec<String>,
    pub checksum: u32,
    pub flags: i64,
    pub data: String,
}

impl Note {
    /// Unsaved note; id and guid are assigned when it is added.
    pub fn new(notetype_id: i64, fields: Vec<String>) -> Self {
        Self {
            id: 0,
            guid: String::new(),
            notetype_id,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: 0,
            tags: Vec::new(),
            fields,
            checksum: 0,
            flags: 0,
            data: String::new(),
        }
    }
}

/// Learning stage of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    New,
    Learn,
    Review,
    Relearn,
}

impl CardType {
    pub fn code(self) -> i64 {
        match self {
            Self::New => 0,
            Self::Learn => 1,
            Self::Review => 2,
            Self::Relearn => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::New),
            1 => Some(Self::Learn),
            2 => Some(Self::Review),
            3 => Some(Self::Relearn),
            _ => None,
        }
    }
}

/// Queue a card is currently scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardQueue {
    UserBuried,
    SchedBuried,
    Suspended,
    New,
    Learn,
    Review,
    DayLearn,
    PreviewRepeat,
}

impl CardQueue {
    pub fn code(self) -> i64 {
        match self {
            Self::UserBuried => -3,
            Self::SchedBuried => -2,
            Self::Suspended => -1,
            Self::New => 0,
            Self::Learn => 1,
            Self::Review => 2,
            Self::DayLearn => 3,
            Self::PreviewRepeat => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -3 => Some(Self::UserBuried),
            -2 => Some(Self::SchedBuried),
            -1 => Some(Self::Suspended),
            0 => Some(Self::New),
            1 => Some(Self::Learn),
            2 => Some(Self::Review),
            3 => Some(Self::DayLearn),
            4 => Some(Self::PreviewRepeat),
            _ => None,
        }
    }
}

/// A schedulable unit generated from a (note, ordinal) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub note_id: i64,
    pub deck_id: i64,
    /// Template ordinal, or cloze number minus one.
    pub ordinal: u32,
    pub modified: DateTime<Utc>,
    pub usn: i64,
    pub card_type: CardType,
    pub queue: CardQueue,
    pub due: i64,
    pub interval: i64,
    pub factor: i64,
    pub repetitions: i64,
    pub lapses: i64,
    pub left: i64,
    pub original_due: i64,
    pub original_deck_id: i64,
    pub flags: i64,
    pub data: String,
}

impl Card {
    /// A new, unstudied card that has not been synced.
    pub fn new(note_id: i64, deck_id: i64, ordinal: u32) -> Self {
        Self {
            id: 0,
            note_id,
            deck_id,
            ordinal,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            usn: USN_PENDING,
            card_type: CardType::New,
            queue: CardQueue::New,
            due: 0,
            interval: 0,
            factor: 0,
            repetitions: 0,
            lapses: 0,
            left: 0,
            original_due: 0,
            original_deck_id: 0,
            flags: 0,
            data: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notetype_kind_codes() {
        assert_eq!(NotetypeKind::try_from(0).unwrap(), NotetypeKind::Normal);
        assert_eq!(NotetypeKind::try_from(1).unwrap(), NotetypeKind::Cloze);
        assert!(matches!(
            NotetypeKind::try_from(2),
            Err(CoreError::UnsupportedNotetypeKind(2))
        ));
    }

    #[test]
    fn notetype_kind_defaults_to_normal() {
        assert_eq!(NotetypeKind::default(), NotetypeKind::Normal);
        assert_eq!(NotetypeConfig::default().kind, NotetypeKind::Normal);
    }

    #[test]
    fn field_ordinals_follow_positions() {
        let mut notetype = Notetype::new("Basic", NotetypeKind::Normal);
        notetype.add_field("Front").add_field("Back");
        let ords = notetype.field_ordinals();
        assert_eq!(ords["Front"], 0);
        assert_eq!(ords["Back"], 1);
    }

    #[test]
    fn assign_ordinals_stamps_positions() {
        let mut notetype = Notetype::new("Basic", NotetypeKind::Normal);
        notetype
            .add_field("Front")
            .add_field("Back")
            .add_template("Card 1", "{{Front}}", "{{Back}}");
        assert_eq!(notetype.fields[1].ordinal, None);

        notetype.assign_ordinals();
        assert_eq!(notetype.fields[0].ordinal, Some(0));
        assert_eq!(notetype.fields[1].ordinal, Some(1));
        assert_eq!(notetype.templates[0].ordinal, Some(0));
    }

    #[test]
    fn new_card_has_no_progress() {
        let card = Card::new(10, 1, 2);
        assert_eq!(card.card_type, CardType::New);
        assert_eq!(card.queue, CardQueue::New);
        assert_eq!(card.usn, USN_PENDING);
        assert_eq!(card.due, 0);
        assert_eq!(card.repetitions, 0);
    }

    #[test]
    fn queue_codes_round_trip_through_lookup() {
        assert_eq!(CardQueue::from_code(-1), Some(CardQueue::Suspended));
        assert_eq!(CardQueue::from_code(9), None);
        assert_eq!(CardType::from_code(2), Some(CardType::Review));
    }
}
