//! Planning what a notetype edit does to existing notes and cards.
//!
//! The proposed notetype keeps each saved field and template's previous
//! `ordinal`; elements added during the edit have `ordinal: None`. Comparing
//! those ordinals with positions yields renames, removals, moves and additions.

use crate::error::{CoreError, Result};
use crate::types::{Notetype, Template};
use std::collections::{HashMap, HashSet};

/// Template slots affected by an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateChanges {
    /// New positions of templates that did not exist before.
    pub added: Vec<u32>,
    /// Previous ordinals whose template no longer exists.
    pub removed: Vec<u32>,
    /// Previous ordinal -> new ordinal for templates that changed position.
    pub moved: HashMap<u32, u32>,
}

impl TemplateChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}

/// Everything an edit from `previous` to `proposed` implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotetypeChanges {
    /// Previous field name -> new name, or empty string if removed.
    pub field_renames: HashMap<String, String>,
    /// Previous ordinal of each proposed field, by new position.
    pub field_ords: Vec<Option<u32>>,
    pub fields_reordered: bool,
    pub sort_field_changed: bool,
    pub templates: TemplateChanges,
    /// Some question format differs position by position.
    pub fronts_changed: bool,
}

impl NotetypeChanges {
    pub fn between(previous: &Notetype, proposed: &Notetype) -> Result<Self> {
        let field_ords: Vec<Option<u32>> = proposed.fields.iter().map(|f| f.ordinal).collect();
        validate_ordinals(&field_ords, previous.fields.len())?;

        let template_ords: Vec<Option<u32>> =
            proposed.templates.iter().map(|t| t.ordinal).collect();
        let templates = template_changes(&template_ords, previous.templates.len())?;

        Ok(Self {
            field_renames: renamed_and_removed_fields(previous, proposed),
            fields_reordered: fields_reordered(&field_ords, previous.fields.len()),
            field_ords,
            sort_field_changed: proposed.config.sort_field_idx != previous.config.sort_field_idx,
            templates,
            fronts_changed: !template_fronts_equal(&proposed.templates, &previous.templates),
        })
    }

    /// Existing notes must be rewritten.
    pub fn notes_need_update(&self) -> bool {
        self.fields_reordered || self.sort_field_changed
    }

    /// Existing notes must be scanned for newly required cards.
    pub fn needs_regeneration(&self) -> bool {
        !self.templates.added.is_empty() || self.fronts_changed
    }
}

/// Each previous ordinal may be claimed at most once and must have existed.
fn validate_ordinals(ords: &[Option<u32>], previous_len: usize) -> Result<()> {
    let mut seen = HashSet::new();
    for ord in ords.iter().flatten() {
        if *ord as usize >= previous_len {
            return Err(CoreError::InvalidOrdinal {
                ordinal: *ord,
                len: previous_len,
            });
        }
        if !seen.insert(*ord) {
            return Err(CoreError::DuplicateOrdinal(*ord));
        }
    }
    Ok(())
}

/// True if the number of fields changed or any kept field moved.
pub fn fields_reordered(ords: &[Option<u32>], previous_len: usize) -> bool {
    ords.len() != previous_len
        || ords
            .iter()
            .enumerate()
            .any(|(idx, ord)| *ord != Some(idx as u32))
}

/// Rearrange a note's values into the new field order; new fields are empty.
pub fn reorder_note_fields(fields: &[String], ords: &[Option<u32>]) -> Vec<String> {
    ords.iter()
        .map(|ord| {
            ord.and_then(|ord| fields.get(ord as usize))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

pub fn renamed_and_removed_fields(
    previous: &Notetype,
    proposed: &Notetype,
) -> HashMap<String, String> {
    let mut kept = HashSet::new();
    let mut changes = HashMap::new();

    for field in &proposed.fields {
        let Some(ord) = field.ordinal else {
            continue;
        };
        kept.insert(ord);
        if let Some(existing) = previous.fields.get(ord as usize) {
            if existing.name != field.name {
                changes.insert(existing.name.clone(), field.name.clone());
            }
        }
    }

    for (ord, field) in previous.fields.iter().enumerate() {
        if !kept.contains(&(ord as u32)) {
            changes.insert(field.name.clone(), String::new());
        }
    }

    changes
}

pub fn template_changes(ords: &[Option<u32>], previous_len: usize) -> Result<TemplateChanges> {
    validate_ordinals(ords, previous_len)?;

    let mut changes = TemplateChanges::default();
    let kept: HashSet<u32> = ords.iter().flatten().copied().collect();
    changes.removed = (0..previous_len as u32)
        .filter(|ord| !kept.contains(ord))
        .collect();

    for (idx, ord) in ords.iter().enumerate() {
        let idx = idx as u32;
        match ord {
            None => changes.added.push(idx),
            Some(ord) if *ord != idx => {
                changes.moved.insert(*ord, idx);
            }
            Some(_) => {}
        }
    }

    Ok(changes)
}

/// Compare question formats position by position.
pub fn template_fronts_equal(a: &[Template], b: &[Template]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(a, b)| a.config.q_format == b.config.q_format)
}
