//! Which fields a template needs in order to render.

use crate::cardgen::field_is_empty;
use crate::error::Result;
use crate::render::SentinelProbe;
use crate::template::TemplateEvaluator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fields whose presence decides whether a template renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ordinals", rename_all = "snake_case")]
pub enum FieldRequirements {
    /// The template never renders.
    None,
    /// Any one of these field ordinals is enough.
    Any(Vec<u32>),
    /// Every one of these field ordinals must be present.
    All(Vec<u32>),
}

impl FieldRequirements {
    /// Check a note's field values against the requirement.
    pub fn matches(&self, fields: &[String]) -> bool {
        let present = |ord: &u32| {
            fields
                .get(*ord as usize)
                .is_some_and(|text| !field_is_empty(text))
        };
        match self {
            Self::None => false,
            Self::Any(ords) => ords.iter().any(present),
            Self::All(ords) => ords.iter().all(present),
        }
    }
}

/// Work out the requirements of `template` over the notetype's fields.
///
/// A single sufficient field is preferred over a combination: if any field
/// renders the template on its own, the result is `Any` of those fields.
/// Otherwise all fields are set at once and each is dropped in turn; the ones
/// that cannot be dropped form the `All` set.
pub fn field_requirements(
    evaluator: &dyn TemplateEvaluator,
    template: &str,
    field_ordinals: &HashMap<String, u32>,
) -> Result<FieldRequirements> {
    let probe = SentinelProbe::new(evaluator, template);

    let mut fields: Vec<(&str, u32)> = field_ordinals
        .iter()
        .map(|(name, ord)| (name.as_str(), *ord))
        .collect();
    fields.sort_by_key(|(_, ord)| *ord);

    let mut any = Vec::new();
    for (name, ord) in &fields {
        if probe.renders(&[*name])? {
            any.push(*ord);
        }
    }
    if !any.is_empty() {
        return Ok(FieldRequirements::Any(any));
    }

    let all_names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    if all_names.is_empty() || !probe.renders(&all_names)? {
        return Ok(FieldRequirements::None);
    }

    let mut required = Vec::new();
    for (idx, (_, ord)) in fields.iter().enumerate() {
        let without: Vec<&str> = all_names
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != idx)
            .map(|(_, name)| *name)
            .collect();
        if !probe.renders(&without)? {
            required.push(*ord);
        }
    }

    if required.is_empty() {
        return Ok(FieldRequirements::None);
    }
    Ok(FieldRequirements::All(required))
}
