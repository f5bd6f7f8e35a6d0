//! Yes/no rendering questions answered by sentinel substitution.
//!
//! Every candidate field is filled with a hex SHA-256 digest of the template
//! source. If the digest shows up in the rendered output, the template
//! consumed at least one of those fields.

use crate::error::Result;
use crate::template::TemplateEvaluator;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Sentinel string derived from a template's source.
pub fn sentinel_for(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// A template paired with its sentinel, rendered with varying field sets.
pub struct SentinelProbe<'a> {
    evaluator: &'a dyn TemplateEvaluator,
    source: &'a str,
    sentinel: String,
}

impl<'a> SentinelProbe<'a> {
    pub fn new(evaluator: &'a dyn TemplateEvaluator, source: &'a str) -> Self {
        Self {
            evaluator,
            source,
            sentinel: sentinel_for(source),
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Render with exactly `field_names` set to the sentinel.
    pub fn renders(&self, field_names: &[&str]) -> Result<bool> {
        let values: HashMap<&str, &str> = field_names
            .iter()
            .map(|name| (*name, self.sentinel.as_str()))
            .collect();
        let output = self.evaluator.render(self.source, &values)?;
        Ok(output.contains(&self.sentinel))
    }
}

/// Whether `source` produces non-trivial output when `field_names` are present.
///
/// An empty template or an empty field list never renders. Template syntax
/// errors are returned rather than treated as "renders nothing".
pub fn renders_with_fields(
    evaluator: &dyn TemplateEvaluator,
    source: &str,
    field_names: &[&str],
) -> Result<bool> {
    if source.is_empty() || field_names.is_empty() {
        return Ok(false);
    }
    SentinelProbe::new(evaluator, source).renders(field_names)
}
