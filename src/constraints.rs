//! Minimum-constraint injection
//!
//! A one-off migration over the raw lexicon document: string properties get
//! `minLength: 1`, integer/number properties get `minimum: 0`, and array
//! properties get `minItems: 1`, wherever the facet is absent. It rewrites
//! the source document in place and is deliberately not part of the
//! generator; run it once via `lexicon-migrate` when a lexicon needs the
//! defaults.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{LexiconError, Result};

/// Counts of facets added by one injection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionStats {
    pub min_length: usize,
    pub minimum: usize,
    pub min_items: usize,
}

impl InjectionStats {
    pub fn total(&self) -> usize {
        self.min_length + self.minimum + self.min_items
    }
}

/// Inject minimum constraints into every property of every class (and data
/// group) in a raw lexicon document. Returns what was added.
pub fn inject_minimum_constraints(document: &mut Value) -> Result<InjectionStats> {
    let Some(root) = document.as_object_mut() else {
        return Err(LexiconError::MalformedDocument);
    };

    let mut stats = InjectionStats::default();
    for section in ["classes", "data_groups"] {
        if let Some(Value::Array(records)) = root.get_mut(section) {
            for record in records {
                if let Some(Value::Object(props)) = record.get_mut("properties") {
                    for prop in props.values_mut() {
                        inject_into_property(prop, &mut stats);
                    }
                }
            }
        }
    }
    Ok(stats)
}

/// Apply the migration to a lexicon file in place
pub fn migrate_file(path: impl AsRef<Path>) -> Result<InjectionStats> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut document: Value = serde_json::from_str(&content)?;

    let stats = inject_minimum_constraints(&mut document)?;
    fs::write(path, serde_json::to_string_pretty(&document)?)?;

    info!(
        path = %path.display(),
        added = stats.total(),
        "minimum constraints injected"
    );
    Ok(stats)
}

fn inject_into_property(prop: &mut Value, stats: &mut InjectionStats) {
    let Some(obj) = prop.as_object_mut() else {
        return;
    };

    let declared = obj.get("type").cloned();
    let kinds: Vec<String> = match declared {
        Some(Value::String(kind)) => vec![kind],
        Some(Value::Array(kinds)) => kinds
            .into_iter()
            .filter_map(|k| k.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    };

    for kind in &kinds {
        match kind.as_str() {
            "string" => {
                // enum-constrained strings already restrict their values
                if !obj.contains_key("minLength") && !obj.contains_key("enum") {
                    obj.insert("minLength".to_string(), Value::from(1));
                    stats.min_length += 1;
                }
            }
            "integer" | "number" | "decimal" => {
                if !obj.contains_key("minimum") {
                    obj.insert("minimum".to_string(), Value::from(0));
                    stats.minimum += 1;
                }
            }
            "array" => {
                if !obj.contains_key("minItems") {
                    obj.insert("minItems".to_string(), Value::from(1));
                    stats.min_items += 1;
                }
            }
            _ => {}
        }
    }

    // recurse through nested structure
    if let Some(Value::Object(nested)) = obj.get_mut("properties") {
        for inner in nested.values_mut() {
            inject_into_property(inner, stats);
        }
    }
    if let Some(items) = obj.get_mut("items") {
        inject_into_property(items, stats);
    }
    if let Some(Value::Array(variants)) = obj.get_mut("oneOf") {
        for variant in variants {
            inject_into_property(variant, stats);
        }
    }
}
