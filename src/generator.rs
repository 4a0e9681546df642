//! JSON Schema generation
//!
//! Translates one lexicon class into a draft-07 JSON Schema document. The
//! transform is a pure function of the class value: no clock, no globals, no
//! randomness, so identical input always canonicalizes to identical bytes.
//!
//! Policy decisions carried from the lexicon pipeline:
//! - deprecated properties are omitted from both `properties` and `required`
//! - every remaining property is required
//! - enums carry their values plus `null`
//! - a `source_http_request` property gets the five fixed conditional rules

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::{LexiconError, Result};
use crate::lexicon::{LexiconClass, LexiconProperty, PropertyShape, ScalarKind};

/// The draft the generated documents conform to
pub const SCHEMA_DRAFT: &str = "https://json-schema.org/draft-07/schema#";

/// Name of the property that triggers conditional HTTP-request rules
pub const HTTP_REQUEST_PROPERTY: &str = "source_http_request";

/// Generate the draft-07 schema document for one class.
///
/// A class without a type identifier is a hard error; downstream publishing
/// cannot recover from an unnamed schema. Absent optional structure is
/// handled by omission.
pub fn generate_schema_for_class(class: &LexiconClass) -> Result<Value> {
    if class.type_name.trim().is_empty() {
        return Err(LexiconError::UnnamedClass {
            container: class.container_name.clone(),
        });
    }

    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, prop) in class.active_properties() {
        let mut mapped = map_property_type(prop);
        if name == HTTP_REQUEST_PROPERTY {
            attach_http_request_rules(&mut mapped);
        }
        check_pattern(&class.type_name, name, prop);
        properties.insert(name.clone(), mapped);
        required.push(Value::String(name.clone()));
    }

    let mut schema = json!({
        "$schema": SCHEMA_DRAFT,
        "type": "object",
        "title": class.type_name,
        "properties": Value::Object(properties),
        "required": Value::Array(required),
        "additionalProperties": false,
    });

    if let Some(comment) = &class.comment {
        schema["description"] = Value::String(comment.clone());
    }

    Ok(schema)
}

/// Map one property definition to its schema fragment.
///
/// Structure facets recurse; scalars follow the fixed nullable mapping with
/// unknown source types falling back to string-or-null.
pub fn map_property_type(prop: &LexiconProperty) -> Value {
    match prop.shape() {
        PropertyShape::Scalar(kind) => map_scalar(kind, prop),
        PropertyShape::ObjectOf(props) => {
            let mut out = json!({"type": ["object", "null"]});
            if !props.is_empty() {
                let mut mapped = Map::new();
                for (name, inner) in props {
                    mapped.insert(name.clone(), map_property_type(inner));
                }
                out["properties"] = Value::Object(mapped);
            }
            if let Some(pattern_props) = &prop.pattern_properties {
                let mut mapped = Map::new();
                for (pattern, inner) in pattern_props {
                    mapped.insert(pattern.clone(), map_property_type(inner));
                }
                out["patternProperties"] = Value::Object(mapped);
            }
            with_comment(out, prop)
        }
        PropertyShape::ArrayOf(items) => with_comment(
            json!({
                "type": ["array", "null"],
                "items": map_property_type(items),
            }),
            prop,
        ),
        PropertyShape::OneOf(variants) => with_comment(
            json!({
                "oneOf": variants.iter().map(map_property_type).collect::<Vec<_>>(),
            }),
            prop,
        ),
    }
}

fn map_scalar(kind: ScalarKind, prop: &LexiconProperty) -> Value {
    let mut out = match kind {
        ScalarKind::String | ScalarKind::Other => json!({"type": ["string", "null"]}),
        ScalarKind::Integer => json!({"type": ["integer", "null"]}),
        ScalarKind::Number => json!({"type": ["number", "null"]}),
        ScalarKind::Boolean => json!({"type": ["boolean", "null"]}),
        ScalarKind::Date => json!({"type": ["string", "null"], "format": "date"}),
        ScalarKind::DateTime => json!({"type": ["string", "null"], "format": "date-time"}),
    };

    if let Some(values) = &prop.enum_values {
        let mut carried: Vec<Value> = values
            .iter()
            .map(|v| match v {
                Some(s) => Value::String(s.clone()),
                None => Value::Null,
            })
            .collect();
        if !carried.iter().any(Value::is_null) {
            carried.push(Value::Null);
        }
        out["enum"] = Value::Array(carried);
    }
    if let Some(pattern) = &prop.pattern {
        out["pattern"] = Value::String(pattern.clone());
    }
    // date/datetime formats are fixed by the kind; an explicit facet wins
    // only where the kind did not set one
    if let Some(format) = &prop.format {
        if out.get("format").is_none() {
            out["format"] = Value::String(format.clone());
        }
    }

    with_comment(out, prop)
}

fn with_comment(mut out: Value, prop: &LexiconProperty) -> Value {
    if let Some(comment) = &prop.comment {
        out["description"] = Value::String(comment.clone());
    }
    out
}

/// Surface unparseable `pattern` facets as warnings; the value is still
/// carried through so the published schema matches the source document.
fn check_pattern(class: &str, property: &str, prop: &LexiconProperty) {
    if let Some(pattern) = &prop.pattern {
        if let Err(err) = regex::Regex::new(pattern) {
            warn!(class, property, %err, "pattern facet does not compile");
        }
    }
}

/// Append the five fixed conditional-validation rules to an HTTP-request
/// property schema. Downstream consumers validate this shape structurally,
/// so the rule layout is load-bearing.
fn attach_http_request_rules(request_schema: &mut Value) {
    request_schema["allOf"] = Value::Array(vec![
        // 1. GET carries no payload or headers
        json!({
            "if": {
                "properties": {"method": {"const": "GET"}},
                "required": ["method"]
            },
            "then": {
                "not": {
                    "anyOf": [
                        {"required": ["body"]},
                        {"required": ["json"]},
                        {"required": ["headers"]}
                    ]
                }
            }
        }),
        // 2. mutating method + JSON content type: json required, body forbidden
        json!({
            "if": {
                "properties": {
                    "method": {"enum": ["POST", "PUT", "PATCH"]},
                    "headers": {
                        "properties": {"content-type": {"const": "application/json"}},
                        "required": ["content-type"]
                    }
                },
                "required": ["method", "headers"]
            },
            "then": {
                "required": ["json"],
                "not": {"required": ["body"]}
            }
        }),
        // 3. mutating method + non-JSON content type: body required, json forbidden
        json!({
            "if": {
                "properties": {
                    "method": {"enum": ["POST", "PUT", "PATCH"]},
                    "headers": {
                        "properties": {"content-type": {"not": {"const": "application/json"}}},
                        "required": ["content-type"]
                    }
                },
                "required": ["method", "headers"]
            },
            "then": {
                "required": ["body"],
                "not": {"required": ["json"]}
            }
        }),
        // 4. json present implies the JSON content type
        json!({
            "if": {"required": ["json"]},
            "then": {
                "properties": {
                    "headers": {
                        "properties": {"content-type": {"const": "application/json"}},
                        "required": ["content-type"]
                    }
                },
                "required": ["headers"]
            }
        }),
        // 5. body present implies a non-JSON content type
        json!({
            "if": {"required": ["body"]},
            "then": {
                "properties": {
                    "headers": {
                        "properties": {"content-type": {"not": {"const": "application/json"}}},
                        "required": ["content-type"]
                    }
                },
                "required": ["headers"]
            }
        }),
    ]);
}
