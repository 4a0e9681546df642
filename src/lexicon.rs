//! Lexicon document model
//!
//! The lexicon is a single JSON document describing a schema taxonomy:
//! classes with properties and relationships, tags grouping classes, and
//! optional data groups. It is loaded once at startup and read-only
//! afterwards; every consumer takes a reference instead of reaching for a
//! module-level singleton.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The top-level lexicon document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    /// All class definitions
    #[serde(default)]
    pub classes: Vec<LexiconClass>,
    /// Tags grouping classes (e.g., "blockchain" marks publishable classes)
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Optional data groups (searched like classes, no relationships)
    #[serde(default)]
    pub data_groups: Vec<DataGroup>,
}

impl Lexicon {
    /// Load a lexicon document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Look up a class by its unique type key
    pub fn get_class(&self, type_name: &str) -> Option<&LexiconClass> {
        self.classes.iter().find(|c| c.type_name == type_name)
    }

    /// Look up a tag by name
    pub fn get_tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// All non-deprecated classes carrying the given tag, in tag order
    pub fn tagged_classes(&self, tag_name: &str) -> Vec<&LexiconClass> {
        let Some(tag) = self.get_tag(tag_name) else {
            return Vec::new();
        };
        tag.classes
            .iter()
            .filter_map(|name| self.get_class(name))
            .filter(|c| !c.is_deprecated)
            .collect()
    }
}

/// A named tag grouping classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// Deprecation marker for a property: either a plain flag or a list of
/// deprecated enum values (the property itself stays live in the latter case
/// for search, but generation treats any marker as full deprecation)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeprecatedMarker {
    Flag(bool),
    EnumValues(Vec<String>),
}

impl DeprecatedMarker {
    /// Whether the whole property is deprecated (a `false` flag is a no-op)
    pub fn deprecates_property(&self) -> bool {
        match self {
            DeprecatedMarker::Flag(flag) => *flag,
            DeprecatedMarker::EnumValues(_) => true,
        }
    }
}

/// A single class definition in the lexicon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconClass {
    /// Unique type key (e.g., "person", "company")
    #[serde(rename = "type")]
    pub type_name: String,
    /// Display container this class belongs to
    #[serde(default)]
    pub container_name: String,
    /// Deprecated classes are excluded from generation
    #[serde(default)]
    pub is_deprecated: bool,
    /// Optional description, becomes the schema `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Property definitions, keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, LexiconProperty>,
    /// Deprecation markers for properties
    #[serde(default)]
    pub deprecated_properties: BTreeMap<String, DeprecatedMarker>,
    /// Relationship definitions, keyed by relationship name
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
    /// Deprecation flags for relationships
    #[serde(default)]
    pub deprecated_relationships: BTreeMap<String, bool>,
    /// Example instances, validated against the generated schema
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<serde_json::Value>,
}

impl LexiconClass {
    /// Whether a property is excluded by a deprecation marker
    pub fn is_property_deprecated(&self, name: &str) -> bool {
        self.deprecated_properties
            .get(name)
            .map(DeprecatedMarker::deprecates_property)
            .unwrap_or(false)
    }

    /// Whether a relationship is flagged deprecated
    pub fn is_relationship_deprecated(&self, name: &str) -> bool {
        self.deprecated_relationships
            .get(name)
            .copied()
            .unwrap_or(false)
    }

    /// Non-deprecated properties, in key order
    pub fn active_properties(&self) -> impl Iterator<Item = (&String, &LexiconProperty)> + '_ {
        self.properties
            .iter()
            .filter(|(name, _)| !self.is_property_deprecated(name))
    }

    /// Non-deprecated relationships, in key order
    pub fn active_relationships(&self) -> impl Iterator<Item = (&String, &Relationship)> + '_ {
        self.relationships
            .iter()
            .filter(|(name, _)| !self.is_relationship_deprecated(name))
    }
}

/// A relationship from one class to one or more target classes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    /// Target class type keys
    #[serde(default)]
    pub targets: Vec<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A data group: a slim class-like record without relationships
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataGroup {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, LexiconProperty>,
    #[serde(default)]
    pub deprecated_properties: BTreeMap<String, DeprecatedMarker>,
}

impl DataGroup {
    /// Whether a property is excluded by a deprecation marker
    pub fn is_property_deprecated(&self, name: &str) -> bool {
        self.deprecated_properties
            .get(name)
            .map(DeprecatedMarker::deprecates_property)
            .unwrap_or(false)
    }

    /// Non-deprecated properties, in key order
    pub fn active_properties(&self) -> impl Iterator<Item = (&String, &LexiconProperty)> + '_ {
        self.properties
            .iter()
            .filter(|(name, _)| !self.is_property_deprecated(name))
    }
}

/// The `type` facet of a property: a single kind or a union of kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeField {
    One(String),
    Many(Vec<String>),
}

impl TypeField {
    /// All declared kinds, in order
    pub fn kinds(&self) -> Vec<&str> {
        match self {
            TypeField::One(kind) => vec![kind.as_str()],
            TypeField::Many(kinds) => kinds.iter().map(String::as_str).collect(),
        }
    }
}

/// A property definition. Recursive: object properties nest through
/// `properties`, arrays through `items`, unions through `oneOf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconProperty {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_field: Option<TypeField>,
    /// Enum values; `null` entries mark nullable enums
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, LexiconProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<LexiconProperty>>,
    #[serde(
        default,
        rename = "patternProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern_properties: Option<BTreeMap<String, LexiconProperty>>,
    #[serde(default, rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<LexiconProperty>>,
}

/// Scalar kinds the generator knows how to map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    /// Unknown source type, mapped like a string
    Other,
}

impl ScalarKind {
    /// Classify a raw `type` string from the lexicon
    pub fn from_source(kind: &str) -> Self {
        match kind {
            "string" => ScalarKind::String,
            "integer" => ScalarKind::Integer,
            "decimal" | "number" => ScalarKind::Number,
            "boolean" => ScalarKind::Boolean,
            "date" => ScalarKind::Date,
            "datetime" => ScalarKind::DateTime,
            _ => ScalarKind::Other,
        }
    }
}

/// Structural view of a property, used for exhaustive recursion in the
/// generator. Structure facets win over the declared `type` string.
#[derive(Debug)]
pub enum PropertyShape<'a> {
    Scalar(ScalarKind),
    ObjectOf(&'a BTreeMap<String, LexiconProperty>),
    ArrayOf(&'a LexiconProperty),
    OneOf(&'a [LexiconProperty]),
}

fn empty_properties() -> &'static BTreeMap<String, LexiconProperty> {
    static EMPTY: OnceLock<BTreeMap<String, LexiconProperty>> = OnceLock::new();
    EMPTY.get_or_init(BTreeMap::new)
}

impl LexiconProperty {
    /// Derive the structural shape of this property
    pub fn shape(&self) -> PropertyShape<'_> {
        if let Some(variants) = &self.one_of {
            return PropertyShape::OneOf(variants);
        }
        // patternProperties alone still makes this an object
        if self.properties.is_some() || self.pattern_properties.is_some() {
            let props = self
                .properties
                .as_ref()
                .unwrap_or_else(|| empty_properties());
            return PropertyShape::ObjectOf(props);
        }
        if let Some(items) = &self.items {
            return PropertyShape::ArrayOf(items);
        }
        let kind = match &self.type_field {
            Some(field) => ScalarKind::from_source(field.kinds().first().copied().unwrap_or("")),
            None => ScalarKind::Other,
        };
        PropertyShape::Scalar(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_accepts_string_or_list() {
        let one: LexiconProperty = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert_eq!(one.type_field.as_ref().unwrap().kinds(), vec!["string"]);

        let many: LexiconProperty =
            serde_json::from_str(r#"{"type": ["string", "null"]}"#).unwrap();
        assert_eq!(
            many.type_field.as_ref().unwrap().kinds(),
            vec!["string", "null"]
        );
    }

    #[test]
    fn test_deprecated_marker_variants() {
        let class: LexiconClass = serde_json::from_str(
            r#"{
                "type": "person",
                "deprecated_properties": {
                    "ssn": true,
                    "status": ["archived", "purged"],
                    "nickname": false
                }
            }"#,
        )
        .unwrap();

        assert!(class.is_property_deprecated("ssn"));
        assert!(class.is_property_deprecated("status"));
        assert!(!class.is_property_deprecated("nickname"));
        assert!(!class.is_property_deprecated("name"));
    }

    #[test]
    fn test_missing_optional_maps_default_empty() {
        let class: LexiconClass = serde_json::from_str(r#"{"type": "bare"}"#).unwrap();
        assert!(class.properties.is_empty());
        assert!(class.relationships.is_empty());
        assert!(class.examples.is_empty());
    }

    #[test]
    fn test_shape_prefers_structure_over_type() {
        let prop: LexiconProperty = serde_json::from_str(
            r#"{"type": "object", "properties": {"inner": {"type": "string"}}}"#,
        )
        .unwrap();
        assert!(matches!(prop.shape(), PropertyShape::ObjectOf(_)));

        let arr: LexiconProperty =
            serde_json::from_str(r#"{"type": "array", "items": {"type": "integer"}}"#).unwrap();
        assert!(matches!(arr.shape(), PropertyShape::ArrayOf(_)));
    }

    #[test]
    fn test_pattern_properties_alone_is_an_object() {
        let prop: LexiconProperty = serde_json::from_str(
            r#"{"type": "object", "patternProperties": {"^[a-z]+$": {"type": "integer"}}}"#,
        )
        .unwrap();
        match prop.shape() {
            PropertyShape::ObjectOf(props) => assert!(props.is_empty()),
            other => panic!("expected ObjectOf, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_classes_skips_deprecated_and_unknown() {
        let lexicon: Lexicon = serde_json::from_str(
            r#"{
                "classes": [
                    {"type": "person"},
                    {"type": "relic", "is_deprecated": true}
                ],
                "tags": [
                    {"name": "blockchain", "classes": ["person", "relic", "ghost"]}
                ]
            }"#,
        )
        .unwrap();

        let tagged = lexicon.tagged_classes("blockchain");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].type_name, "person");
        assert!(lexicon.tagged_classes("missing").is_empty());
    }
}
