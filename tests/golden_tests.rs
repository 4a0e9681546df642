//! Golden tests for schema generation and search
//!
//! The canonical bytes of generated schemas are the publishing contract:
//! they must match the stored fixtures exactly, across runs and
//! environments.

use std::fs;

use lexicon_schemas::{
    filter_for_search, generate_schema_for_class, to_canonical_json, validate_class_examples,
    write_schema_artifacts, Checksum, Lexicon, LocalPublisher, MatchKind, PublishTarget,
    SchemaManifest,
};
use serde_json::json;

fn fixture_lexicon() -> Lexicon {
    serde_json::from_str(include_str!("fixtures/lexicon.json")).unwrap()
}

// =============================================================================
// Golden-file generation
// =============================================================================

#[test]
fn test_company_schema_matches_golden() {
    let lexicon = fixture_lexicon();
    let class = lexicon.get_class("company").unwrap();
    let schema = generate_schema_for_class(class).unwrap();

    assert_eq!(
        to_canonical_json(&schema),
        include_str!("fixtures/company.schema.json")
    );
}

#[test]
fn test_deed_schema_matches_golden() {
    let lexicon = fixture_lexicon();
    let class = lexicon.get_class("deed").unwrap();
    let schema = generate_schema_for_class(class).unwrap();

    assert_eq!(
        to_canonical_json(&schema),
        include_str!("fixtures/deed.schema.json")
    );
}

#[test]
fn test_regeneration_is_byte_identical() {
    let lexicon = fixture_lexicon();
    for class in &lexicon.classes {
        let first = to_canonical_json(&generate_schema_for_class(class).unwrap());
        let second = to_canonical_json(&generate_schema_for_class(class).unwrap());
        assert_eq!(first, second, "class {}", class.type_name);
    }
}

// =============================================================================
// Conditional HTTP-request rules
// =============================================================================

#[test]
fn test_http_request_rule_shape() {
    let lexicon = fixture_lexicon();
    let class = lexicon.get_class("fact_sheet").unwrap();
    let schema = generate_schema_for_class(class).unwrap();

    let rules = schema["properties"]["source_http_request"]["allOf"]
        .as_array()
        .unwrap();
    assert_eq!(rules.len(), 5);

    let get_rules: Vec<_> = rules
        .iter()
        .filter(|r| r["if"]["properties"]["method"]["const"] == json!("GET"))
        .collect();
    assert_eq!(get_rules.len(), 1);
    assert_eq!(
        get_rules[0]["then"]["not"]["anyOf"].as_array().unwrap().len(),
        3
    );
}

// =============================================================================
// Build step: artifacts, manifest, checksums
// =============================================================================

#[test]
fn test_build_writes_expected_artifacts() {
    let lexicon = fixture_lexicon();
    let dir = tempfile::tempdir().unwrap();

    let mut publisher = LocalPublisher::new(dir.path()).unwrap();
    let manifest =
        write_schema_artifacts(&lexicon, "blockchain", dir.path(), &mut publisher).unwrap();

    // relic is tagged but deprecated
    assert_eq!(manifest.len(), 3);
    assert_eq!(
        manifest.get("company"),
        Some(&PublishTarget::LocalPath("company.json".to_string()))
    );
    assert!(manifest.get("relic").is_none());

    // artifact bytes equal the golden fixtures
    let company = fs::read_to_string(dir.path().join("company.json")).unwrap();
    assert_eq!(company, include_str!("fixtures/company.schema.json"));
    let deed = fs::read_to_string(dir.path().join("deed.json")).unwrap();
    assert_eq!(deed, include_str!("fixtures/deed.schema.json"));

    // manifest round-trips
    let manifest_content =
        fs::read_to_string(dir.path().join("schema-manifest.json")).unwrap();
    let reloaded: SchemaManifest = serde_json::from_str(&manifest_content).unwrap();
    assert_eq!(reloaded.len(), 3);

    // every checksum line verifies against the written file
    let checksums = fs::read_to_string(dir.path().join("checksums.sha256")).unwrap();
    let mut lines = 0;
    for line in checksums.lines() {
        let (hex, file) = line.split_once("  ").unwrap();
        let content = fs::read_to_string(dir.path().join(file)).unwrap();
        assert!(Checksum::from(hex.to_string()).verify(&content), "{}", file);
        lines += 1;
    }
    assert_eq!(lines, 3);
}

// =============================================================================
// Example validation
// =============================================================================

#[test]
fn test_fixture_examples_are_clean() {
    let lexicon = fixture_lexicon();
    for class in &lexicon.classes {
        if class.is_deprecated {
            continue;
        }
        let report = validate_class_examples(class).unwrap();
        assert!(report.is_clean(), "class {}", class.type_name);
    }
}

// =============================================================================
// Search over the fixture lexicon
// =============================================================================

#[test]
fn test_search_ranks_substring_first() {
    let lexicon = fixture_lexicon();
    let hits = filter_for_search(&lexicon.classes, "pers");

    assert!(!hits.is_empty());
    assert_eq!(hits[0].entity.type_name, "person");
    let class_match = hits[0]
        .matches
        .iter()
        .find(|m| m.kind == MatchKind::Class)
        .unwrap();
    assert_eq!(class_match.score, 1.0);
    assert_eq!(class_match.highlighted.as_deref(), Some("<mark>pers</mark>on"));
}

#[test]
fn test_search_finds_enum_values_and_relationships() {
    let lexicon = fixture_lexicon();

    let by_enum = filter_for_search(&lexicon.classes, "quitclaim");
    assert_eq!(by_enum.len(), 1);
    assert_eq!(by_enum[0].entity.type_name, "deed");
    assert!(by_enum[0].has_property_matches);

    let by_relationship = filter_for_search(&lexicon.classes, "employed");
    assert_eq!(by_relationship.len(), 1);
    assert_eq!(by_relationship[0].entity.type_name, "person");
    assert!(by_relationship[0].has_relationship_matches);
}

#[test]
fn test_search_gate_and_deprecated_exclusion() {
    let lexicon = fixture_lexicon();

    assert!(filter_for_search(&lexicon.classes, "pe").is_empty());
    // book_page only exists as a deprecated property of deed
    assert!(filter_for_search(&lexicon.classes, "book_page").is_empty());
}

#[test]
fn test_search_covers_data_groups() {
    let lexicon = fixture_lexicon();
    let hits = filter_for_search(&lexicon.data_groups, "street");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity.type_name, "address_group");
}
