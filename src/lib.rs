//! Lexicon Schemas
//!
//! A toolchain around a structured data lexicon (classes, properties,
//! relationships, tags): fuzzy search with per-entity ranking, and a
//! deterministic draft-07 JSON Schema generator feeding a content-addressed
//! publishing step.
//!
//! ## Features
//!
//! - **Fuzzy Search**: substring-first matching with highlights, Levenshtein
//!   fallback with a strict acceptance threshold
//! - **Deterministic Generation**: one schema per tagged class, canonical
//!   bytes, byte-identical across runs
//! - **Conditional HTTP Rules**: the fixed `allOf` rule set for
//!   `source_http_request` sub-objects
//! - **Example Validation**: class examples checked against their generated
//!   schema before publishing
//! - **Integrity**: SHA256 checksums for every written artifact
//!
//! ## Pipeline
//!
//! ```text
//! lexicon.json
//!     │  Lexicon::load
//!     ▼
//! generate_schema_for_class ──► canonical bytes ──► <type>.json
//!     │                                             schema-manifest.json
//!     ▼                                             checksums.sha256
//! validate_class_examples
//! ```

pub mod canonical;
pub mod config;
pub mod constraints;
pub mod error;
pub mod generator;
pub mod lexicon;
pub mod manifest;
pub mod search;
pub mod validate;

pub use canonical::{to_canonical_json, to_pretty_json, Checksum};
pub use config::LexiconConfig;
pub use error::{LexiconError, Result};
pub use generator::{generate_schema_for_class, map_property_type};
pub use lexicon::{DataGroup, Lexicon, LexiconClass, LexiconProperty, Relationship, Tag};
pub use manifest::{
    write_schema_artifacts, LocalPublisher, PublishTarget, SchemaManifest, SchemaPublisher,
};
pub use search::{filter_for_search, fuzzy_match, MatchKind, SearchHit, SearchMatch, Searchable};
pub use validate::{validate_class_examples, ValidationReport};
