//! Schema artifact writing and the publish manifest
//!
//! The build step generates one canonical schema file per tagged,
//! non-deprecated class, plus `schema-manifest.json` mapping class name to
//! its publish target and a `checksums.sha256` sidecar for integrity
//! verification. The pinning service itself stays behind the
//! [`SchemaPublisher`] trait; this crate ships the local filesystem
//! publisher only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::{to_canonical_json, Checksum};
use crate::error::{LexiconError, Result};
use crate::generator::generate_schema_for_class;
use crate::lexicon::Lexicon;

/// Manifest file name, written next to the schema artifacts
pub const MANIFEST_FILE: &str = "schema-manifest.json";

/// Checksums sidecar file name
pub const CHECKSUMS_FILE: &str = "checksums.sha256";

/// Where a published schema lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishTarget {
    /// Pinned to IPFS; the CID addresses the canonical bytes
    #[serde(rename = "ipfsCid")]
    IpfsCid(String),
    /// Local file path, used when no pinning credential is configured
    #[serde(rename = "path")]
    LocalPath(String),
}

/// Manifest mapping class name to its publish target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaManifest {
    pub entries: BTreeMap<String, PublishTarget>,
}

impl SchemaManifest {
    pub fn get(&self, class_name: &str) -> Option<&PublishTarget> {
        self.entries.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Destination for canonical schema bytes.
///
/// An IPFS pinning implementation lives outside this crate; it would return
/// [`PublishTarget::IpfsCid`] and own its own retry policy.
pub trait SchemaPublisher {
    fn publish(&mut self, class_name: &str, canonical: &str) -> Result<PublishTarget>;
}

/// Writes `<type>.json` files under an output directory
pub struct LocalPublisher {
    out_dir: PathBuf,
}

impl LocalPublisher {
    pub fn new(out_dir: impl AsRef<Path>) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }
}

impl SchemaPublisher for LocalPublisher {
    fn publish(&mut self, class_name: &str, canonical: &str) -> Result<PublishTarget> {
        let file_name = format!("{}.json", class_name);
        let path = self.out_dir.join(&file_name);
        fs::write(&path, canonical)?;
        debug!(class = class_name, path = %path.display(), "wrote schema artifact");
        Ok(PublishTarget::LocalPath(file_name))
    }
}

/// Generate and publish schemas for every non-deprecated class carrying
/// `tag_name`, then write the manifest and checksums sidecar to `out_dir`.
pub fn write_schema_artifacts(
    lexicon: &Lexicon,
    tag_name: &str,
    out_dir: impl AsRef<Path>,
    publisher: &mut dyn SchemaPublisher,
) -> Result<SchemaManifest> {
    let out_dir = out_dir.as_ref();
    if lexicon.get_tag(tag_name).is_none() {
        return Err(LexiconError::TagNotFound(tag_name.to_string()));
    }
    fs::create_dir_all(out_dir)?;

    let mut manifest = SchemaManifest::default();
    let mut checksums: Vec<(Checksum, String)> = Vec::new();

    for class in lexicon.tagged_classes(tag_name) {
        let schema = generate_schema_for_class(class)?;
        let canonical = to_canonical_json(&schema);
        let target = publisher.publish(&class.type_name, &canonical)?;
        checksums.push((
            Checksum::from_content(&canonical),
            format!("{}.json", class.type_name),
        ));
        manifest.entries.insert(class.type_name.clone(), target);
    }

    let manifest_value = serde_json::to_value(&manifest)?;
    fs::write(out_dir.join(MANIFEST_FILE), to_canonical_json(&manifest_value))?;

    let checksums_content: String = checksums
        .iter()
        .map(|(checksum, file)| format!("{}  {}", checksum, file))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(out_dir.join(CHECKSUMS_FILE), checksums_content)?;

    info!(
        tag = tag_name,
        schemas = manifest.len(),
        out = %out_dir.display(),
        "schema artifacts written"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lexicon() -> Lexicon {
        serde_json::from_str(
            r#"{
                "classes": [
                    {
                        "type": "company",
                        "properties": {"name": {"type": "string"}}
                    },
                    {
                        "type": "relic",
                        "is_deprecated": true,
                        "properties": {"name": {"type": "string"}}
                    },
                    {
                        "type": "untagged",
                        "properties": {"name": {"type": "string"}}
                    }
                ],
                "tags": [
                    {"name": "blockchain", "classes": ["company", "relic"]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_writes_only_tagged_non_deprecated_classes() {
        let dir = tempdir().unwrap();
        let mut publisher = LocalPublisher::new(dir.path()).unwrap();
        let manifest =
            write_schema_artifacts(&lexicon(), "blockchain", dir.path(), &mut publisher).unwrap();

        assert_eq!(manifest.len(), 1);
        assert!(dir.path().join("company.json").exists());
        assert!(!dir.path().join("relic.json").exists());
        assert!(!dir.path().join("untagged.json").exists());
        assert_eq!(
            manifest.get("company"),
            Some(&PublishTarget::LocalPath("company.json".to_string()))
        );
    }

    #[test]
    fn test_manifest_and_checksums_files_written() {
        let dir = tempdir().unwrap();
        let mut publisher = LocalPublisher::new(dir.path()).unwrap();
        write_schema_artifacts(&lexicon(), "blockchain", dir.path(), &mut publisher).unwrap();

        let manifest_content = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let parsed: SchemaManifest = serde_json::from_str(&manifest_content).unwrap();
        assert_eq!(parsed.len(), 1);

        let schema_content = fs::read_to_string(dir.path().join("company.json")).unwrap();
        let checksums = fs::read_to_string(dir.path().join(CHECKSUMS_FILE)).unwrap();
        let expected = Checksum::from_content(&schema_content);
        assert_eq!(
            checksums,
            format!("{}  company.json", expected)
        );
    }

    #[test]
    fn test_artifacts_are_stable_across_runs() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        let lex = lexicon();

        let mut pub_a = LocalPublisher::new(dir_a.path()).unwrap();
        let mut pub_b = LocalPublisher::new(dir_b.path()).unwrap();
        write_schema_artifacts(&lex, "blockchain", dir_a.path(), &mut pub_a).unwrap();
        write_schema_artifacts(&lex, "blockchain", dir_b.path(), &mut pub_b).unwrap();

        let a = fs::read(dir_a.path().join("company.json")).unwrap();
        let b = fs::read(dir_b.path().join("company.json")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let dir = tempdir().unwrap();
        let mut publisher = LocalPublisher::new(dir.path()).unwrap();
        let result = write_schema_artifacts(&lexicon(), "missing", dir.path(), &mut publisher);
        assert!(result.is_err());
    }

    #[test]
    fn test_manifest_serializes_to_expected_shape() {
        let mut manifest = SchemaManifest::default();
        manifest.entries.insert(
            "company".to_string(),
            PublishTarget::IpfsCid("bafyexample".to_string()),
        );
        manifest.entries.insert(
            "person".to_string(),
            PublishTarget::LocalPath("person.json".to_string()),
        );

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["company"]["ipfsCid"], "bafyexample");
        assert_eq!(value["person"]["path"], "person.json");
    }
}
