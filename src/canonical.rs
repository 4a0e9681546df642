//! Canonical serialization and artifact checksums
//!
//! Published schemas are content-addressed, so the byte form matters: keys
//! sorted, no insignificant whitespace. `serde_json` with its default map
//! type already keeps object keys ordered, which makes the compact encoding
//! canonical; this module pins that contract down in one place.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Canonical byte form of a JSON value: sorted keys, compact separators.
///
/// Re-canonicalizing the output is a fixed point; golden files compare
/// against exactly this string.
pub fn to_canonical_json(value: &serde_json::Value) -> String {
    // Object keys are already sorted (BTreeMap-backed Map), so compact
    // serialization is the canonical form.
    serde_json::to_string(value).unwrap_or_default()
}

/// Human-readable form for local inspection; never the published form
pub fn to_pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// SHA256 checksum of an artifact's canonical bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    pub fn from_content(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Compute checksum from a JSON value's canonical form
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::from_content(&to_canonical_json(value))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        let computed = Self::from_content(content);
        self.0 == computed.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}
