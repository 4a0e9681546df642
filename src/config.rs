//! Configuration for the lexicon toolchain
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (lexicon.toml)
//! - Environment variables (LEXICON_*)
//!
//! ## Example config file (lexicon.toml):
//! ```toml
//! [generator]
//! lexicon_path = "./lexicon.json"
//! output_dir = "./schemas"
//! tag = "blockchain"
//! output_format = "canonical"
//! validate_examples = true
//!
//! [search]
//! limit = 20
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the lexicon toolchain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Search CLI settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Path to the lexicon document
    #[serde(default = "default_lexicon_path")]
    pub lexicon_path: PathBuf,

    /// Directory schema artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Tag selecting the classes to publish
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Output format for schema files
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Validate class examples against generated schemas
    #[serde(default = "default_true")]
    pub validate_examples: bool,
}

/// Output format for schema files. Published artifacts must be canonical;
/// pretty output is for local inspection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Canonical,
    Pretty,
}

/// Search CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results to print
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_lexicon_path() -> PathBuf {
    PathBuf::from("lexicon.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_tag() -> String {
    "blockchain".to_string()
}

fn default_true() -> bool {
    true
}

fn default_search_limit() -> usize {
    20
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lexicon_path: default_lexicon_path(),
            output_dir: default_output_dir(),
            tag: default_tag(),
            output_format: OutputFormat::Canonical,
            validate_examples: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

impl LexiconConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["lexicon.toml", ".lexicon.toml", "config/lexicon.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "lexicon", "schemas") {
            let xdg_config = config_dir.config_dir().join("lexicon.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("LEXICON")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LexiconConfig::default();
        assert_eq!(config.generator.tag, "blockchain");
        assert_eq!(config.generator.output_format, OutputFormat::Canonical);
        assert!(config.generator.validate_examples);
        assert_eq!(config.search.limit, 20);
    }

    #[test]
    fn test_serialize_config() {
        let config = LexiconConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("[search]"));
    }
}
