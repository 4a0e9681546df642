//! Error types for the lexicon toolchain

use thiserror::Error;

/// Result type for lexicon operations
pub type Result<T> = std::result::Result<T, LexiconError>;

/// Lexicon toolchain errors
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Class in container '{container}' has no type identifier")]
    UnnamedClass { container: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Generated schema for '{class}' is not a valid draft-07 schema: {detail}")]
    InvalidSchema { class: String, detail: String },

    #[error("Lexicon document is not an object")]
    MalformedDocument,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
