//! Error types
//!
//! Every fallible operation in docembed returns [`EmbedResult`]. Failures are
//! never recovered locally: they propagate to the caller, which for the CLI
//! means a non-zero exit.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for docembed operations
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Main error type for docembed
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The source document is missing or unreadable
    #[error("failed to read source {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document is not valid UTF-8
    #[error("source {} is not valid UTF-8 (first invalid byte at offset {valid_up_to})", path.display())]
    InvalidUtf8 { path: PathBuf, valid_up_to: usize },

    /// The artifact could not be written
    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing artifact could not be read (check mode)
    #[error("failed to read artifact {}: {source}", path.display())]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`EmbedConfig`](crate::EmbedConfig)
    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An artifact does not have the generated layout
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    /// A string literal could not be encoded or decoded
    #[error("string literal error: {0}")]
    Literal(#[from] serde_json::Error),
}

impl EmbedError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EmbedError::Config(message.into())
    }

    /// Create a malformed-artifact error
    pub fn malformed(message: impl Into<String>) -> Self {
        EmbedError::MalformedArtifact(message.into())
    }
}
