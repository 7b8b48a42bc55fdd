//! Error types for arena definition loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors during arena definition loading
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read arena file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse arena TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read arena directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arena definition in {path}: {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },
}
