//! Error types for document operations

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JsonWrapError>;

#[derive(Error, Debug)]
pub enum JsonWrapError {
    #[error("Cannot create path {}: {source}", .path.display())]
    Initialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Top-level JSON value in {} is not an object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("Failed to encode JSON for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Value at key '{0}' is not an object")]
    TypeNotIndexable(String),
}

impl JsonWrapError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    pub fn is_type_not_indexable(&self) -> bool {
        matches!(self, Self::TypeNotIndexable(_))
    }
}
