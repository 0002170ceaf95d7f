use std::path::PathBuf;

use thiserror::Error;

/// Errors from the document source.
///
/// Surfaced unchanged to the run; extraction failures are never retried at
/// this layer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source collection not found: {path}")]
    NotFound { path: PathBuf },
    #[error("error reading source collection {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in source collection {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("source collection {path} is not a JSON array of documents")]
    NotACollection { path: PathBuf },
    #[error("source documents are missing required field(s): {fields:?}")]
    MissingFields { fields: Vec<String> },
}
