//! Reading raw document collections.
//!
//! A collection is a JSON file holding an array of Mongo-export shaped
//! documents. Reading is a thin blocking wrapper; everything interesting
//! happens downstream in the transform stage.

use std::path::Path;

use serde_json::Value as Json;
use tracing::{debug, info};

use crate::error::SourceError;

/// Read one collection file into raw documents.
///
/// The file must contain a JSON array of objects. A missing file and
/// malformed JSON are distinct errors so the caller can surface them
/// unchanged.
pub fn read_documents(path: &Path) -> Result<Vec<Json>, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let parsed: Json = serde_json::from_str(&text).map_err(|source| SourceError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = match parsed {
        Json::Array(items) => items,
        // A single top-level object is treated as a one-document collection.
        other @ Json::Object(_) => vec![other],
        _ => {
            return Err(SourceError::NotACollection {
                path: path.to_path_buf(),
            });
        }
    };
    info!(path = %path.display(), documents = docs.len(), "collection read");
    Ok(docs)
}

/// Check that every required top-level field appears in at least one
/// document of the batch.
///
/// Mongo exports omit absent fields per document, so presence is judged
/// across the batch rather than per row; a field no document carries means
/// the source collection does not match its declared shape.
pub fn check_required_fields(docs: &[Json], fields: &[String]) -> Result<(), SourceError> {
    if fields.is_empty() {
        return Ok(());
    }
    let missing: Vec<String> = fields
        .iter()
        .filter(|field| {
            !docs
                .iter()
                .any(|doc| doc.as_object().is_some_and(|o| o.contains_key(*field)))
        })
        .cloned()
        .collect();
    if missing.is_empty() {
        debug!(fields = fields.len(), "required source fields present");
        Ok(())
    } else {
        Err(SourceError::MissingFields { fields: missing })
    }
}
