use thiserror::Error;

/// Errors from the transform stage.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A selected output column was absent from every flattened record.
    /// The select list is the destination's shape, so this is a schema
    /// mismatch between source and mappings, not a data problem.
    #[error("dataset '{dataset}': selected column '{column}' missing from all source records")]
    SchemaMismatch { dataset: String, column: String },
}
