use std::fmt;

use thiserror::Error;

/// What a key column violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyViolationKind {
    /// Null or empty-string values in the key column.
    NullOrEmpty { rows: usize },
    /// A key value appearing more than once.
    Duplicate { value: String, occurrences: usize },
}

impl fmt::Display for KeyViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullOrEmpty { rows } => {
                write!(f, "contains null or empty values in {rows} row(s)")
            }
            Self::Duplicate { value, occurrences } => {
                write!(f, "contains duplicate value {value} ({occurrences} occurrences)")
            }
        }
    }
}

/// Errors from the validation stage. All are fatal to the current dataset
/// run; one bad row blocks the whole table.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("primary key violation: column '{column}' {kind}")]
    PrimaryKeyViolation {
        column: String,
        kind: KeyViolationKind,
    },
    #[error("column '{column}' does not exist in the table")]
    SchemaViolation { column: String },
    #[error("data quality violation: column '{column}' {reason}")]
    QualityViolation { column: String, reason: String },
}
