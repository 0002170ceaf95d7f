//! Column-level data-quality checks against the registry's declared rules.
//!
//! The rules gate the load: a value passes only if the loader can bind it to
//! the declared column type. Text never stands in for a timestamp, float, or
//! boolean here; anything textual must have been normalized by the transform
//! stage. `Null` passes the typed checks since it binds as SQL NULL.

use tracing::debug;

use sonar_model::{ColumnKind, QualityRule, Table, Value};

use crate::error::ValidateError;

/// Run every declared quality rule against the table, failing on the first
/// violation. Read-only, like the key checks.
pub fn check_quality(table: &Table, rules: &[QualityRule]) -> Result<(), ValidateError> {
    for rule in rules {
        if !table.has_column(&rule.column) {
            return Err(ValidateError::SchemaViolation {
                column: rule.column.clone(),
            });
        }
        match rule.kind {
            ColumnKind::Timestamp => check_timestamps(table, &rule.column)?,
            ColumnKind::Varchar => {
                if let Some(length) = rule.length {
                    check_id_length(table, &rule.column, length)?;
                }
            }
            ColumnKind::Float => check_floats(table, &rule.column)?,
            ColumnKind::Boolean => check_booleans(table, &rule.column)?,
        }
    }
    debug!(dataset = %table.dataset, rules = rules.len(), "quality rules passed");
    Ok(())
}

/// Every value must be a normalized timestamp or null.
fn check_timestamps(table: &Table, column: &str) -> Result<(), ValidateError> {
    let invalid = table
        .column_values(column)
        .filter(|v| !matches!(v, Value::Timestamp(_) | Value::Null))
        .count();
    if invalid > 0 {
        return Err(ValidateError::QualityViolation {
            column: column.to_owned(),
            reason: format!("has {invalid} value(s) that are not normalized timestamps"),
        });
    }
    Ok(())
}

/// Identifier columns must be non-empty text of exactly the declared
/// length (object ids are fixed-width).
fn check_id_length(table: &Table, column: &str, length: usize) -> Result<(), ValidateError> {
    for value in table.column_values(column) {
        let text = match value {
            Value::Text(s) if !s.is_empty() => s,
            _ => {
                return Err(ValidateError::QualityViolation {
                    column: column.to_owned(),
                    reason: "has null or empty id values".to_owned(),
                });
            }
        };
        if text.chars().count() != length {
            return Err(ValidateError::QualityViolation {
                column: column.to_owned(),
                reason: format!("has id values not exactly {length} characters long"),
            });
        }
    }
    Ok(())
}

/// Floats must be numeric or null.
fn check_floats(table: &Table, column: &str) -> Result<(), ValidateError> {
    let invalid = table
        .column_values(column)
        .filter(|v| !matches!(v, Value::Float(_) | Value::Null))
        .count();
    if invalid > 0 {
        return Err(ValidateError::QualityViolation {
            column: column.to_owned(),
            reason: format!("has {invalid} non-numeric value(s)"),
        });
    }
    Ok(())
}

/// Booleans must be true/false or null.
fn check_booleans(table: &Table, column: &str) -> Result<(), ValidateError> {
    let invalid = table
        .column_values(column)
        .filter(|v| !matches!(v, Value::Bool(_) | Value::Null))
        .count();
    if invalid > 0 {
        return Err(ValidateError::QualityViolation {
            column: column.to_owned(),
            reason: format!("has {invalid} non-boolean value(s)"),
        });
    }
    Ok(())
}
