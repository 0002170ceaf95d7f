//! Primary-key integrity checks.
//!
//! These are the gate in front of the load stage: a violation converts a
//! would-be opaque database constraint error into a dataset-scoped
//! diagnostic before any write happens. All checks are read-only and report
//! their outcome in the returned [`KeyCheck`] rather than through any
//! process-wide console state.

use std::collections::BTreeMap;

use tracing::info;

use sonar_model::{Table, Value};

use crate::error::{KeyViolationKind, ValidateError};

/// Diagnostic record of one passed key check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    pub column: String,
    pub rows_checked: usize,
}

/// Fail if any row's key column is null or the empty string.
pub fn check_null_or_empty(table: &Table, column: &str) -> Result<KeyCheck, ValidateError> {
    require_column(table, column)?;
    let bad_rows = table
        .column_values(column)
        .filter(|v| v.is_missing_key())
        .count();
    if bad_rows > 0 {
        return Err(ValidateError::PrimaryKeyViolation {
            column: column.to_owned(),
            kind: KeyViolationKind::NullOrEmpty { rows: bad_rows },
        });
    }
    info!(dataset = %table.dataset, column, rows = table.len(), "key column has no null or empty values");
    Ok(KeyCheck {
        column: column.to_owned(),
        rows_checked: table.len(),
    })
}

/// Fail if any value in the key column occurs more than once. Equality is
/// value equality, not row identity. `Null` values are not counted; repeated
/// nulls are [`check_null_or_empty`]'s diagnostic, not a duplicate.
pub fn check_duplicates(table: &Table, column: &str) -> Result<KeyCheck, ValidateError> {
    require_column(table, column)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in table.column_values(column) {
        if value.is_null() {
            continue;
        }
        *counts.entry(canonical(value)).or_insert(0) += 1;
    }
    if let Some((value, occurrences)) = counts.into_iter().find(|(_, n)| *n > 1) {
        return Err(ValidateError::PrimaryKeyViolation {
            column: column.to_owned(),
            kind: KeyViolationKind::Duplicate { value, occurrences },
        });
    }
    info!(dataset = %table.dataset, column, rows = table.len(), "key column has no duplicate values");
    Ok(KeyCheck {
        column: column.to_owned(),
        rows_checked: table.len(),
    })
}

/// Fail if any combination of the given columns occurs more than once.
/// Used for composite primary keys (`supplier_group`).
pub fn check_unique_key(table: &Table, columns: &[&str]) -> Result<KeyCheck, ValidateError> {
    for column in columns {
        require_column(table, column)?;
    }
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in &table.rows {
        let key: Vec<String> = columns
            .iter()
            .map(|c| canonical(row.get(c).unwrap_or(&Value::Null)))
            .collect();
        *counts.entry(key.join("\u{1f}")).or_insert(0) += 1;
    }
    if let Some((value, occurrences)) = counts.into_iter().find(|(_, n)| *n > 1) {
        return Err(ValidateError::PrimaryKeyViolation {
            column: columns.join("+"),
            kind: KeyViolationKind::Duplicate {
                value: value.replace('\u{1f}', ", "),
                occurrences,
            },
        });
    }
    info!(dataset = %table.dataset, key = columns.join("+"), rows = table.len(), "composite key is unique");
    Ok(KeyCheck {
        column: columns.join("+"),
        rows_checked: table.len(),
    })
}

fn require_column(table: &Table, column: &str) -> Result<(), ValidateError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(ValidateError::SchemaViolation {
            column: column.to_owned(),
        })
    }
}

/// Canonical text form of a value for equality grouping.
fn canonical(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{s}'"),
        Value::Bool(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Timestamp(ts) => ts.to_rfc3339(),
        Value::TextArray(items) => format!("[{}]", items.join(",")),
        Value::Null => "null".to_owned(),
    }
}
