//! Rename application and select-list projection.

use std::collections::BTreeMap;

use tracing::warn;

use sonar_model::{Dataset, Record, Table, Value};

use crate::error::TransformError;

/// Apply the rename table to a flattened record. Fields the rename table
/// does not mention keep their original key.
pub fn apply_rename(record: Record, rename: &BTreeMap<String, String>) -> Record {
    record
        .cells
        .into_iter()
        .map(|(key, value)| match rename.get(&key) {
            Some(target) => (target.clone(), value),
            None => (key, value),
        })
        .collect()
}

/// Project renamed records onto the select list, producing the final table.
///
/// Policy for an absent selected column: missing from *every* record is a
/// schema mismatch and fails the run; missing from only some records
/// null-fills those rows. Columns outside the select list are dropped.
pub fn project(
    records: Vec<Record>,
    dataset: Dataset,
    select: &[String],
) -> Result<Table, TransformError> {
    for column in select {
        if !records.is_empty() && !records.iter().any(|r| r.contains(column)) {
            warn!(dataset = %dataset, column = %column, "selected column absent from all records");
            return Err(TransformError::SchemaMismatch {
                dataset: dataset.name().to_owned(),
                column: column.clone(),
            });
        }
    }

    let mut table = Table::new(dataset, select.to_vec());
    for record in records {
        let row = select
            .iter()
            .map(|column| {
                let value = record.get(column).cloned().unwrap_or(Value::Null);
                (column.clone(), value)
            })
            .collect();
        table.push_row(row);
    }
    Ok(table)
}
