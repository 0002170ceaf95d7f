//! Per-dataset transform dispatch.

use serde_json::Value as Json;
use tracing::info;

use sonar_model::{Dataset, MappingRegistry, Table};

use crate::error::TransformError;
use crate::explode::explode_supplier_groups;
use crate::flatten::flatten_document;
use crate::mapper::{apply_rename, project};

/// Transform one dataset's raw documents into its destination table.
///
/// Every dataset flattens, renames, and projects; `supplier_group` instead
/// explodes its rows out of the clients collection before projection.
pub fn transform(
    dataset: Dataset,
    docs: &[Json],
    registry: &MappingRegistry,
) -> Result<Table, TransformError> {
    let spec = registry.get(dataset);
    let records = match dataset {
        Dataset::SupplierGroup => explode_supplier_groups(docs),
        _ => docs
            .iter()
            .map(|doc| apply_rename(flatten_document(doc), &spec.rename))
            .collect(),
    };
    let table = project(records, dataset, &spec.select)?;
    info!(dataset = %dataset, rows = table.len(), "dataset transformed");
    Ok(table)
}
