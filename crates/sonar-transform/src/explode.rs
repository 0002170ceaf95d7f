//! Supplier-group explosion.
//!
//! `supplier_group` rows are not read from their own collection: each client
//! document carries a `supplier_groups` map of group name to a list of
//! wrapped supplier ids, and one output row is produced per
//! (client, group, supplier) triple.

use serde_json::Value as Json;

use sonar_model::{Record, Value};

/// Explode `supplier_groups` maps out of client documents.
///
/// A client without the field (or with an empty map) contributes no rows.
/// A client id that is not a wrapped oid yields `Null`, which the key
/// validator then rejects before load.
pub fn explode_supplier_groups(docs: &[Json]) -> Vec<Record> {
    let mut rows = Vec::new();
    for doc in docs {
        let client_id = doc
            .pointer("/_id/$oid")
            .and_then(Json::as_str)
            .map(Value::text)
            .unwrap_or(Value::Null);
        let Some(groups) = doc.get("supplier_groups").and_then(Json::as_object) else {
            continue;
        };
        for (group_name, suppliers) in groups {
            let Some(suppliers) = suppliers.as_array() else {
                continue;
            };
            for supplier in suppliers {
                let supplier_id = supplier
                    .get("$oid")
                    .and_then(Json::as_str)
                    .map(Value::text)
                    .unwrap_or(Value::Null);
                let mut row = Record::new();
                row.insert("client_id", client_id.clone());
                row.insert("group_name", Value::text(group_name.clone()));
                row.insert("supplier_id", supplier_id);
                rows.push(row);
            }
        }
    }
    rows
}
