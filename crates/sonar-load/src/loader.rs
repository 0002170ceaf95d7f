//! Full-refresh loading into the destination schema.
//!
//! The load sequence per table is fixed: ensure the schema and table exist
//! (never destructive to an existing compatible table), then truncate and
//! re-insert inside one transaction, so a failed run leaves the previous
//! contents visible. Callers must load parents before children within a run;
//! the pipeline drives this through `Dataset::LOAD_ORDER`.

use bytes::BytesMut;
use postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use postgres::{Client, NoTls};
use tracing::{debug, info};

use sonar_model::{DatasetSpec, Record, Table, Value};

use crate::config::PgConfig;
use crate::error::LoadError;

/// Destination writer over one blocking Postgres connection.
///
/// Full-refresh semantics assume exclusive access to each destination table
/// for the duration of its truncate+insert; no pooling, one connection per
/// run.
pub struct Loader {
    client: Client,
    schema: String,
}

impl Loader {
    pub fn connect(config: &PgConfig) -> Result<Self, LoadError> {
        let client = Client::connect(&config.connection_string(), NoTls)?;
        info!(destination = %config.connection_string_masked(), schema = %config.schema, "connected to destination");
        Ok(Self {
            client,
            schema: config.schema.clone(),
        })
    }

    /// Run the full-refresh sequence for one validated table.
    ///
    /// Returns the number of rows inserted.
    pub fn load_table(&mut self, table: &Table, spec: &DatasetSpec) -> Result<u64, LoadError> {
        let name = table.dataset.name();
        let missing: Vec<String> = spec
            .select
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                table: name.to_owned(),
                columns: missing,
            });
        }

        self.client
            .batch_execute(&create_schema_sql(&self.schema))?;
        self.client.batch_execute(&spec.ddl_for_schema(&self.schema))?;
        debug!(table = name, "destination table ensured");

        let mut tx = self.client.transaction()?;
        tx.batch_execute(&truncate_sql(&self.schema, name))?;
        let stmt = tx.prepare(&insert_sql(&self.schema, name, &table.columns))?;
        let mut inserted = 0u64;
        for row in &table.rows {
            let cells = bind_row(row, &table.columns);
            let params: Vec<&(dyn ToSql + Sync)> =
                cells.iter().map(|c| c as &(dyn ToSql + Sync)).collect();
            inserted += tx.execute(&stmt, &params)?;
        }
        tx.commit()?;
        info!(table = name, rows = inserted, "table loaded");
        Ok(inserted)
    }
}

pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {schema};")
}

pub fn truncate_sql(schema: &str, table: &str) -> String {
    format!("TRUNCATE TABLE {schema}.{table} CASCADE;")
}

pub fn insert_sql(schema: &str, table: &str, columns: &[String]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {schema}.{table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn bind_row<'a>(row: &'a Record, columns: &'a [String]) -> Vec<PgValue<'a>> {
    columns
        .iter()
        .map(|column| PgValue(row.get(column).unwrap_or(&Value::Null)))
        .collect()
}

/// SQL binding for a cell value: text, boolean, double precision,
/// timestamptz, or `TEXT[]`; `Null` binds as SQL NULL of the column type.
#[derive(Debug)]
pub struct PgValue<'a>(pub &'a Value);

impl ToSql for PgValue<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self.0 {
            Value::Text(s) => s.to_sql(ty, out),
            Value::Bool(b) => b.to_sql(ty, out),
            Value::Float(f) => f.to_sql(ty, out),
            Value::Timestamp(ts) => ts.to_sql(ty, out),
            Value::TextArray(items) => items.to_sql(ty, out),
            Value::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || <bool as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <chrono::DateTime<chrono::Utc> as ToSql>::accepts(ty)
            || <Vec<String> as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::{create_schema_sql, insert_sql, truncate_sql};

    #[test]
    fn insert_statement_orders_columns_and_placeholders() {
        let columns = vec![
            "client_id".to_owned(),
            "name".to_owned(),
            "sonar_dates".to_owned(),
        ];
        assert_eq!(
            insert_sql("sonar", "clients", &columns),
            "INSERT INTO sonar.clients (client_id, name, sonar_dates) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn refresh_statements() {
        assert_eq!(
            create_schema_sql("sonar"),
            "CREATE SCHEMA IF NOT EXISTS sonar;"
        );
        assert_eq!(
            truncate_sql("sonar", "clients"),
            "TRUNCATE TABLE sonar.clients CASCADE;"
        );
    }
}
