//! Document flattening.
//!
//! Raw documents arrive Mongo-export shaped: nested objects, plus the
//! type-tagged scalar convention where a primitive is wrapped in a
//! single-key object naming its semantic type (`{"$oid": ...}` for
//! identifiers, `{"$date": ...}` for timestamps).
//!
//! Flattening produces one [`Record`] per document with dotted field paths
//! as keys, so a wrapped id surfaces as `_id.$oid` and the rename table can
//! address it directly. `$date` leaves are normalized to a canonical UTC
//! timestamp here; arrays are preserved as ordered string sequences and
//! never flattened further.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as Json;

use sonar_model::{Record, Value};

/// Flatten one raw document into a flat record keyed by dotted paths.
pub fn flatten_document(doc: &Json) -> Record {
    let mut record = Record::new();
    if let Json::Object(fields) = doc {
        for (key, value) in fields {
            flatten_into(&mut record, key.clone(), value);
        }
    }
    record
}

fn flatten_into(record: &mut Record, path: String, value: &Json) {
    match value {
        Json::Object(fields) => {
            // A `$date` wrapper may hold `{"$numberLong": "<millis>"}`
            // instead of a direct scalar; resolve it before descending.
            if let Some(ts) = wrapped_number_long(path.as_str(), fields) {
                record.insert(path, ts);
                return;
            }
            for (key, nested) in fields {
                flatten_into(record, format!("{path}.{key}"), nested);
            }
        }
        Json::Array(items) => {
            record.insert(path, Value::TextArray(collapse_array(items)));
        }
        leaf => {
            record.insert(path.clone(), leaf_value(&path, leaf));
        }
    }
}

fn wrapped_number_long(path: &str, fields: &serde_json::Map<String, Json>) -> Option<Value> {
    if last_segment(path) != "$date" || fields.len() != 1 {
        return None;
    }
    let millis: i64 = fields.get("$numberLong")?.as_str()?.parse().ok()?;
    DateTime::from_timestamp_millis(millis).map(Value::Timestamp)
}

/// Convert a scalar leaf; a `$date` path segment triggers timestamp
/// normalization, everything else passes through typed.
fn leaf_value(path: &str, leaf: &Json) -> Value {
    if last_segment(path) == "$date"
        && let Some(ts) = parse_timestamp(leaf)
    {
        return Value::Timestamp(ts);
    }
    match leaf {
        Json::String(s) => Value::Text(s.clone()),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Parse the payload of a `$date` wrapper: RFC 3339, an offset-less
/// datetime (read as UTC), a bare calendar date, or epoch milliseconds.
pub fn parse_timestamp(value: &Json) -> Option<DateTime<Utc>> {
    match value {
        Json::String(s) => parse_timestamp_str(s),
        Json::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Collapse an array cell into an ordered sequence of strings.
///
/// Arrays of single-key objects (the `[{"$oid": ...}, ...]` idiom) collapse
/// to the inner values; primitive items stringify; anything else keeps its
/// JSON text so no element is silently dropped.
fn collapse_array(items: &[Json]) -> Vec<String> {
    items.iter().map(array_item_string).collect()
}

fn array_item_string(item: &Json) -> String {
    match item {
        Json::Object(fields) if fields.len() == 1 => match fields.values().next() {
            Some(Json::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        },
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
