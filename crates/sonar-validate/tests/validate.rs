//! Key-integrity and quality scenarios.

use chrono::{TimeZone, Utc};
use sonar_model::{ColumnKind, Dataset, QualityRule, Record, Table, Value};
use sonar_validate::{
    check_duplicates, check_null_or_empty, check_quality, check_unique_key, KeyViolationKind,
    ValidateError,
};

fn client_table(rows: &[&[(&str, Value)]]) -> Table {
    let mut table = Table::new(
        Dataset::Clients,
        vec!["client_id".to_owned(), "name".to_owned()],
    );
    for cells in rows {
        let row: Record = cells
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();
        table.push_row(row);
    }
    table
}

#[test]
fn duplicate_key_values_violate() {
    // Two rows sharing one client id.
    let table = client_table(&[
        &[("client_id", Value::text("abc123")), ("name", Value::text("X"))],
        &[("client_id", Value::text("abc123")), ("name", Value::text("Y"))],
    ]);
    match check_duplicates(&table, "client_id") {
        Err(ValidateError::PrimaryKeyViolation { column, kind }) => {
            assert_eq!(column, "client_id");
            assert_eq!(
                kind,
                KeyViolationKind::Duplicate {
                    value: "'abc123'".to_owned(),
                    occurrences: 2
                }
            );
        }
        other => panic!("expected PrimaryKeyViolation, got {other:?}"),
    }
}

#[test]
fn empty_key_value_violates() {
    let table = client_table(&[&[("client_id", Value::text("")), ("name", Value::text("X"))]]);
    match check_null_or_empty(&table, "client_id") {
        Err(ValidateError::PrimaryKeyViolation { column, kind }) => {
            assert_eq!(column, "client_id");
            assert_eq!(kind, KeyViolationKind::NullOrEmpty { rows: 1 });
        }
        other => panic!("expected PrimaryKeyViolation, got {other:?}"),
    }
}

#[test]
fn null_key_value_violates() {
    let table = client_table(&[&[("client_id", Value::Null), ("name", Value::text("X"))]]);
    assert!(matches!(
        check_null_or_empty(&table, "client_id"),
        Err(ValidateError::PrimaryKeyViolation { .. })
    ));
}

#[test]
fn repeated_nulls_are_not_duplicates() {
    // Two null keys: the null/empty check owns that diagnostic; a direct
    // duplicate check must not report them as a repeated value.
    let table = client_table(&[
        &[("client_id", Value::Null), ("name", Value::text("X"))],
        &[("client_id", Value::Null), ("name", Value::text("Y"))],
    ]);
    check_duplicates(&table, "client_id").expect("nulls are not counted");
    assert!(matches!(
        check_null_or_empty(&table, "client_id"),
        Err(ValidateError::PrimaryKeyViolation {
            kind: KeyViolationKind::NullOrEmpty { rows: 2 },
            ..
        })
    ));
}

#[test]
fn distinct_nonempty_keys_pass_both_checks() {
    let table = client_table(&[
        &[("client_id", Value::text("abc123"))],
        &[("client_id", Value::text("def456"))],
    ]);
    let null_check = check_null_or_empty(&table, "client_id").expect("no nulls");
    let dup_check = check_duplicates(&table, "client_id").expect("no duplicates");
    assert_eq!(null_check.rows_checked, 2);
    assert_eq!(dup_check.column, "client_id");
}

#[test]
fn absent_column_is_schema_violation_not_a_crash() {
    let table = client_table(&[&[("client_id", Value::text("abc123"))]]);
    for result in [
        check_null_or_empty(&table, "missing_column"),
        check_duplicates(&table, "missing_column"),
    ] {
        match result {
            Err(ValidateError::SchemaViolation { column }) => {
                assert_eq!(column, "missing_column");
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }
}

#[test]
fn checks_do_not_mutate_the_table() {
    let table = client_table(&[
        &[("client_id", Value::text("abc123")), ("name", Value::text("X"))],
        &[("client_id", Value::text("abc123")), ("name", Value::text("Y"))],
    ]);
    let before = table.clone();
    let _ = check_null_or_empty(&table, "client_id");
    let _ = check_duplicates(&table, "client_id");
    assert_eq!(table.rows, before.rows);
    assert_eq!(table.columns, before.columns);
}

#[test]
fn composite_key_uniqueness() {
    let mut table = Table::new(
        Dataset::SupplierGroup,
        vec![
            "supplier_id".to_owned(),
            "client_id".to_owned(),
            "group_name".to_owned(),
        ],
    );
    for (supplier, group) in [("s1", "g1"), ("s1", "g2"), ("s2", "g1")] {
        let mut row = Record::new();
        row.insert("supplier_id", Value::text(supplier));
        row.insert("client_id", Value::text("c1"));
        row.insert("group_name", Value::text(group));
        table.push_row(row);
    }
    check_unique_key(&table, &["supplier_id", "client_id", "group_name"]).expect("unique triples");

    // Repeat an existing triple.
    let mut dup = Record::new();
    dup.insert("supplier_id", Value::text("s1"));
    dup.insert("client_id", Value::text("c1"));
    dup.insert("group_name", Value::text("g2"));
    table.push_row(dup);
    assert!(matches!(
        check_unique_key(&table, &["supplier_id", "client_id", "group_name"]),
        Err(ValidateError::PrimaryKeyViolation { .. })
    ));
}

#[test]
fn quality_rules_catch_bad_values() {
    let rules = vec![
        QualityRule {
            column: "client_id".to_owned(),
            kind: ColumnKind::Varchar,
            length: Some(6),
        },
        QualityRule {
            column: "name".to_owned(),
            kind: ColumnKind::Varchar,
            length: None,
        },
    ];
    let good = client_table(&[&[
        ("client_id", Value::text("abc123")),
        ("name", Value::text("X")),
    ]]);
    check_quality(&good, &rules).expect("good table passes");

    let short_id = client_table(&[&[
        ("client_id", Value::text("abc")),
        ("name", Value::text("X")),
    ]]);
    assert!(matches!(
        check_quality(&short_id, &rules),
        Err(ValidateError::QualityViolation { .. })
    ));
}

fn typed_rules() -> Vec<QualityRule> {
    vec![
        QualityRule {
            column: "date".to_owned(),
            kind: ColumnKind::Timestamp,
            length: None,
        },
        QualityRule {
            column: "priority".to_owned(),
            kind: ColumnKind::Float,
            length: None,
        },
        QualityRule {
            column: "login".to_owned(),
            kind: ColumnKind::Boolean,
            length: None,
        },
    ]
}

fn typed_table(date: Value, priority: Value, login: Value) -> Table {
    let mut table = Table::new(
        Dataset::Suppliers,
        vec![
            "date".to_owned(),
            "priority".to_owned(),
            "login".to_owned(),
        ],
    );
    let mut row = Record::new();
    row.insert("date", date);
    row.insert("priority", priority);
    row.insert("login", login);
    table.push_row(row);
    table
}

#[test]
fn quality_checks_timestamps_floats_and_booleans() {
    let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let good = typed_table(Value::Timestamp(ts), Value::Float(2.0), Value::Bool(true));
    check_quality(&good, &typed_rules()).expect("typed values pass");

    let nulls = typed_table(Value::Null, Value::Null, Value::Null);
    check_quality(&nulls, &typed_rules()).expect("nulls load as SQL NULL");

    let bad = typed_table(Value::text("not a date"), Value::Float(1.0), Value::Bool(false));
    match check_quality(&bad, &typed_rules()) {
        Err(ValidateError::QualityViolation { column, .. }) => assert_eq!(column, "date"),
        other => panic!("expected QualityViolation, got {other:?}"),
    }
}

#[test]
fn text_never_passes_for_a_typed_column() {
    // Parseable text is still text: the loader cannot bind it to a
    // TIMESTAMPTZ or DOUBLE PRECISION column, so the gate must reject it.
    let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let text_date = typed_table(
        Value::text("2023-01-01T12:00:00"),
        Value::Float(1.0),
        Value::Bool(true),
    );
    match check_quality(&text_date, &typed_rules()) {
        Err(ValidateError::QualityViolation { column, .. }) => assert_eq!(column, "date"),
        other => panic!("expected QualityViolation, got {other:?}"),
    }

    let text_float = typed_table(Value::Timestamp(ts), Value::text("2.82"), Value::Bool(true));
    match check_quality(&text_float, &typed_rules()) {
        Err(ValidateError::QualityViolation { column, .. }) => assert_eq!(column, "priority"),
        other => panic!("expected QualityViolation, got {other:?}"),
    }
}
