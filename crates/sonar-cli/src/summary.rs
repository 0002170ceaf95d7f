//! Run summary table printed after a pipeline run.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::pipeline::RunSummary;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        Cell::new("Dataset").add_attribute(Attribute::Bold),
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new("Loaded").add_attribute(Attribute::Bold),
        Cell::new("Attempts").add_attribute(Attribute::Bold),
        Cell::new("Time").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);
    for run in &summary.runs {
        let status = match &run.error {
            None => "ok".to_owned(),
            Some(err) => format!("failed: {err}"),
        };
        table.add_row(vec![
            Cell::new(run.dataset.name()),
            Cell::new(
                run.rows
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_owned()),
            )
            .set_alignment(CellAlignment::Right),
            Cell::new(
                run.loaded
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_owned()),
            )
            .set_alignment(CellAlignment::Right),
            Cell::new(run.attempts).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2?}", run.elapsed)).set_alignment(CellAlignment::Right),
            Cell::new(status),
        ]);
    }
    println!("{table}");
}
