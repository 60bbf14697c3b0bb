use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pbk_model::ObjectKind;

use crate::types::ConvertOutcome;

pub fn print_summary(outcome: &ConvertOutcome) {
    println!(
        "Patient: {} ({})",
        outcome.patient, outcome.medical_record_number
    );
    if outcome.dry_run {
        println!("Output: {} (dry run, nothing written)", outcome.output_dir.display());
    } else {
        println!("Output: {}", outcome.output_dir.display());
    }

    let report = &outcome.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Description"),
        header_cell("Objects"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for kind in ObjectKind::ALL {
        table.add_row(vec![
            Cell::new(kind.code())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(kind.description()),
            count_cell(report.count(kind), Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All objects")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.produced.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_failure_table(outcome);
}

fn print_failure_table(outcome: &ConvertOutcome) {
    let failures = &outcome.report.failures;
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Scope"), header_cell("Error")]);
    apply_summary_table_style(&mut table);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.scope).fg(Color::Red),
            Cell::new(failure.error.to_string()),
        ]);
    }
    eprintln!();
    eprintln!("Failures:");
    eprintln!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
