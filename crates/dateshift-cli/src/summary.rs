use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dateshift_core::pipeline::ShiftReport;
use dateshift_report::scan::ScanSummary;

pub fn print_shift_summary(report: &ShiftReport) {
    println!("Linking table: {}", report.linking_table.display());
    if report.reused_linking_table {
        println!("Reused existing linking table offsets where present.");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Shifted columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total_rows = 0usize;
    for sheet in &report.sheets {
        total_rows += sheet.rows;
        let shifted = if sheet.shifted_columns.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(sheet.shifted_columns.join(", ")).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(&sheet.name),
            Cell::new(sheet.rows),
            shifted,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(format!("{} patients mapped", report.mapping_len)),
    ]);
    println!("{table}");
}

pub fn print_scan_summary(summary: &ScanSummary) {
    println!(
        "Scanned {} table(s), {} row(s).",
        summary.table_count, summary.row_count
    );
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
