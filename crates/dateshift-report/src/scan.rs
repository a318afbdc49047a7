//! Scan report generation.
//!
//! Scans a list of delimited-text files and produces a multi-sheet report:
//! a field overview, a table overview, one value-frequency sheet per table,
//! and a metadata sheet recording the scan parameters. Shares no state with
//! the date-shift pipeline.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use dateshift_ingest::provider::DatasetWriter;
use dateshift_model::{CellValue, Result};

const FIELD_OVERVIEW_SHEET: &str = "Field Overview";
const TABLE_OVERVIEW_SHEET: &str = "Table Overview";
const META_SHEET: &str = "_";

const FIELD_OVERVIEW_HEADERS: [&str; 6] = [
    "Table",
    "Field",
    "Description",
    "Type",
    "Max length",
    "N rows",
];
const TABLE_OVERVIEW_HEADERS: [&str; 6] = [
    "Table",
    "Description",
    "N rows",
    "N rows checked",
    "N fields",
    "N fields empty",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Values occurring fewer times than this are dropped from the report.
    pub min_cell_count: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { min_cell_count: 1 }
    }
}

#[derive(Debug)]
pub struct ScanSummary {
    pub table_count: usize,
    pub row_count: usize,
}

#[derive(Debug)]
struct ScannedTable {
    name: String,
    fields: Vec<String>,
    row_count: usize,
    /// Per field: (value, count) pairs, most frequent first.
    frequencies: BTreeMap<String, Vec<(String, usize)>>,
}

/// Scan each file and write the report sheets through the writer.
///
/// The caller finalizes the writer; tables are processed in name order and
/// duplicate names get an appended index.
pub fn generate_scan_report<W: DatasetWriter>(
    csv_files: &[PathBuf],
    writer: &mut W,
    options: &ScanOptions,
) -> Result<ScanSummary> {
    let started_at = timestamp();
    let mut names: Vec<(String, &PathBuf)> = csv_files
        .iter()
        .map(|path| (table_name(path), path))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    let indexed = index_table_names(names.iter().map(|(name, _)| name.as_str()));

    let mut tables = Vec::with_capacity(names.len());
    for ((_, path), name) in names.iter().zip(indexed) {
        let table = scan_csv_values(path, name, options.min_cell_count)?;
        debug!(table = %table.name, rows = table.row_count, "scanned table");
        tables.push(table);
    }

    write_field_overview(writer, &tables);
    write_table_overview(writer, &tables);
    for table in &tables {
        write_value_sheet(writer, table);
    }
    write_meta_sheet(writer, options, &started_at, &timestamp());

    let row_count = tables.iter().map(|table| table.row_count).sum();
    info!(table_count = tables.len(), row_count, "scan report assembled");
    Ok(ScanSummary {
        table_count: tables.len(),
        row_count,
    })
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("table")
        .to_string()
}

/// Disambiguate duplicate table names by appending an occurrence index.
fn index_table_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut indexed = Vec::new();
    for name in names {
        let seen = counts.entry(name).or_insert(0);
        indexed.push(if *seen == 0 {
            name.to_string()
        } else {
            format!("{name}_{seen}")
        });
        *seen += 1;
    }
    indexed
}

/// Count every distinct value per field, then keep those at or above the
/// minimum count, most frequent first with ties broken by value.
fn scan_csv_values(path: &Path, name: String, min_cell_count: usize) -> Result<ScannedTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut counters: Vec<BTreeMap<String, usize>> = vec![BTreeMap::new(); fields.len()];
    let mut row_count = 0;
    for record in reader.records() {
        let record = record?;
        row_count += 1;
        for (index, counter) in counters.iter_mut().enumerate() {
            let value = record.get(index).unwrap_or("");
            *counter.entry(value.to_string()).or_insert(0) += 1;
        }
    }
    let mut frequencies = BTreeMap::new();
    for (field, counter) in fields.iter().zip(counters) {
        let mut pairs: Vec<(String, usize)> = counter
            .into_iter()
            .filter(|(_, count)| *count >= min_cell_count)
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        frequencies.insert(field.clone(), pairs);
    }
    Ok(ScannedTable {
        name,
        fields,
        row_count,
        frequencies,
    })
}

fn write_row<W: DatasetWriter>(writer: &mut W, sheet: &str, row: usize, cells: &[CellValue]) {
    for (col, cell) in cells.iter().enumerate() {
        if !cell.is_empty() {
            writer.write_cell(sheet, row, col, cell.clone());
        }
    }
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn number(value: i64) -> CellValue {
    CellValue::Number(value as f64)
}

fn write_field_overview<W: DatasetWriter>(writer: &mut W, tables: &[ScannedTable]) {
    writer.open_sheet(FIELD_OVERVIEW_SHEET);
    let header: Vec<CellValue> = FIELD_OVERVIEW_HEADERS.iter().map(|h| text(h)).collect();
    write_row(writer, FIELD_OVERVIEW_SHEET, 0, &header);
    let mut row = 1;
    for table in tables {
        for field in &table.fields {
            write_row(
                writer,
                FIELD_OVERVIEW_SHEET,
                row,
                &[
                    text(&table.name),
                    text(field),
                    CellValue::Empty,
                    text("STRING"),
                    CellValue::Empty,
                    CellValue::Empty,
                ],
            );
            row += 1;
        }
        // spacer row between tables
        row += 1;
    }
}

fn write_table_overview<W: DatasetWriter>(writer: &mut W, tables: &[ScannedTable]) {
    writer.open_sheet(TABLE_OVERVIEW_SHEET);
    let header: Vec<CellValue> = TABLE_OVERVIEW_HEADERS.iter().map(|h| text(h)).collect();
    write_row(writer, TABLE_OVERVIEW_SHEET, 0, &header);
    for (index, table) in tables.iter().enumerate() {
        write_row(
            writer,
            TABLE_OVERVIEW_SHEET,
            index + 1,
            &[
                text(&table.name),
                CellValue::Empty,
                number(table.row_count as i64),
                number(table.row_count as i64),
                number(table.fields.len() as i64),
                number(-1),
            ],
        );
    }
}

/// One sheet per table: paired (value, frequency) columns per field.
fn write_value_sheet<W: DatasetWriter>(writer: &mut W, table: &ScannedTable) {
    writer.open_sheet(&table.name);
    for (pair, field) in table.fields.iter().enumerate() {
        writer.write_cell(&table.name, 0, pair * 2, text(field));
        writer.write_cell(&table.name, 0, pair * 2 + 1, text("Frequency"));
        let values = table
            .frequencies
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (index, (value, count)) in values.iter().enumerate() {
            if !value.is_empty() {
                writer.write_cell(&table.name, index + 1, pair * 2, text(value));
            }
            writer.write_cell(&table.name, index + 1, pair * 2 + 1, number(*count as i64));
        }
    }
}

fn write_meta_sheet<W: DatasetWriter>(
    writer: &mut W,
    options: &ScanOptions,
    started_at: &str,
    finished_at: &str,
) {
    writer.open_sheet(META_SHEET);
    let rows: Vec<Vec<CellValue>> = vec![
        vec![text("Key"), text("Value")],
        vec![text("Version"), text(env!("CARGO_PKG_VERSION"))],
        vec![text("Scan started at"), text(started_at)],
        vec![text("Scan finished at"), text(finished_at)],
        vec![text("sourceType"), text("CSV_FILES")],
        vec![text("scanValues"), text("true")],
        vec![
            text("minCellCount"),
            number(options.min_cell_count as i64),
        ],
    ];
    for (index, row) in rows.iter().enumerate() {
        write_row(writer, META_SHEET, index, row);
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
