//! Structure-preserving sheet reads and writes.
//!
//! A sheet may carry description rows above its header. The reader splits
//! them out; the writer puts them back at their original coordinates so the
//! output keeps the input's row skeleton.

use dateshift_model::{CellValue, Result, SheetStructure};

use crate::provider::{DatasetReader, DatasetWriter};

/// Partition raw rows into description rows, header, and data.
///
/// Rows strictly above `header_row` are kept verbatim, blanks included.
/// Data rows are padded or truncated to the header width.
pub fn read_structure(rows: &[Vec<CellValue>], header_row: usize) -> SheetStructure {
    let mut description_rows = Vec::with_capacity(header_row);
    for index in 0..header_row {
        description_rows.push(rows.get(index).cloned().unwrap_or_default());
    }
    let columns: Vec<String> = rows
        .get(header_row)
        .map(|header| header.iter().map(column_name).collect())
        .unwrap_or_default();
    let data = rows
        .iter()
        .skip(header_row + 1)
        .map(|row| sized_row(row, columns.len()))
        .collect();
    SheetStructure {
        description_rows,
        columns,
        rows: data,
    }
}

/// Read a named sheet through a provider and partition it.
pub fn read_sheet_structure<R: DatasetReader>(
    reader: &R,
    name: &str,
    header_row: usize,
) -> Result<SheetStructure> {
    let rows = reader.read_sheet(name)?;
    Ok(read_structure(&rows, header_row))
}

/// Write a sheet back with its original row skeleton.
///
/// Description rows land at rows `0..header_row`, the header immediately
/// below them, data below that. When a display format is supplied, non-empty
/// cells of the named date columns are tagged; column positions resolve
/// against the data header, never the description rows.
pub fn write_sheet_structure<W: DatasetWriter>(
    writer: &mut W,
    name: &str,
    structure: &SheetStructure,
    date_columns: &[String],
    date_format: Option<&str>,
) {
    writer.open_sheet(name);
    for (row, cells) in structure.description_rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if !cell.is_empty() {
                writer.write_cell(name, row, col, cell.clone());
            }
        }
    }
    let header_row = structure.header_row();
    for (col, column) in structure.columns.iter().enumerate() {
        writer.write_cell(name, header_row, col, CellValue::Text(column.clone()));
    }
    let format_columns: Vec<usize> = match date_format {
        Some(_) => date_columns
            .iter()
            .filter_map(|column| structure.column_index(column))
            .collect(),
        None => Vec::new(),
    };
    for (index, cells) in structure.rows.iter().enumerate() {
        let row = header_row + 1 + index;
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            writer.write_cell(name, row, col, cell.clone());
            if let Some(format) = date_format {
                if format_columns.contains(&col) {
                    writer.set_cell_format(name, row, col, format);
                }
            }
        }
    }
}

fn column_name(cell: &CellValue) -> String {
    cell.display_text().trim().to_string()
}

fn sized_row(row: &[CellValue], width: usize) -> Vec<CellValue> {
    let mut sized: Vec<CellValue> = row.iter().take(width).cloned().collect();
    sized.resize(width, CellValue::Empty);
    sized
}
