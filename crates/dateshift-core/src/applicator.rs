//! Application of a shift mapping to one sheet.

use chrono::{Duration, NaiveDate};

use dateshift_model::{CellValue, SheetStructure, ShiftMapping};

use crate::dateparse::parse_date_cell;
use crate::identifier::normalize_identifier;

/// Shift the configured date columns of a sheet, one offset per patient.
///
/// Operates on a copy; the input is never mutated. Configured date columns
/// absent from the sheet are skipped. Per row: a parsed date moves by the
/// owner's offset, an unmapped identifier means a zero-day shift, and an
/// unparseable value becomes absent. Output date cells are always calendar
/// dates or absent, never a stale string or a time-carrying value.
pub fn apply_date_shifts(
    sheet: &SheetStructure,
    patient_id_column: &str,
    date_columns: &[String],
    mapping: &ShiftMapping,
) -> SheetStructure {
    let mut shifted = sheet.clone();
    let id_index = sheet.column_index(patient_id_column);
    let date_indices: Vec<usize> = date_columns
        .iter()
        .filter_map(|column| sheet.column_index(column))
        .collect();
    for (row_index, row) in sheet.rows.iter().enumerate() {
        let offset = id_index
            .and_then(|index| row.get(index))
            .and_then(normalize_identifier)
            .and_then(|identifier| mapping.offset_for(&identifier))
            .unwrap_or(0);
        for &column in &date_indices {
            let cell = row.get(column).unwrap_or(&CellValue::Empty);
            shifted.rows[row_index][column] = match parse_date_cell(cell) {
                Some(date) => CellValue::Date(shift_date(date, offset)),
                None => CellValue::Empty,
            };
        }
    }
    shifted
}

fn shift_date(date: NaiveDate, offset_days: i64) -> NaiveDate {
    date + Duration::days(offset_days)
}
