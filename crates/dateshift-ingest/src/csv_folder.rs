//! Folder-of-CSV dataset container.
//!
//! One `.csv` file per sheet, sheet name = file stem, enumeration sorted by
//! file name so read and write order agree across runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use dateshift_model::{CellValue, Result, ShiftError};

use crate::provider::{DatasetReader, DatasetWriter};

/// Default rendering for date cells without an explicit display format.
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvFolderReader {
    dir: PathBuf,
    sheet_names: Vec<String>,
}

impl CsvFolderReader {
    /// Open a folder, enumerating its `.csv` files sorted by file name.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ShiftError::FolderNotFound {
                path: dir.to_path_buf(),
            });
        }
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        let sheet_names = files
            .iter()
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()))
            .map(str::to_string)
            .collect();
        Ok(Self {
            dir: dir.to_path_buf(),
            sheet_names,
        })
    }
}

impl DatasetReader for CsvFolderReader {
    fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    fn read_sheet(&self, name: &str) -> Result<Vec<Vec<CellValue>>> {
        let path = self.dir.join(format!("{name}.csv"));
        if !path.is_file() {
            return Err(ShiftError::SheetNotFound {
                sheet: name.to_string(),
            });
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(cell_from_raw).collect());
        }
        debug!(sheet = %name, rows = rows.len(), "read sheet");
        Ok(rows)
    }
}

/// Cells are kept verbatim apart from BOM stripping; trimming here would
/// break the byte-exact round-trip of description rows.
fn cell_from_raw(raw: &str) -> CellValue {
    let cleaned = raw.trim_matches('\u{feff}');
    if cleaned.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(cleaned.to_string())
    }
}

#[derive(Default)]
struct PendingSheet {
    cells: BTreeMap<(usize, usize), CellValue>,
    formats: BTreeMap<(usize, usize), String>,
}

/// Buffered writer for a folder of CSV files.
///
/// Nothing touches the filesystem until `finalize`, so a run that fails
/// during validation leaves no partial output behind.
pub struct CsvFolderWriter {
    dir: PathBuf,
    sheets: Vec<(String, PendingSheet)>,
}

impl CsvFolderWriter {
    pub fn create(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            sheets: Vec::new(),
        }
    }

    fn sheet_mut(&mut self, name: &str) -> &mut PendingSheet {
        if let Some(position) = self.sheets.iter().position(|(sheet, _)| sheet == name) {
            return &mut self.sheets[position].1;
        }
        self.sheets.push((name.to_string(), PendingSheet::default()));
        &mut self.sheets.last_mut().expect("sheet just pushed").1
    }
}

impl DatasetWriter for CsvFolderWriter {
    fn open_sheet(&mut self, sheet: &str) {
        self.sheet_mut(sheet);
    }

    fn write_cell(&mut self, sheet: &str, row: usize, col: usize, value: CellValue) {
        self.sheet_mut(sheet).cells.insert((row, col), value);
    }

    fn set_cell_format(&mut self, sheet: &str, row: usize, col: usize, format: &str) {
        let translated = translate_date_format(format);
        self.sheet_mut(sheet).formats.insert((row, col), translated);
    }

    fn finalize(self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        for (name, sheet) in &self.sheets {
            let path = self.dir.join(format!("{name}.csv"));
            let mut writer = WriterBuilder::new().flexible(true).from_path(&path)?;
            let row_count = sheet
                .cells
                .keys()
                .map(|(row, _)| row + 1)
                .max()
                .unwrap_or(0);
            let col_count = sheet
                .cells
                .keys()
                .map(|(_, col)| col + 1)
                .max()
                .unwrap_or(0);
            for row in 0..row_count {
                let mut record = Vec::with_capacity(col_count);
                for col in 0..col_count {
                    record.push(render_cell(sheet, row, col));
                }
                writer.write_record(&record)?;
            }
            writer.flush()?;
            debug!(sheet = %name, rows = row_count, "wrote sheet");
        }
        Ok(())
    }
}

fn render_cell(sheet: &PendingSheet, row: usize, col: usize) -> String {
    match sheet.cells.get(&(row, col)) {
        Some(CellValue::Date(date)) => {
            let format = sheet
                .formats
                .get(&(row, col))
                .map(String::as_str)
                .unwrap_or(DEFAULT_DATE_FORMAT);
            date.format(format).to_string()
        }
        Some(value) => value.display_text(),
        None => String::new(),
    }
}

/// Translate a generic display date format (YYYY/MM/DD tokens, case
/// insensitive) to this backend's native chrono tokens.
pub fn translate_date_format(format: &str) -> String {
    let mut translated = String::with_capacity(format.len());
    let chars: Vec<char> = format.chars().collect();
    let mut position = 0;
    while position < chars.len() {
        let current = chars[position];
        let run = chars[position..]
            .iter()
            .take_while(|c| c.eq_ignore_ascii_case(&current))
            .count();
        match current.to_ascii_uppercase() {
            'Y' if run >= 4 => translated.push_str("%Y"),
            'Y' => translated.push_str("%y"),
            'M' => translated.push_str("%m"),
            'D' => translated.push_str("%d"),
            // a literal percent would otherwise read as a chrono specifier
            '%' => {
                for _ in 0..run {
                    translated.push_str("%%");
                }
            }
            _ => {
                for _ in 0..run {
                    translated.push(current);
                }
            }
        }
        position += run;
    }
    translated
}
