use tempfile::TempDir;

use dateshift_ingest::csv_folder::{CsvFolderReader, CsvFolderWriter};
use dateshift_ingest::provider::DatasetWriter;
use dateshift_ingest::structure::{read_sheet_structure, write_sheet_structure};
use dateshift_model::{CellValue, SheetStructure};

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn sample_sheet() -> SheetStructure {
    SheetStructure {
        description_rows: vec![
            vec![text("Oncology export"), CellValue::Empty, text("v2")],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
        ],
        columns: vec![
            "patient_id".to_string(),
            "dob".to_string(),
            "note".to_string(),
        ],
        rows: vec![
            vec![text("P001"), text("2023-01-15"), text("ok")],
            vec![text("P002"), CellValue::Empty, CellValue::Empty],
        ],
    }
}

#[test]
fn description_rows_survive_a_write_read_cycle() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let sheet = sample_sheet();

    let mut writer = CsvFolderWriter::create(&out);
    write_sheet_structure(&mut writer, "patients", &sheet, &[], None);
    writer.finalize().expect("finalize");

    let reader = CsvFolderReader::open(&out).expect("open folder");
    let round = read_sheet_structure(&reader, "patients", sheet.header_row()).expect("read sheet");

    assert_eq!(round.description_rows[0][0], text("Oncology export"));
    assert_eq!(round.description_rows[0][2], text("v2"));
    assert_eq!(round.header_row(), sheet.header_row());
    assert_eq!(round.columns, sheet.columns);
    assert_eq!(round.rows, sheet.rows);
}

#[test]
fn sheet_without_description_rows_round_trips() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let sheet = SheetStructure {
        description_rows: Vec::new(),
        columns: vec!["patient_id".to_string(), "dob".to_string()],
        rows: vec![vec![text("P001"), text("2023-01-15")]],
    };

    let mut writer = CsvFolderWriter::create(&out);
    write_sheet_structure(&mut writer, "patients", &sheet, &[], None);
    writer.finalize().expect("finalize");

    let reader = CsvFolderReader::open(&out).expect("open folder");
    let round = read_sheet_structure(&reader, "patients", 0).expect("read sheet");
    assert_eq!(round, sheet);
}

#[test]
fn date_format_tags_only_configured_columns() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let date = chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let sheet = SheetStructure {
        description_rows: Vec::new(),
        columns: vec!["patient_id".to_string(), "dob".to_string()],
        rows: vec![vec![text("P001"), CellValue::Date(date)]],
    };

    let mut writer = CsvFolderWriter::create(&out);
    write_sheet_structure(
        &mut writer,
        "patients",
        &sheet,
        &["dob".to_string()],
        Some("DD/MM/YYYY"),
    );
    writer.finalize().expect("finalize");

    let contents = std::fs::read_to_string(out.join("patients.csv")).unwrap();
    assert!(contents.contains("01/06/2023"));
}
