use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

use dateshift_core::pipeline::run_shift;
use dateshift_model::{ShiftConfig, ShiftError, SheetRule};

fn write_fixture_dataset(dir: &Path) {
    fs::write(
        dir.join("patients.csv"),
        "patient_id,dob,name\n\
         P001,2023-01-15,Alice\n\
         P002,15/01/2023,Bob\n\
         \x20P001 ,2023-02-01,Alice again\n\
         ,2023-03-01,No id\n",
    )
    .unwrap();
    fs::write(
        dir.join("labs.csv"),
        "Lab export,,\n\
         ,,\n\
         patient_id,test_date,result\n\
         P001,2023-01-15,12.5\n\
         P002,Unknown,9.9\n\
         P999,2023-06-01,1.1\n",
    )
    .unwrap();
    fs::write(
        dir.join("admissions.csv"),
        "note,when\nfree text,2023-01-01\n",
    )
    .unwrap();
}

fn fixture_config(root: &Path) -> ShiftConfig {
    let mut sheets = BTreeMap::new();
    sheets.insert(
        "patients".to_string(),
        SheetRule {
            patient_id_column: "patient_id".to_string(),
            date_columns: vec!["dob".to_string()],
            header_row: 0,
        },
    );
    sheets.insert(
        "labs".to_string(),
        SheetRule {
            patient_id_column: "patient_id".to_string(),
            date_columns: vec!["test_date".to_string()],
            header_row: 2,
        },
    );
    ShiftConfig {
        input: root.join("input"),
        output: root.join("output"),
        patient_sheet: "patients".to_string(),
        patient_id_column: "patient_id".to_string(),
        sheets,
        min_shift_days: -15,
        max_shift_days: 15,
        linking_table: None,
        linking_table_output: Some(root.join("linking.csv")),
        seed: Some(42),
        date_format: None,
    }
}

fn read_linking_table(path: &Path) -> Vec<(String, i64)> {
    let contents = fs::read_to_string(path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("patient_id,shift_days"));
    lines
        .map(|line| {
            let (id, days) = line.split_once(',').unwrap();
            (id.to_string(), days.parse().unwrap())
        })
        .collect()
}

fn iso(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn shifted(value: &str, days: i64) -> String {
    (iso(value) + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn full_run_shifts_consistently_across_sheets() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);
    let config = fixture_config(root.path());

    let report = run_shift(&config).expect("run pipeline");
    assert_eq!(report.patient_count, 2);
    assert_eq!(report.mapping_len, 2);
    assert!(!report.reused_linking_table);

    let entries = read_linking_table(&root.path().join("linking.csv"));
    let ids: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["P001", "P002"]);
    let offsets: BTreeMap<&str, i64> = entries
        .iter()
        .map(|(id, days)| (id.as_str(), *days))
        .collect();
    for days in offsets.values() {
        assert!((-15..=15).contains(days));
    }

    let patients = fs::read_to_string(config.output.join("patients.csv")).unwrap();
    let patient_lines: Vec<&str> = patients.lines().collect();
    assert_eq!(patient_lines[0], "patient_id,dob,name");
    assert_eq!(
        patient_lines[1],
        format!("P001,{},Alice", shifted("2023-01-15", offsets["P001"]))
    );
    // Bob's day-first date lands on the same calendar date before shifting.
    assert_eq!(
        patient_lines[2],
        format!("P002,{},Bob", shifted("2023-01-15", offsets["P002"]))
    );
    // The whitespace variant of P001 uses P001's offset.
    assert_eq!(
        patient_lines[3],
        format!(" P001 ,{},Alice again", shifted("2023-02-01", offsets["P001"]))
    );

    let labs = fs::read_to_string(config.output.join("labs.csv")).unwrap();
    let lab_lines: Vec<&str> = labs.lines().collect();
    assert_eq!(lab_lines[0], "Lab export,,");
    assert_eq!(lab_lines[1], ",,");
    assert_eq!(lab_lines[2], "patient_id,test_date,result");
    assert_eq!(
        lab_lines[3],
        format!("P001,{},12.5", shifted("2023-01-15", offsets["P001"]))
    );
    // Placeholder dates stay absent after shifting.
    assert_eq!(lab_lines[4], "P002,,9.9");
    // Identifiers outside the mapping pass through unshifted.
    assert_eq!(lab_lines[5], "P999,2023-06-01,1.1");
}

#[test]
fn unconfigured_sheets_round_trip_verbatim() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);
    let config = fixture_config(root.path());

    run_shift(&config).expect("run pipeline");

    let original = fs::read_to_string(input.join("admissions.csv")).unwrap();
    let copied = fs::read_to_string(config.output.join("admissions.csv")).unwrap();
    assert_eq!(original, copied);
}

#[test]
fn output_contains_every_input_sheet() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);
    let config = fixture_config(root.path());

    let report = run_shift(&config).expect("run pipeline");
    let names: Vec<&str> = report.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["admissions", "labs", "patients"]);
    for name in names {
        assert!(config.output.join(format!("{name}.csv")).is_file());
    }
}

#[test]
fn identical_seeds_reproduce_identical_outputs() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);

    let mut first_config = fixture_config(root.path());
    first_config.output = root.path().join("out_a");
    first_config.linking_table_output = Some(root.path().join("link_a.csv"));
    run_shift(&first_config).expect("first run");

    let mut second_config = fixture_config(root.path());
    second_config.output = root.path().join("out_b");
    second_config.linking_table_output = Some(root.path().join("link_b.csv"));
    run_shift(&second_config).expect("second run");

    let link_a = fs::read_to_string(root.path().join("link_a.csv")).unwrap();
    let link_b = fs::read_to_string(root.path().join("link_b.csv")).unwrap();
    assert_eq!(link_a, link_b);
    let patients_a = fs::read_to_string(first_config.output.join("patients.csv")).unwrap();
    let patients_b = fs::read_to_string(second_config.output.join("patients.csv")).unwrap();
    assert_eq!(patients_a, patients_b);
}

#[test]
fn existing_linking_table_offsets_are_reused() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);

    let existing = root.path().join("existing.csv");
    fs::write(&existing, "patient_id,shift_days\nP001,7\n").unwrap();

    let mut config = fixture_config(root.path());
    config.linking_table = Some(existing);
    let report = run_shift(&config).expect("run pipeline");
    assert!(report.reused_linking_table);

    let entries = read_linking_table(&root.path().join("linking.csv"));
    let offsets: BTreeMap<&str, i64> = entries
        .iter()
        .map(|(id, days)| (id.as_str(), *days))
        .collect();
    assert_eq!(offsets["P001"], 7);
    assert!(offsets.contains_key("P002"));

    let patients = fs::read_to_string(config.output.join("patients.csv")).unwrap();
    assert!(patients.contains(&format!("P001,{},Alice", shifted("2023-01-15", 7))));
}

#[test]
fn missing_configured_column_aborts_before_any_output() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);

    let mut config = fixture_config(root.path());
    config
        .sheets
        .get_mut("labs")
        .unwrap()
        .patient_id_column = "subject_id".to_string();

    let error = run_shift(&config).unwrap_err();
    assert!(matches!(
        error,
        ShiftError::MissingColumn { ref sheet, ref column }
            if sheet == "labs" && column == "subject_id"
    ));
    assert!(!config.output.exists());
    assert!(!root.path().join("linking.csv").exists());
}

#[test]
fn missing_patient_sheet_is_fatal() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);

    let mut config = fixture_config(root.path());
    config.patient_sheet = "cohort".to_string();

    let error = run_shift(&config).unwrap_err();
    assert!(matches!(
        error,
        ShiftError::SheetNotFound { ref sheet } if sheet == "cohort"
    ));
}

#[test]
fn display_format_applies_to_shifted_columns() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("input");
    fs::create_dir(&input).unwrap();
    write_fixture_dataset(&input);

    let mut config = fixture_config(root.path());
    config.date_format = Some("DD/MM/YYYY".to_string());
    config.linking_table = Some(root.path().join("fixed.csv"));
    fs::write(
        root.path().join("fixed.csv"),
        "patient_id,shift_days\nP001,10\nP002,0\n",
    )
    .unwrap();

    run_shift(&config).expect("run pipeline");
    let patients = fs::read_to_string(config.output.join("patients.csv")).unwrap();
    assert!(patients.contains("P001,25/01/2023,Alice"));
}
