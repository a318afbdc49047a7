//! The shift pipeline: a linear, single-pass batch transform.
//!
//! Stages: read the patient sheet, validate every configured sheet, build
//! or reconcile the shift mapping, rewrite each sheet in enumeration order,
//! finalize the output container, persist the linking table. Validation of
//! all configured sheets happens before anything is written, so a
//! configuration error never leaves partial output behind.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use dateshift_ingest::csv_folder::{CsvFolderReader, CsvFolderWriter};
use dateshift_ingest::provider::{DatasetReader, DatasetWriter};
use dateshift_ingest::structure::{read_sheet_structure, write_sheet_structure};
use dateshift_model::{Result, SheetStructure, ShiftConfig, ShiftError};

use crate::applicator::apply_date_shifts;
use crate::identifier::normalize_identifier;
use crate::mapping::{
    generate_mappings, load_mappings, persist_mappings, reconcile_mappings, shift_rng,
};

/// Outcome of a pipeline run, consumed by the CLI summary.
#[derive(Debug)]
pub struct ShiftReport {
    pub sheets: Vec<SheetOutcome>,
    pub patient_count: usize,
    pub mapping_len: usize,
    pub linking_table: PathBuf,
    pub reused_linking_table: bool,
}

#[derive(Debug)]
pub struct SheetOutcome {
    pub name: String,
    pub rows: usize,
    /// Date columns actually shifted; empty for pass-through sheets.
    pub shifted_columns: Vec<String>,
}

/// Run the pipeline against the containers named in the configuration.
pub fn run_shift(config: &ShiftConfig) -> Result<ShiftReport> {
    let reader = CsvFolderReader::open(&config.input)?;
    let writer = CsvFolderWriter::create(&config.output);
    run_pipeline(config, &reader, writer)
}

/// Run the pipeline against explicit dataset containers.
pub fn run_pipeline<R, W>(config: &ShiftConfig, reader: &R, mut writer: W) -> Result<ShiftReport>
where
    R: DatasetReader,
    W: DatasetWriter,
{
    config.validate()?;
    let span = info_span!("shift", patient_sheet = %config.patient_sheet);
    let _guard = span.enter();

    let read_start = Instant::now();
    let sheet_names: Vec<String> = reader.sheet_names().to_vec();
    if !sheet_names.iter().any(|name| name == &config.patient_sheet) {
        return Err(ShiftError::SheetNotFound {
            sheet: config.patient_sheet.clone(),
        });
    }
    for configured in config.sheets.keys() {
        if !sheet_names.contains(configured) {
            warn!(sheet = %configured, "configured sheet not present in dataset");
        }
    }

    // Load every sheet up front; the dataset is fully in memory before any
    // output exists, and configured identifier columns are checked here.
    let mut tables: Vec<(String, SheetStructure)> = Vec::with_capacity(sheet_names.len());
    for name in &sheet_names {
        let header_row = config.rule_for(name).map(|rule| rule.header_row).unwrap_or(0);
        let structure = read_sheet_structure(reader, name, header_row)?;
        if let Some(rule) = config.rule_for(name) {
            if structure.column_index(&rule.patient_id_column).is_none() {
                return Err(ShiftError::MissingColumn {
                    sheet: name.clone(),
                    column: rule.patient_id_column.clone(),
                });
            }
        }
        tables.push((name.clone(), structure));
    }
    info!(
        sheet_count = tables.len(),
        duration_ms = read_start.elapsed().as_millis(),
        "dataset loaded"
    );

    let patient_ids = {
        let (_, patient) = tables
            .iter()
            .find(|(name, _)| name == &config.patient_sheet)
            .expect("patient sheet present after enumeration check");
        let id_index = patient
            .column_index(&config.patient_id_column)
            .ok_or_else(|| ShiftError::MissingColumn {
                sheet: config.patient_sheet.clone(),
                column: config.patient_id_column.clone(),
            })?;
        collect_patient_ids(patient, id_index)
    };
    info!(patient_count = patient_ids.len(), "patient identifiers collected");

    let mut rng = shift_rng(config.seed);
    let existing = config
        .linking_table
        .as_deref()
        .filter(|path| path.exists());
    let (mapping, reused_linking_table) = match existing {
        Some(path) => {
            let loaded = load_mappings(path)?;
            info!(path = %path.display(), entries = loaded.len(), "reconciling linking table");
            let reconciled = reconcile_mappings(
                &loaded,
                &patient_ids,
                config.min_shift_days,
                config.max_shift_days,
                &mut rng,
            );
            (reconciled, true)
        }
        None => {
            let generated = generate_mappings(
                &patient_ids,
                config.min_shift_days,
                config.max_shift_days,
                &mut rng,
            );
            (generated, false)
        }
    };

    let write_start = Instant::now();
    let mut outcomes = Vec::with_capacity(tables.len());
    for (name, structure) in tables {
        let rule = config.rule_for(&name);
        let (output, shifted_columns) = match rule {
            Some(rule) => {
                let shifted = apply_date_shifts(
                    &structure,
                    &rule.patient_id_column,
                    &rule.date_columns,
                    &mapping,
                );
                let present: Vec<String> = rule
                    .date_columns
                    .iter()
                    .filter(|column| structure.column_index(column).is_some())
                    .cloned()
                    .collect();
                (shifted, present)
            }
            None => (structure, Vec::new()),
        };
        debug!(
            sheet = %name,
            rows = output.record_count(),
            shifted_columns = shifted_columns.len(),
            "writing sheet"
        );
        let date_columns: &[String] = rule.map(|rule| rule.date_columns.as_slice()).unwrap_or(&[]);
        write_sheet_structure(
            &mut writer,
            &name,
            &output,
            date_columns,
            config.date_format.as_deref(),
        );
        outcomes.push(SheetOutcome {
            name,
            rows: output.record_count(),
            shifted_columns,
        });
    }
    writer.finalize()?;
    info!(
        sheet_count = outcomes.len(),
        duration_ms = write_start.elapsed().as_millis(),
        "dataset written"
    );

    let linking_table = config.linking_table_output_path();
    persist_mappings(&mapping, &linking_table)?;
    info!(
        path = %linking_table.display(),
        entries = mapping.len(),
        "linking table written"
    );

    Ok(ShiftReport {
        sheets: outcomes,
        patient_count: patient_ids.len(),
        mapping_len: mapping.len(),
        linking_table,
        reused_linking_table,
    })
}

/// Normalized identifiers of the patient sheet, deduplicated preserving
/// first-seen order. Order matters: it is the draw order of the RNG.
fn collect_patient_ids(sheet: &SheetStructure, id_index: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut identifiers = Vec::new();
    for row in &sheet.rows {
        let Some(identifier) = row.get(id_index).and_then(normalize_identifier) else {
            continue;
        };
        if seen.insert(identifier.clone()) {
            identifiers.push(identifier);
        }
    }
    identifiers
}
