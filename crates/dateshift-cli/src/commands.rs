use std::fs;

use anyhow::{Context, Result};
use tracing::info_span;

use dateshift_core::pipeline::{ShiftReport, run_shift as run_shift_pipeline};
use dateshift_ingest::csv_folder::CsvFolderWriter;
use dateshift_ingest::provider::DatasetWriter;
use dateshift_model::ShiftConfig;
use dateshift_report::scan::{ScanOptions, ScanSummary, generate_scan_report};

use crate::cli::{ScanArgs, ShiftArgs};

pub fn run_shift(args: &ShiftArgs) -> Result<ShiftReport> {
    let raw = fs::read_to_string(&args.config)
        .with_context(|| format!("read config: {}", args.config.display()))?;
    let mut config: ShiftConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parse config: {}", args.config.display()))?;
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(linking_table) = &args.linking_table {
        config.linking_table = Some(linking_table.clone());
    }
    if let Some(linking_table_output) = &args.linking_table_output {
        config.linking_table_output = Some(linking_table_output.clone());
    }

    let report = run_shift_pipeline(&config)
        .with_context(|| format!("shift dataset: {}", config.input.display()))?;
    Ok(report)
}

pub fn run_scan(args: &ScanArgs) -> Result<ScanSummary> {
    let span = info_span!("scan", file_count = args.files.len());
    let _guard = span.enter();
    let options = ScanOptions {
        min_cell_count: args.min_cell_count,
    };
    let mut writer = CsvFolderWriter::create(&args.output);
    let summary = generate_scan_report(&args.files, &mut writer, &options)
        .context("generate scan report")?;
    writer
        .finalize()
        .with_context(|| format!("write scan report: {}", args.output.display()))?;
    Ok(summary)
}
