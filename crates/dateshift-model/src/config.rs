use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, ShiftError};

pub const DEFAULT_MIN_SHIFT_DAYS: i64 = -15;
pub const DEFAULT_MAX_SHIFT_DAYS: i64 = 15;

/// Default linking-table file name when no output path is configured.
pub const DEFAULT_LINKING_TABLE_FILE: &str = "shift_mappings.csv";

/// Shifting rule for one sheet: where its identifiers live, which columns
/// hold dates, and where the header row sits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetRule {
    pub patient_id_column: String,
    pub date_columns: Vec<String>,
    #[serde(default)]
    pub header_row: usize,
}

/// Full configuration surface of a shift run, deserialized once and
/// validated at the pipeline's entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShiftConfig {
    /// Input dataset folder.
    pub input: PathBuf,
    /// Output dataset folder.
    pub output: PathBuf,
    /// Sheet the patient identifiers are read from.
    pub patient_sheet: String,
    /// Identifier column in the patient sheet.
    pub patient_id_column: String,
    /// Per-sheet shifting rules; sheets without a rule pass through verbatim.
    #[serde(default)]
    pub sheets: BTreeMap<String, SheetRule>,
    #[serde(default = "default_min_shift_days")]
    pub min_shift_days: i64,
    #[serde(default = "default_max_shift_days")]
    pub max_shift_days: i64,
    /// Existing linking table to reconcile against, if the file exists.
    #[serde(default)]
    pub linking_table: Option<PathBuf>,
    /// Where the final linking table is written.
    #[serde(default)]
    pub linking_table_output: Option<PathBuf>,
    /// Seed for reproducible offset generation.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Display date format for shifted columns, generic YYYY/MM/DD tokens.
    #[serde(default)]
    pub date_format: Option<String>,
}

fn default_min_shift_days() -> i64 {
    DEFAULT_MIN_SHIFT_DAYS
}

fn default_max_shift_days() -> i64 {
    DEFAULT_MAX_SHIFT_DAYS
}

impl ShiftConfig {
    pub fn rule_for(&self, sheet: &str) -> Option<&SheetRule> {
        self.sheets.get(sheet)
    }

    pub fn linking_table_output_path(&self) -> PathBuf {
        self.linking_table_output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LINKING_TABLE_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_shift_days > self.max_shift_days {
            return Err(ShiftError::InvalidShiftRange {
                min: self.min_shift_days,
                max: self.max_shift_days,
            });
        }
        Ok(())
    }
}
