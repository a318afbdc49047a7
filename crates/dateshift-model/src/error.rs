use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset folder not found: {path}")]
    FolderNotFound { path: PathBuf },
    #[error("sheet '{sheet}' not found in dataset")]
    SheetNotFound { sheet: String },
    #[error("patient id column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },
    #[error("linking table {path} is missing required column '{column}'")]
    LinkingTableFormat { path: PathBuf, column: String },
    #[error("invalid shift range: min {min} exceeds max {max}")]
    InvalidShiftRange { min: i64, max: i64 },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ShiftError>;
