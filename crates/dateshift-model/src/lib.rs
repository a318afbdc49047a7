pub mod cell;
pub mod config;
pub mod error;
pub mod mapping;
pub mod structure;

pub use cell::CellValue;
pub use config::{
    DEFAULT_LINKING_TABLE_FILE, DEFAULT_MAX_SHIFT_DAYS, DEFAULT_MIN_SHIFT_DAYS, SheetRule,
    ShiftConfig,
};
pub use error::{Result, ShiftError};
pub use mapping::{ShiftEntry, ShiftMapping};
pub use structure::SheetStructure;
