pub mod applicator;
pub mod dateparse;
pub mod identifier;
pub mod mapping;
pub mod pipeline;

pub use applicator::apply_date_shifts;
pub use dateparse::{parse_date_cell, parse_date_text};
pub use identifier::{normalize_identifier, normalize_text};
pub use mapping::{
    PATIENT_ID_COLUMN, SHIFT_DAYS_COLUMN, generate_mappings, load_mappings, persist_mappings,
    reconcile_mappings, shift_rng,
};
pub use pipeline::{SheetOutcome, ShiftReport, run_pipeline, run_shift};
