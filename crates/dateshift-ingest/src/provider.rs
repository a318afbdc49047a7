//! Abstract access to multi-table dataset containers.
//!
//! The shifting pipeline never touches a concrete container format; it
//! consumes these two traits. The CSV folder backend in `csv_folder`
//! implements both.

use dateshift_model::{CellValue, Result};

/// Order-preserving read access to the tables of a container.
pub trait DatasetReader {
    /// Sheet names in the container's enumeration order.
    fn sheet_names(&self) -> &[String];

    /// All rows of the named sheet as raw cell values.
    fn read_sheet(&self, name: &str) -> Result<Vec<Vec<CellValue>>>;
}

/// Cell-addressed write access to a container under construction.
///
/// The writer owns the destination for the duration of a run; nothing is
/// durable until `finalize` flushes every buffered sheet.
pub trait DatasetWriter {
    /// Register a sheet so it exists in the output even when no cell is
    /// ever written to it.
    fn open_sheet(&mut self, sheet: &str);

    fn write_cell(&mut self, sheet: &str, row: usize, col: usize, value: CellValue);

    /// Tag a cell with a display date format, given in the generic
    /// YYYY/MM/DD token syntax. Backends translate to their native tokens.
    fn set_cell_format(&mut self, sheet: &str, row: usize, col: usize, format: &str);

    /// Flush every buffered sheet to the destination.
    fn finalize(self) -> Result<()>
    where
        Self: Sized;
}
