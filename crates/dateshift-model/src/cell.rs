#![deny(unsafe_code)]

use chrono::{NaiveDate, NaiveDateTime};

/// A single cell as exposed by a dataset container.
///
/// CSV containers only produce `Text` and `Empty`; the date and numeric
/// variants exist for containers with typed cells and are honored by the
/// date parser and identifier normalizer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text form of the cell; dates use ISO formatting.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Integral values render without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
