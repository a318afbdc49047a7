//! Heuristic date parsing for loosely formatted feeds.
//!
//! Input cells range from native date values over a handful of known string
//! layouts to placeholder tokens meaning "no date". Parsing never fails; a
//! value that cannot be read as a calendar date degrades to absent.

use chrono::{NaiveDate, NaiveDateTime};

use dateshift_model::CellValue;

/// Tokens that mean "no date" in source feeds, matched case-insensitively
/// after trimming. "unkown" is a recurring typo in real exports.
const PLACEHOLDER_DATES: [&str; 6] = ["unknown", "unk", "unkown", "n/a", "none", "null"];

/// Explicit formats tried in order. Year-day-month comes before the
/// day-first layouts so a feed value like "2023-15-01" resolves without
/// guessing: 15 cannot be a month, so the first format that yields a valid
/// calendar date wins.
const EXPLICIT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%d-%m", "%d-%m-%Y", "%m-%d-%Y"];

/// Parse a raw cell into a calendar date, or absent.
///
/// Time components are always discarded; the output never carries one.
pub fn parse_date_cell(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(date) => Some(*date),
        CellValue::DateTime(datetime) => Some(datetime.date()),
        CellValue::Text(raw) => parse_date_text(raw),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

/// Parse a date string: placeholders and blanks are absent, then the
/// explicit formats in order, then a permissive day-first fallback.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return None;
    }
    for format in EXPLICIT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    parse_dayfirst(trimmed)
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_DATES
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

/// Permissive fallback for strings outside the explicit formats. Day-first
/// orderings are tried before month-first, matching the upstream feeds.
fn parse_dayfirst(value: &str) -> Option<NaiveDate> {
    let date_formats = [
        "%d/%m/%Y",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%d-%b-%Y",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%Y-%b-%d",
        "%Y%m%d",
    ];
    for format in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for format in datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    None
}
