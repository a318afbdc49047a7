//! Patient identifier normalization.
//!
//! The same patient must match across sheets even when a cell carries
//! incidental whitespace or a numeric type. Normalization canonicalizes a
//! raw cell into the string key every mapping lookup uses.

use dateshift_model::CellValue;

/// Canonicalize a raw identifier cell into a patient key.
///
/// Returns `None` for empty, NaN, and whitespace-only inputs; any other
/// scalar is stringified and trimmed. Idempotent: normalizing an already
/// normalized value returns it unchanged.
pub fn normalize_identifier(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(number) if number.is_nan() => None,
        CellValue::Text(text) => normalize_text(text),
        other => normalize_text(&other.display_text()),
    }
}

/// Trim a raw identifier string; empty after trimming means no identifier.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_undefined() {
        assert_eq!(normalize_identifier(&CellValue::Empty), None);
        assert_eq!(normalize_identifier(&CellValue::Text(String::new())), None);
        assert_eq!(
            normalize_identifier(&CellValue::Text("   ".to_string())),
            None
        );
    }

    #[test]
    fn nan_is_undefined() {
        assert_eq!(normalize_identifier(&CellValue::Number(f64::NAN)), None);
    }

    #[test]
    fn strips_surrounding_whitespace() {
        assert_eq!(
            normalize_identifier(&CellValue::Text("  P001  ".to_string())),
            Some("P001".to_string())
        );
    }

    #[test]
    fn numbers_coerce_to_strings() {
        assert_eq!(
            normalize_identifier(&CellValue::Number(12345.0)),
            Some("12345".to_string())
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = CellValue::Text("  P001  ".to_string());
        let once = normalize_identifier(&raw).unwrap();
        let twice = normalize_identifier(&CellValue::Text(once.clone())).unwrap();
        assert_eq!(once, twice);
    }
}
