use std::collections::BTreeMap;

/// One persisted linking-table row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftEntry {
    pub patient_id: String,
    pub shift_days: i64,
}

/// Ordered patient-to-offset mapping.
///
/// Identifiers are unique; on conflict the first inserted offset wins.
/// Entry order is preserved because it determines the draw order of the
/// random source, which the reproducibility contract depends on.
#[derive(Debug, Clone, Default)]
pub struct ShiftMapping {
    entries: Vec<ShiftEntry>,
    index: BTreeMap<String, i64>,
}

impl ShiftMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; returns false if the identifier is already mapped.
    pub fn insert(&mut self, patient_id: String, shift_days: i64) -> bool {
        if self.index.contains_key(&patient_id) {
            return false;
        }
        self.index.insert(patient_id.clone(), shift_days);
        self.entries.push(ShiftEntry {
            patient_id,
            shift_days,
        });
        true
    }

    /// Day offset for an identifier, if mapped.
    pub fn offset_for(&self, patient_id: &str) -> Option<i64> {
        self.index.get(patient_id).copied()
    }

    pub fn contains(&self, patient_id: &str) -> bool {
        self.index.contains_key(patient_id)
    }

    pub fn entries(&self) -> &[ShiftEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
