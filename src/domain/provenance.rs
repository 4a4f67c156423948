//! Audit trail attached to every derived value.

use serde::{Deserialize, Serialize};

use crate::domain::tables::SourceMeta;

/// One lookup that contributed to a derived value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceStep {
    pub table_id: String,
    /// 1-based CSV line of the row used; `None` for a failed lookup.
    pub csv_row: Option<usize>,
    pub source: SourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProvenanceStep {
    pub fn lookup(source: &SourceMeta, csv_row: usize, description: impl Into<String>) -> Self {
        Self {
            table_id: source.table_id.clone(),
            csv_row: Some(csv_row),
            source: source.clone(),
            description: Some(description.into()),
        }
    }

    /// Marker for an attempted lookup that found nothing.
    pub fn failure(source: &SourceMeta, description: impl Into<String>) -> Self {
        Self {
            table_id: source.table_id.clone(),
            csv_row: None,
            source: source.clone(),
            description: Some(description.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.csv_row.is_none()
    }
}

/// A value (or its absence) plus the lookups that produced it.
///
/// `note` may be set on success too (e.g. a clamped raw score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueWithProvenance<T> {
    pub value: Option<T>,
    pub steps: Vec<ProvenanceStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl<T> Default for ValueWithProvenance<T> {
    fn default() -> Self {
        Self {
            value: None,
            steps: Vec::new(),
            note: None,
        }
    }
}

impl<T> ValueWithProvenance<T> {
    pub fn found(value: T, step: ProvenanceStep) -> Self {
        Self {
            value: Some(value),
            steps: vec![step],
            note: None,
        }
    }

    /// No value and no table to attribute the miss to.
    pub fn missing(note: impl Into<String>) -> Self {
        Self {
            value: None,
            steps: Vec::new(),
            note: Some(note.into()),
        }
    }

    /// No value, with a failure step naming the table that was searched.
    pub fn failed(step: ProvenanceStep, note: impl Into<String>) -> Self {
        Self {
            value: None,
            steps: vec![step],
            note: Some(note.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Prepend earlier steps so the trail reads in lookup order.
    pub fn with_prefix(mut self, prefix: &[ProvenanceStep]) -> Self {
        if !prefix.is_empty() {
            let mut steps = prefix.to_vec();
            steps.append(&mut self.steps);
            self.steps = steps;
        }
        self
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueWithProvenance<U> {
        ValueWithProvenance {
            value: self.value.map(f),
            steps: self.steps,
            note: self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meta(id: &str) -> SourceMeta {
        SourceMeta {
            table_id: id.to_string(),
            title: format!("Table {id}"),
            page: Some(1),
            source_file: format!("{id}.csv"),
            checksum: "abc".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            generator_version: "1.0.0".to_string(),
            age_band: None,
        }
    }

    #[test]
    fn prefix_keeps_lookup_order() {
        let first = ProvenanceStep::lookup(&meta("B13"), 5, "raw");
        let second = ProvenanceStep::lookup(&meta("C1"), 9, "pct");
        let v = ValueWithProvenance::found(50.0, second.clone()).with_prefix(&[first.clone()]);
        assert_eq!(v.steps, vec![first, second]);
    }

    #[test]
    fn failure_step_has_no_row() {
        let step = ProvenanceStep::failure(&meta("C1"), "nothing");
        assert!(step.is_failure());
        assert_eq!(step.table_id, "C1");
        let v: ValueWithProvenance<f64> = ValueWithProvenance::failed(step, "not found");
        assert!(!v.is_found());
        assert_eq!(v.note.as_deref(), Some("not found"));
    }
}
