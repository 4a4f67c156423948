//! Lookup context: every reference table behind one read-only value.
//!
//! A `LookupContext` is built once from a `TableBundle` (the JSON produced by
//! the table generator), validated, and then shared by reference across any
//! number of calculations. Nothing in it is mutated after construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    AgeBand, AgeEquivalentsTable, ParsedNumeric, RawToStandardTable, StandardToPercentileTable,
    SumToDomainTable,
};
use crate::error::AppError;

/// All tables as delivered by the generator, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBundle {
    pub age_equivalents: AgeEquivalentsTable,
    /// B-series tables keyed by table id.
    pub raw_to_standard: BTreeMap<String, RawToStandardTable>,
    pub standard_to_percentile: StandardToPercentileTable,
    pub sum_to_domain: SumToDomainTable,
}

/// Validated, read-only table aggregate.
#[derive(Debug, Clone)]
pub struct LookupContext {
    age_equivalents: AgeEquivalentsTable,
    raw_to_standard: BTreeMap<String, RawToStandardTable>,
    standard_to_percentile: StandardToPercentileTable,
    sum_to_domain: SumToDomainTable,
    /// `(band, table id)` sorted by `min_months`.
    bands: Vec<(AgeBand, String)>,
}

impl LookupContext {
    /// Validate a bundle and build the context.
    ///
    /// Fails (exit code 3) when the bundle breaks a structural invariant:
    /// missing/inverted/overlapping age bands, mismatched table ids, range-shaped
    /// A1 ages or C1 percentiles.
    pub fn new(bundle: TableBundle) -> Result<Self, AppError> {
        let TableBundle {
            age_equivalents,
            raw_to_standard,
            standard_to_percentile,
            sum_to_domain,
        } = bundle;

        let bands = collect_bands(&raw_to_standard)?;
        validate_age_equivalents(&age_equivalents)?;
        validate_percentiles(&standard_to_percentile)?;

        log::debug!(
            "lookup context: {} age bands, A1={} rows, C1={} rows, D1={} rows",
            bands.len(),
            age_equivalents.rows.len(),
            standard_to_percentile.rows.len(),
            sum_to_domain.rows.len()
        );

        Ok(Self {
            age_equivalents,
            raw_to_standard,
            standard_to_percentile,
            sum_to_domain,
            bands,
        })
    }

    pub fn age_equivalents(&self) -> &AgeEquivalentsTable {
        &self.age_equivalents
    }

    pub fn raw_to_standard(&self) -> &BTreeMap<String, RawToStandardTable> {
        &self.raw_to_standard
    }

    pub fn standard_to_percentile(&self) -> &StandardToPercentileTable {
        &self.standard_to_percentile
    }

    pub fn sum_to_domain(&self) -> &SumToDomainTable {
        &self.sum_to_domain
    }

    /// Loaded age bands in ascending order, with their table ids.
    pub fn bands(&self) -> impl Iterator<Item = (&AgeBand, &str)> {
        self.bands.iter().map(|(band, id)| (band, id.as_str()))
    }

    /// The single B-series table covering `age_months`, if any.
    pub fn b_table_for_age(&self, age_months: i32) -> Option<&RawToStandardTable> {
        self.bands
            .iter()
            .find(|(band, _)| band.contains(age_months))
            .and_then(|(_, id)| self.raw_to_standard.get(id))
    }
}

fn collect_bands(tables: &BTreeMap<String, RawToStandardTable>) -> Result<Vec<(AgeBand, String)>, AppError> {
    let mut bands = Vec::with_capacity(tables.len());
    for (key, table) in tables {
        if key != &table.table_id {
            return Err(AppError::invalid_tables(format!(
                "Raw-to-standard table keyed '{key}' has tableId '{}'.",
                table.table_id
            )));
        }
        let band = table.age_band().ok_or_else(|| {
            AppError::invalid_tables(format!("Table {} has no age band.", table.table_id))
        })?;
        if band.min_months > band.max_months {
            return Err(AppError::invalid_tables(format!(
                "Table {} has an inverted age band ({}..{}).",
                table.table_id, band.min_months, band.max_months
            )));
        }
        bands.push((band.clone(), table.table_id.clone()));
    }

    bands.sort_by_key(|(band, _)| band.min_months);

    for pair in bands.windows(2) {
        let (prev, prev_id) = &pair[0];
        let (next, next_id) = &pair[1];
        if next.min_months <= prev.max_months {
            return Err(AppError::invalid_tables(format!(
                "Age bands overlap: {prev_id} ({}..{}) and {next_id} ({}..{}).",
                prev.min_months, prev.max_months, next.min_months, next.max_months
            )));
        }
        if next.min_months != prev.max_months + 1 {
            log::warn!(
                "Gap between age bands {prev_id} (ends {}) and {next_id} (starts {}).",
                prev.max_months,
                next.min_months
            );
        }
    }

    Ok(bands)
}

fn validate_age_equivalents(table: &AgeEquivalentsTable) -> Result<(), AppError> {
    for (idx, row) in table.rows.iter().enumerate() {
        if row.age_months.is_range() {
            return Err(AppError::invalid_tables(format!(
                "{} row {}: ageMonths must be exact or bounded, got {}.",
                table.table_id,
                crate::domain::csv_row(idx),
                row.age_months
            )));
        }
    }
    Ok(())
}

fn validate_percentiles(table: &StandardToPercentileTable) -> Result<(), AppError> {
    for (idx, row) in table.rows.iter().enumerate() {
        let bad = row
            .pairs()
            .iter()
            .any(|(_, pct)| pct.is_some_and(ParsedNumeric::is_range));
        if bad {
            return Err(AppError::invalid_tables(format!(
                "{} row {}: percentile ranks must be exact or bounded.",
                table.table_id,
                crate::domain::csv_row(idx)
            )));
        }
    }
    Ok(())
}
