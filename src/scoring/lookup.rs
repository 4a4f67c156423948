//! Single-table forward lookups.
//!
//! Each lookup returns a `ValueWithProvenance`; misses are values with a note,
//! never errors. When a specific table was searched and nothing matched, the
//! result carries one failure step (`csv_row: None`) naming that table.

use crate::context::LookupContext;
use crate::domain::{
    AgeEquivalentColumn, ParsedAgeMonths, ParsedNumeric, ParsedPercentile, ParsedScore,
    ProvenanceStep, RawToStandardTable, SubtestKey, ValueWithProvenance, csv_row,
};

/// Raw score → standard score via the age-banded B-series table.
///
/// Raw scores above the table's highest row are clamped to it (success plus an
/// advisory note). An empty cell falls back to the nearest lower raw score with
/// a value, because the printed tables omit rows whose score does not change.
pub fn lookup_standard_score(
    raw_score: u32,
    subtest: SubtestKey,
    age_months: i32,
    ctx: &LookupContext,
) -> ValueWithProvenance<ParsedScore> {
    let Some(table) = ctx.b_table_for_age(age_months) else {
        return ValueWithProvenance::missing(format!("No table for age {age_months} months"));
    };
    let label = subtest.label();

    let (used_raw, index, row, clamp_note) = match table.row(raw_score) {
        Some((index, row)) => (raw_score, index, row, None),
        None => match table.max_row() {
            Some((index, row)) if raw_score > row.raw_score => {
                let max = row.raw_score;
                log::debug!("{}: raw {raw_score} clamped to table max {max}", table.table_id);
                let note = format!("Raw score {raw_score} exceeds table max ({max}). Using {max} instead.");
                (max, index, row, Some(note))
            }
            _ => {
                let step = ProvenanceStep::failure(
                    &table.source,
                    format!("{label}: no row for raw score {raw_score}"),
                );
                return ValueWithProvenance::failed(
                    step,
                    format!("Raw score {raw_score} not found in {}", table.table_id),
                );
            }
        },
    };

    let (source_raw, source_index, value) = match row.score(subtest) {
        Some(value) => (used_raw, index, *value),
        None => match nearest_lower_score(table, subtest, used_raw) {
            Some(found) => {
                log::debug!(
                    "{}: {} empty at raw {used_raw}, using raw {}",
                    table.table_id,
                    subtest.key(),
                    found.0
                );
                found
            }
            None => {
                let step = ProvenanceStep::lookup(
                    &table.source,
                    csv_row(index),
                    format!("{label}: Raw Score {used_raw} → no standard score"),
                );
                return ValueWithProvenance::failed(
                    step,
                    format!(
                        "Standard score not available for {} at raw {raw_score}",
                        subtest.key()
                    ),
                );
            }
        },
    };

    let mut description = format!("{label}: Raw Score {used_raw}");
    if used_raw != raw_score {
        description.push_str(&format!(" (entered {raw_score})"));
    }
    if source_raw != used_raw {
        description.push_str(&format!(" (value from raw {source_raw})"));
    }
    description.push_str(&format!(" → Standard Score {value}"));

    let result = ValueWithProvenance::found(
        value,
        ProvenanceStep::lookup(&table.source, csv_row(source_index), description),
    );
    match clamp_note {
        Some(note) => result.with_note(note),
        None => result,
    }
}

/// Nearest raw score strictly below `from` whose cell for `subtest` has a value.
fn nearest_lower_score(
    table: &RawToStandardTable,
    subtest: SubtestKey,
    from: u32,
) -> Option<(u32, usize, ParsedScore)> {
    (0..from).rev().find_map(|raw| {
        let (index, row) = table.row(raw)?;
        row.score(subtest).map(|value| (raw, index, *value))
    })
}

/// Standard score → percentile rank via C1.
///
/// Only exact or bounded standard scores are accepted. A bounded input turns an
/// exact percentile into a bounded one in the same direction.
pub fn lookup_percentile(
    standard_score: &ParsedScore,
    ctx: &LookupContext,
) -> ValueWithProvenance<ParsedPercentile> {
    let (bound, value) = match *standard_score {
        ParsedNumeric::Range { .. } => {
            return ValueWithProvenance::missing(
                "Percentile lookup requires an exact or bounded standard score",
            );
        }
        ParsedNumeric::Exact { value } => (None, value),
        ParsedNumeric::Bounded { bound, value } => (Some(bound), value),
    };

    let table = ctx.standard_to_percentile();
    for (index, row) in table.rows.iter().enumerate() {
        for (score, percentile) in row.pairs() {
            let (Some(score), Some(percentile)) = (score, percentile) else {
                continue;
            };
            if score.is_range() || score.numeric_value() != value {
                continue;
            }

            let percentile = match (bound, *percentile) {
                (Some(bound), ParsedNumeric::Exact { value }) => ParsedNumeric::Bounded { bound, value },
                (_, other) => other,
            };
            let symbol = bound.map(|b| b.symbol()).unwrap_or("");
            let step = ProvenanceStep::lookup(
                &table.source,
                csv_row(index),
                format!("Standard Score {symbol}{value} → Percentile {percentile}"),
            );
            return ValueWithProvenance::found(percentile, step);
        }
    }

    ValueWithProvenance::failed(
        ProvenanceStep::failure(&table.source, format!("Standard Score {standard_score} → no percentile")),
        format!("Standard score {value} not found in {}", table.table_id),
    )
}

/// Raw score → age equivalent via A1. Independent of the child's age.
pub fn lookup_age_equivalent(
    raw_score: u32,
    column: AgeEquivalentColumn,
    ctx: &LookupContext,
) -> ValueWithProvenance<ParsedAgeMonths> {
    let table = ctx.age_equivalents();
    let raw = f64::from(raw_score);

    let hit = table.rows.iter().enumerate().find_map(|(index, row)| {
        row.cell(column)
            .filter(|cell| cell.contains(raw))
            .map(|cell| (index, cell, row.age_months))
    });

    match hit {
        Some((index, cell, age)) => ValueWithProvenance::found(
            age,
            ProvenanceStep::lookup(
                &table.source,
                csv_row(index),
                format!(
                    "{}: Raw Score {raw_score} (row {cell}) → Age Equivalent {age} months",
                    column.label()
                ),
            ),
        ),
        None => ValueWithProvenance::failed(
            ProvenanceStep::failure(
                &table.source,
                format!("{}: Raw Score {raw_score} → no age equivalent", column.label()),
            ),
            format!("Raw score {raw_score} not found in {} for {}", table.table_id, column.label()),
        ),
    }
}

/// Sum of two subtest standard scores → domain composite via D1.
pub fn lookup_domain_composite(sum: f64, ctx: &LookupContext) -> ValueWithProvenance<ParsedScore> {
    let table = ctx.sum_to_domain();

    let hit = table.rows.iter().enumerate().find_map(|(index, row)| {
        row.pairs().into_iter().find_map(|(range, score)| match (range, score) {
            (Some(range), Some(score)) if range.contains(sum) => Some((index, *range, *score)),
            _ => None,
        })
    });

    match hit {
        Some((index, range, score)) => ValueWithProvenance::found(
            score,
            ProvenanceStep::lookup(
                &table.source,
                csv_row(index),
                format!("Sum {sum} (row {range}) → Composite Standard Score {score}"),
            ),
        ),
        None => ValueWithProvenance::failed(
            ProvenanceStep::failure(&table.source, format!("Sum {sum} → no composite")),
            format!("Sum {sum} not found in {}", table.table_id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture;

    fn ctx() -> LookupContext {
        fixture::fixture_context().unwrap()
    }

    #[test]
    fn standard_score_single_step() {
        let ctx = ctx();
        let r = lookup_standard_score(10, SubtestKey::Cognitive, 12, &ctx);
        assert_eq!(r.value, Some(ParsedNumeric::exact(60.0)));
        assert_eq!(r.steps.len(), 1);
        assert_eq!(r.steps[0].table_id, "B13");
        assert_eq!(r.steps[0].csv_row, Some(12));
        assert!(r.note.is_none());
    }

    #[test]
    fn out_of_range_age_has_no_steps() {
        let ctx = ctx();
        let r = lookup_standard_score(10, SubtestKey::Cognitive, 80, &ctx);
        assert!(r.value.is_none());
        assert!(r.steps.is_empty());
        assert_eq!(r.note.as_deref(), Some("No table for age 80 months"));
    }

    #[test]
    fn raw_above_max_is_clamped() {
        let ctx = ctx();
        let r = lookup_standard_score(99, SubtestKey::Cognitive, 12, &ctx);
        let max = lookup_standard_score(35, SubtestKey::Cognitive, 12, &ctx);
        assert_eq!(r.value, max.value);
        assert_eq!(
            r.note.as_deref(),
            Some("Raw score 99 exceeds table max (35). Using 35 instead.")
        );
        assert!(r.steps[0].description.as_deref().unwrap().contains("entered 99"));
    }

    #[test]
    fn interior_gap_is_not_found() {
        let mut bundle = fixture::fixture_bundle();
        bundle.raw_to_standard.get_mut("B13").unwrap().rows.retain(|r| r.raw_score != 5);
        let ctx = LookupContext::new(bundle).unwrap();
        let r = lookup_standard_score(5, SubtestKey::Cognitive, 12, &ctx);
        assert!(r.value.is_none());
        assert_eq!(r.note.as_deref(), Some("Raw score 5 not found in B13"));
        assert!(r.steps[0].is_failure());
    }

    #[test]
    fn empty_cell_uses_nearest_lower_raw() {
        let ctx = ctx();
        let r = lookup_standard_score(22, SubtestKey::SocialEmotional, 12, &ctx);
        // raw 20: 35 + 80
        assert_eq!(r.value, Some(ParsedNumeric::exact(115.0)));
        assert_eq!(r.steps[0].csv_row, Some(22));
    }

    #[test]
    fn empty_cell_with_nothing_below_fails_with_step() {
        let ctx = ctx();
        let r = lookup_standard_score(0, SubtestKey::SocialEmotional, 12, &ctx);
        assert!(r.value.is_none());
        assert_eq!(
            r.note.as_deref(),
            Some("Standard score not available for socialEmotional at raw 0")
        );
        assert_eq!(r.steps.len(), 1);
        assert_eq!(r.steps[0].csv_row, Some(2));
    }

    #[test]
    fn percentile_for_mean_score() {
        let ctx = ctx();
        let r = lookup_percentile(&ParsedNumeric::exact(100.0), &ctx);
        assert_eq!(r.value, Some(ParsedNumeric::exact(50.0)));
        assert_eq!(r.steps[0].table_id, "C1");
        assert_eq!(
            r.steps[0].description.as_deref(),
            Some("Standard Score 100 → Percentile 50")
        );
    }

    #[test]
    fn bounded_score_bounds_the_percentile() {
        let ctx = ctx();
        let r = lookup_percentile(&ParsedNumeric::gt(120.0), &ctx);
        let exact = lookup_percentile(&ParsedNumeric::exact(120.0), &ctx);
        let p = exact.value.unwrap().numeric_value();
        assert_eq!(r.value, Some(ParsedNumeric::gt(p)));
        assert!(r.steps[0].description.as_deref().unwrap().starts_with("Standard Score >120"));
    }

    #[test]
    fn bounded_percentile_cell_is_kept() {
        let ctx = ctx();
        let r = lookup_percentile(&ParsedNumeric::lt(50.0), &ctx);
        assert_eq!(r.value, Some(ParsedNumeric::lt(1.0)));
    }

    #[test]
    fn range_score_is_rejected() {
        let ctx = ctx();
        let r = lookup_percentile(&ParsedNumeric::range(90.0, 95.0), &ctx);
        assert!(r.value.is_none());
        assert!(r.steps.is_empty());
        assert_eq!(
            r.note.as_deref(),
            Some("Percentile lookup requires an exact or bounded standard score")
        );
    }

    #[test]
    fn unknown_score_not_found_in_c1() {
        let ctx = ctx();
        let r = lookup_percentile(&ParsedNumeric::exact(175.0), &ctx);
        assert_eq!(r.note.as_deref(), Some("Standard score 175 not found in C1"));
        assert!(r.steps[0].is_failure());
    }

    #[test]
    fn age_equivalent_matches_each_shape() {
        let ctx = ctx();
        let range = lookup_age_equivalent(10, AgeEquivalentColumn::Cognitive, &ctx);
        assert_eq!(range.value, Some(ParsedNumeric::exact(24.0)));

        let floor = lookup_age_equivalent(0, AgeEquivalentColumn::Cognitive, &ctx);
        assert_eq!(floor.value, Some(ParsedNumeric::lt(12.0)));

        let ceiling = lookup_age_equivalent(50, AgeEquivalentColumn::Cognitive, &ctx);
        assert_eq!(ceiling.value, Some(ParsedNumeric::gt(71.0)));

        let exact = lookup_age_equivalent(10, AgeEquivalentColumn::ExpressiveLanguage, &ctx);
        assert_eq!(exact.value, Some(ParsedNumeric::exact(24.0)));
    }

    #[test]
    fn age_equivalent_miss_records_failure_step() {
        let ctx = ctx();
        let r = lookup_age_equivalent(11, AgeEquivalentColumn::ExpressiveLanguage, &ctx);
        assert!(r.value.is_none());
        assert_eq!(r.steps.len(), 1);
        assert_eq!(r.steps[0].table_id, "A1");
        assert!(r.steps[0].is_failure());
    }

    #[test]
    fn composite_range_match() {
        let ctx = ctx();
        let r = lookup_domain_composite(199.0, &ctx);
        assert_eq!(r.value, Some(ParsedNumeric::exact(100.0)));
        let low = lookup_domain_composite(40.0, &ctx);
        assert_eq!(low.value, Some(ParsedNumeric::lt(50.0)));
    }

    #[test]
    fn composite_miss() {
        let mut bundle = fixture::fixture_bundle();
        bundle.sum_to_domain.rows.truncate(1);
        let ctx = LookupContext::new(bundle).unwrap();
        let r = lookup_domain_composite(245.0, &ctx);
        assert!(r.value.is_none());
        assert_eq!(r.note.as_deref(), Some("Sum 245 not found in D1"));
        assert!(r.steps[0].is_failure());
    }
}
