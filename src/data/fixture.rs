//! Reduced fixture tables.
//!
//! Same shapes and invariants as the production bundle, far fewer rows:
//!
//! - 17 B-series bands (`B13`..`B29`) partitioning 12..71 months
//! - C1 and D1 laid out as three side-by-side column pairs, like the printed page
//! - A1 with exact, bounded and range cells
//!
//! `B13` (12-14 months) is the band the scoring tests lean on:
//!
//! | raw | cognitive | receptive | expressive |
//! |-----|-----------|-----------|------------|
//! | 0   | <50       | <50       | <50        |
//! | 10  | 60        | 80        | 95         |
//! | 20  | 100       | 120       | 135        |
//! | 30  | 140       | >150      | >150       |
//!
//! Deterministic: no randomness, fixed timestamps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::context::{LookupContext, TableBundle};
use crate::domain::{
    AgeBand, AgeEquivalentRow, AgeEquivalentsTable, DomainRow, ParsedNumeric, PercentileRow,
    RawToStandardRow, RawToStandardTable, SourceMeta, StandardToPercentileTable, SubtestKey,
    SumToDomainTable,
};
use crate::error::AppError;

/// `(first month, last month)` for each band, starting at `B13`.
const BANDS: [(i32, i32); 17] = [
    (12, 14),
    (15, 17),
    (18, 20),
    (21, 23),
    (24, 26),
    (27, 29),
    (30, 32),
    (33, 35),
    (36, 39),
    (40, 43),
    (44, 47),
    (48, 51),
    (52, 55),
    (56, 59),
    (60, 63),
    (64, 67),
    (68, 71),
];

const FLOOR: f64 = 50.0;
const CEILING: f64 = 150.0;

/// 2024-01-01T00:00:00Z
const GENERATED_AT_SECS: i64 = 1_704_067_200;

/// The fixture as a validated context.
pub fn fixture_context() -> Result<LookupContext, AppError> {
    LookupContext::new(fixture_bundle())
}

/// The fixture as an unvalidated bundle (tests mutate this to build bad inputs).
pub fn fixture_bundle() -> TableBundle {
    let raw_to_standard = BANDS
        .iter()
        .enumerate()
        .map(|(idx, &(min, max))| {
            let table = band_table(idx, min, max);
            (table.table_id.clone(), table)
        })
        .collect::<BTreeMap<_, _>>();

    TableBundle {
        age_equivalents: age_equivalents_table(),
        raw_to_standard,
        standard_to_percentile: percentile_table(),
        sum_to_domain: domain_table(),
    }
}

fn meta(table_id: &str, title: &str, page: u32, age_band: Option<AgeBand>) -> SourceMeta {
    SourceMeta {
        table_id: table_id.to_string(),
        title: title.to_string(),
        page: Some(page),
        source_file: format!("fixture/{table_id}.csv"),
        checksum: format!("fixture-{}", table_id.to_ascii_lowercase()),
        generated_at: DateTime::<Utc>::from_timestamp(GENERATED_AT_SECS, 0).unwrap_or_default(),
        generator_version: env!("CARGO_PKG_VERSION").to_string(),
        age_band,
    }
}

fn band_table(idx: usize, min_months: i32, max_months: i32) -> RawToStandardTable {
    let table_id = format!("B{}", 13 + idx);
    let label = format!("{min_months}-{max_months} months");
    let shift = 3.0 * idx as f64;
    let max_raw = 35 + 2 * idx as u32;

    let rows = (0..=max_raw)
        .map(|raw| RawToStandardRow {
            raw_score: raw,
            cognitive: band_score(SubtestKey::Cognitive, raw, shift),
            receptive_language: band_score(SubtestKey::ReceptiveLanguage, raw, shift),
            expressive_language: band_score(SubtestKey::ExpressiveLanguage, raw, shift),
            social_emotional: band_score(SubtestKey::SocialEmotional, raw, shift),
            gross_motor: band_score(SubtestKey::GrossMotor, raw, shift),
            fine_motor: band_score(SubtestKey::FineMotor, raw, shift),
            adaptive_behavior: band_score(SubtestKey::AdaptiveBehavior, raw, shift),
        })
        .collect();

    let band = AgeBand {
        min_months,
        max_months,
        label: label.clone(),
    };
    RawToStandardTable {
        source: meta(
            &table_id,
            &format!("Raw Score to Standard Score, Ages {label}"),
            100 + idx as u32,
            Some(band),
        ),
        table_id,
        rows,
    }
}

fn band_score(subtest: SubtestKey, raw: u32, shift: f64) -> Option<ParsedNumeric> {
    // Social-emotional omits rows whose score repeats the row below, plus raw 0.
    if subtest == SubtestKey::SocialEmotional && (raw == 0 || (21..=23).contains(&raw)) {
        return None;
    }
    if raw == 0 {
        return Some(ParsedNumeric::lt(FLOOR));
    }

    let r = f64::from(raw);
    let score = match subtest {
        SubtestKey::Cognitive => 20.0 + 4.0 * r,
        SubtestKey::ReceptiveLanguage => 40.0 + 4.0 * r,
        SubtestKey::ExpressiveLanguage => 55.0 + 4.0 * r,
        SubtestKey::SocialEmotional => 35.0 + 4.0 * r,
        SubtestKey::GrossMotor => 30.0 + 4.0 * r,
        SubtestKey::FineMotor => 45.0 + 4.0 * r,
        // Two raw scores per step, so adjacent raws share a standard score.
        SubtestKey::AdaptiveBehavior => 60.0 + 5.0 * f64::from(raw / 2),
    } - shift;

    Some(clamp_score(score))
}

fn clamp_score(score: f64) -> ParsedNumeric {
    if score < FLOOR {
        ParsedNumeric::lt(FLOOR)
    } else if score > CEILING {
        ParsedNumeric::gt(CEILING)
    } else {
        ParsedNumeric::exact(score)
    }
}

/// Fixed logistic approximation of the normal curve (mean 100, SD 15).
fn fixture_percentile(score: f64) -> ParsedNumeric {
    let z = (score - 100.0) / 15.0;
    let p = (100.0 / (1.0 + (-1.702 * z).exp())).round();
    if p < 1.0 {
        ParsedNumeric::lt(1.0)
    } else if p > 99.0 {
        ParsedNumeric::gt(99.0)
    } else {
        ParsedNumeric::exact(p)
    }
}

/// Distribute entries column-major over three column pairs.
fn three_columns<T: Clone>(entries: &[T]) -> Vec<[Option<T>; 3]> {
    let n_rows = entries.len().div_ceil(3);
    let mut rows = vec![[None, None, None]; n_rows];
    for (k, entry) in entries.iter().enumerate() {
        rows[k % n_rows][k / n_rows] = Some(entry.clone());
    }
    rows
}

fn percentile_table() -> StandardToPercentileTable {
    let entries: Vec<(ParsedNumeric, ParsedNumeric)> = (50..=150)
        .rev()
        .map(|ss| {
            let ss = f64::from(ss);
            (ParsedNumeric::exact(ss), fixture_percentile(ss))
        })
        .collect();

    let rows = three_columns(&entries)
        .into_iter()
        .map(|[a, b, c]| PercentileRow {
            standard_score1: a.map(|e| e.0),
            percentile_rank1: a.map(|e| e.1),
            standard_score2: b.map(|e| e.0),
            percentile_rank2: b.map(|e| e.1),
            standard_score3: c.map(|e| e.0),
            percentile_rank3: c.map(|e| e.1),
        })
        .collect();

    StandardToPercentileTable {
        table_id: "C1".to_string(),
        source: meta("C1", "Standard Score to Percentile Rank", 130, None),
        rows,
    }
}

fn domain_table() -> SumToDomainTable {
    let mut entries = vec![(ParsedNumeric::lt(99.0), ParsedNumeric::lt(FLOOR))];
    entries.extend((50..=150).map(|c| {
        let c = f64::from(c);
        (ParsedNumeric::range(2.0 * c - 1.0, 2.0 * c), ParsedNumeric::exact(c))
    }));
    entries.push((ParsedNumeric::gt(300.0), ParsedNumeric::gt(CEILING)));

    let rows = three_columns(&entries)
        .into_iter()
        .map(|[a, b, c]| DomainRow {
            sum_range1: a.map(|e| e.0),
            standard_score1: a.map(|e| e.1),
            sum_range2: b.map(|e| e.0),
            standard_score2: b.map(|e| e.1),
            sum_range3: c.map(|e| e.0),
            standard_score3: c.map(|e| e.1),
        })
        .collect();

    SumToDomainTable {
        table_id: "D1".to_string(),
        source: meta("D1", "Sum of Standard Scores to Domain Composite", 132, None),
        rows,
    }
}

fn age_equivalents_table() -> AgeEquivalentsTable {
    let mut rows = Vec::with_capacity(22);

    rows.push(age_row(
        ParsedNumeric::lt(12.0),
        ParsedNumeric::lt(2.0),
        ParsedNumeric::lt(2.0),
        ParsedNumeric::lt(4.0),
    ));
    for j in 1..=20u32 {
        let lo = f64::from(2 * j);
        rows.push(age_row(
            ParsedNumeric::exact(f64::from(12 + 3 * (j - 1))),
            ParsedNumeric::range(lo, lo + 1.0),
            ParsedNumeric::exact(lo),
            ParsedNumeric::range(2.0 * lo, 2.0 * lo + 3.0),
        ));
    }
    rows.push(age_row(
        ParsedNumeric::gt(71.0),
        ParsedNumeric::gt(41.0),
        ParsedNumeric::gt(41.0),
        ParsedNumeric::gt(83.0),
    ));

    AgeEquivalentsTable {
        table_id: "A1".to_string(),
        source: meta("A1", "Age Equivalents", 98, None),
        rows,
    }
}

/// `subtest` fills every subtest column except expressive language, which gets
/// its own (exact-valued) cell; `domain` fills the two domain-total columns.
fn age_row(
    age: ParsedNumeric,
    subtest: ParsedNumeric,
    expressive: ParsedNumeric,
    domain: ParsedNumeric,
) -> AgeEquivalentRow {
    AgeEquivalentRow {
        age_months: age,
        cognitive: Some(subtest),
        communication: Some(domain),
        receptive_language: Some(subtest),
        expressive_language: Some(expressive),
        social_emotional: Some(subtest),
        physical_development: Some(domain),
        gross_motor: Some(subtest),
        fine_motor: Some(subtest),
        adaptive_behavior: Some(subtest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_contiguous() {
        for pair in BANDS.windows(2) {
            assert_eq!(pair[1].0, pair[0].1 + 1);
        }
        assert_eq!(BANDS[0].0, 12);
        assert_eq!(BANDS[16].1, 71);
    }

    #[test]
    fn b13_matches_documented_values() {
        let bundle = fixture_bundle();
        let b13 = &bundle.raw_to_standard["B13"];
        let (_, row10) = b13.row(10).unwrap();
        assert_eq!(row10.cognitive, Some(ParsedNumeric::exact(60.0)));
        assert_eq!(row10.expressive_language, Some(ParsedNumeric::exact(95.0)));
        let (_, row30) = b13.row(30).unwrap();
        assert_eq!(row30.receptive_language, Some(ParsedNumeric::gt(150.0)));
    }

    #[test]
    fn c1_maps_mean_to_fiftieth() {
        assert_eq!(fixture_percentile(100.0), ParsedNumeric::exact(50.0));
        assert_eq!(fixture_percentile(50.0), ParsedNumeric::lt(1.0));
    }

    #[test]
    fn three_columns_is_column_major() {
        let rows = three_columns(&[1, 2, 3, 4, 5]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], [Some(1), Some(3), Some(5)]);
        assert_eq!(rows[1], [Some(2), Some(4), None]);
    }
}
