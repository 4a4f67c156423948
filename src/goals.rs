//! Reverse lookups for goal planning.
//!
//! Inverts the forward chain: target percentile → standard score (C1), then
//! standard score → minimum raw score per subtest (B-series for the child's age).
//!
//! Two raw-score selection policies exist and give different answers when the
//! target standard score is not printed for a subtest; see `ReverseStrategy`.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::context::LookupContext;
use crate::domain::{
    GoalPlan, ParsedScore, ProvenanceStep, RawToStandardTable, SubtestKey, ValueWithProvenance,
    csv_row,
};

/// How a target standard score is turned into a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ReverseStrategy {
    /// Only rows whose exact score equals the target; smallest raw score wins.
    #[value(name = "exact")]
    ExactMinRaw,
    /// Rows whose exact score is at or below the target; the highest such
    /// score wins, ties go to the smallest raw score.
    #[value(name = "closest")]
    ClosestAtOrBelow,
}

/// Target percentile → standard score via C1.
///
/// Only exact percentile cells match; the first hit in row order, then column
/// pair order, wins.
pub fn lookup_standard_score_from_percentile(
    target_percentile: f64,
    ctx: &LookupContext,
) -> ValueWithProvenance<ParsedScore> {
    let table = ctx.standard_to_percentile();

    let hit = table.rows.iter().enumerate().find_map(|(index, row)| {
        row.pairs().into_iter().find_map(|(score, percentile)| {
            let score = score?;
            (percentile?.exact_value()? == target_percentile).then_some((index, *score))
        })
    });

    match hit {
        Some((index, score)) => ValueWithProvenance::found(
            score,
            ProvenanceStep::lookup(
                &table.source,
                csv_row(index),
                format!("Percentile {target_percentile} → Standard Score {score}"),
            ),
        ),
        None => ValueWithProvenance::failed(
            ProvenanceStep::failure(
                &table.source,
                format!("Percentile {target_percentile} → no standard score"),
            ),
            format!("Percentile {target_percentile} not found in {}", table.table_id),
        ),
    }
}

/// Target standard score → raw score for one subtest at the child's age.
pub fn lookup_raw_score_from_standard_score(
    target_standard_score: f64,
    subtest: SubtestKey,
    age_months: i32,
    strategy: ReverseStrategy,
    ctx: &LookupContext,
) -> ValueWithProvenance<u32> {
    let Some(table) = ctx.b_table_for_age(age_months) else {
        return ValueWithProvenance::missing(format!("No table for age {age_months} months"));
    };

    log::debug!(
        "{}: reverse {} for standard score {target_standard_score} ({strategy:?})",
        table.table_id,
        subtest.key()
    );
    match strategy {
        ReverseStrategy::ExactMinRaw => exact_min_raw(table, subtest, target_standard_score),
        ReverseStrategy::ClosestAtOrBelow => {
            closest_at_or_below(table, subtest, target_standard_score, age_months)
        }
    }
}

/// `(index, raw score, exact standard score)` for every row with an exact cell.
fn exact_cells(table: &RawToStandardTable, subtest: SubtestKey) -> impl Iterator<Item = (usize, u32, f64)> + '_ {
    table.rows.iter().enumerate().filter_map(move |(index, row)| {
        let score = row.score(subtest)?.exact_value()?;
        Some((index, row.raw_score, score))
    })
}

fn exact_min_raw(table: &RawToStandardTable, subtest: SubtestKey, target: f64) -> ValueWithProvenance<u32> {
    let label = subtest.label();
    let best = exact_cells(table, subtest)
        .filter(|&(_, _, score)| score == target)
        .min_by_key(|&(_, raw, _)| raw);

    match best {
        Some((index, raw, _)) => ValueWithProvenance::found(
            raw,
            ProvenanceStep::lookup(
                &table.source,
                csv_row(index),
                format!("{label}: Standard Score {target} → Raw Score {raw}"),
            ),
        ),
        None => ValueWithProvenance::failed(
            ProvenanceStep::failure(
                &table.source,
                format!("{label}: no raw score maps exactly to Standard Score {target}"),
            ),
            format!("Standard score {target} not found for {label} in {}", table.table_id),
        ),
    }
}

fn closest_at_or_below(
    table: &RawToStandardTable,
    subtest: SubtestKey,
    target: f64,
    age_months: i32,
) -> ValueWithProvenance<u32> {
    let label = subtest.label();
    let best = exact_cells(table, subtest)
        .filter(|&(_, _, score)| score <= target)
        .fold(None::<(usize, u32, f64)>, |best, cand| match best {
            None => Some(cand),
            Some(b) if cand.2 > b.2 || (cand.2 == b.2 && cand.1 < b.1) => Some(cand),
            keep => keep,
        });

    match best {
        Some((index, raw, score)) => {
            let mut description = format!("{label}: Standard Score {target} → Raw Score {raw}");
            if score != target {
                description.push_str(&format!(" (closest available: {score})"));
            }
            ValueWithProvenance::found(raw, ProvenanceStep::lookup(&table.source, csv_row(index), description))
        }
        None => {
            let band = table
                .age_band()
                .map(|b| b.label.as_str())
                .unwrap_or("unknown band");
            ValueWithProvenance::failed(
                ProvenanceStep::failure(
                    &table.source,
                    format!(
                        "{label}: no raw score in {} ({band}) reaches Standard Score {target} or below",
                        table.table_id
                    ),
                ),
                format!("Standard score {target} is not achievable for {label} at age {age_months} months"),
            )
        }
    }
}

/// Raw scores each subtest needs to reach `target_percentile`.
///
/// The percentile step(s) precede each subtest's own step(s). One subtest
/// failing does not affect the others.
pub fn plan_goals(
    target_percentile: f64,
    age_months: i32,
    subtests: &[SubtestKey],
    strategy: ReverseStrategy,
    ctx: &LookupContext,
) -> GoalPlan {
    let standard_score = lookup_standard_score_from_percentile(target_percentile, ctx);

    let raw_scores: BTreeMap<SubtestKey, ValueWithProvenance<u32>> = subtests
        .iter()
        .map(|&subtest| {
            let result = match &standard_score.value {
                Some(score) => lookup_raw_score_from_standard_score(
                    score.numeric_value(),
                    subtest,
                    age_months,
                    strategy,
                    ctx,
                )
                .with_prefix(&standard_score.steps),
                None => ValueWithProvenance {
                    value: None,
                    steps: standard_score.steps.clone(),
                    note: standard_score.note.clone(),
                },
            };
            (subtest, result)
        })
        .collect();

    GoalPlan {
        age_months,
        target_percentile,
        standard_score,
        raw_scores,
    }
}
