//! Per-child scoring: every subtest, then the two domain composites.

use std::collections::BTreeMap;

use crate::context::LookupContext;
use crate::domain::{
    Bound, CalculationResult, DomainKey, DomainResult, DomainResults, ParsedNumeric,
    ParsedPercentile, ParsedScore, ProvenanceStep, ScoreInput, SubtestKey, SubtestResult, SumKind,
    SumValue, ValueWithProvenance,
};
use crate::scoring::lookup::{
    lookup_age_equivalent, lookup_domain_composite, lookup_percentile, lookup_standard_score,
};

/// Score every subtest and both domains for one child.
pub fn calculate_all_scores(input: &ScoreInput, ctx: &LookupContext) -> CalculationResult {
    let subtests: BTreeMap<SubtestKey, SubtestResult> = SubtestKey::ALL
        .iter()
        .map(|&key| {
            let result = calculate_subtest_result(key, input.raw(key), input.age_months, ctx);
            (key, result)
        })
        .collect();

    let domains = DomainResults {
        communication: calculate_domain_result(DomainKey::Communication, &subtests, ctx),
        physical: calculate_domain_result(DomainKey::Physical, &subtests, ctx),
    };

    CalculationResult {
        age_months: input.age_months,
        subtests,
        domains,
    }
}

/// Standard score, percentile and age equivalent for one subtest.
///
/// A missing raw score short-circuits to an empty result.
pub fn calculate_subtest_result(
    subtest: SubtestKey,
    raw_score: Option<u32>,
    age_months: i32,
    ctx: &LookupContext,
) -> SubtestResult {
    let Some(raw) = raw_score else {
        return SubtestResult::default();
    };

    let standard_score = lookup_standard_score(raw, subtest, age_months, ctx);
    let percentile = chain_percentile(&standard_score, ctx);
    let age_equivalent = lookup_age_equivalent(raw, subtest.age_equivalent_column(), ctx);

    SubtestResult {
        raw_score: Some(raw),
        standard_score,
        percentile,
        age_equivalent,
    }
}

/// Percentile for an already-derived standard score, with its steps in front.
pub fn chain_percentile(
    standard_score: &ValueWithProvenance<ParsedScore>,
    ctx: &LookupContext,
) -> ValueWithProvenance<ParsedPercentile> {
    match &standard_score.value {
        Some(score) => lookup_percentile(score, ctx).with_prefix(&standard_score.steps),
        None => ValueWithProvenance::missing(
            standard_score
                .note
                .clone()
                .unwrap_or_else(|| "No standard score available".to_string()),
        ),
    }
}

/// Bound-aware sum of two standard scores.
///
/// - exact + exact → exact
/// - `<a` + `<b` → `<a+b`, `>a` + `>b` → `>a+b`
/// - `<a` + `>b` → `>b` (only the lower bound survives)
/// - exact + bounded → bounded in the same direction
/// - anything missing or range-shaped → `None`
pub fn compute_domain_sum(a: Option<&ParsedScore>, b: Option<&ParsedScore>) -> Option<SumValue> {
    use ParsedNumeric::{Bounded, Exact};

    let sum = match (*a?, *b?) {
        (Exact { value: x }, Exact { value: y }) => SumValue::exact(x + y),
        (Bounded { bound: Bound::Lt, value: x }, Bounded { bound: Bound::Lt, value: y }) => SumValue::lt(x + y),
        (Bounded { bound: Bound::Gt, value: x }, Bounded { bound: Bound::Gt, value: y }) => SumValue::gt(x + y),
        (Bounded { bound: Bound::Lt, .. }, Bounded { bound: Bound::Gt, value })
        | (Bounded { bound: Bound::Gt, value }, Bounded { bound: Bound::Lt, .. }) => SumValue::gt(value),
        (Exact { value: x }, Bounded { bound, value: y }) | (Bounded { bound, value: y }, Exact { value: x }) => {
            SumValue {
                kind: sum_kind(bound),
                value: x + y,
            }
        }
        _ => return None,
    };
    Some(sum)
}

fn sum_kind(bound: Bound) -> SumKind {
    match bound {
        Bound::Lt => SumKind::Lt,
        Bound::Gt => SumKind::Gt,
    }
}

/// Composite standard score and percentile for one domain.
///
/// Steps read: both subtests' standard-score steps, the D1 step, the C1 step.
pub fn calculate_domain_result(
    domain: DomainKey,
    subtests: &BTreeMap<SubtestKey, SubtestResult>,
    ctx: &LookupContext,
) -> DomainResult {
    let (first, second) = domain.components();
    let first_score = subtests.get(&first).map(|r| &r.standard_score);
    let second_score = subtests.get(&second).map(|r| &r.standard_score);

    let subtest_steps: Vec<ProvenanceStep> = first_score
        .into_iter()
        .chain(second_score)
        .flat_map(|s| s.steps.iter().cloned())
        .collect();

    let sum = compute_domain_sum(
        first_score.and_then(|s| s.value.as_ref()),
        second_score.and_then(|s| s.value.as_ref()),
    );

    let Some(sum) = sum else {
        let note = format!(
            "{} requires exact or bounded standard scores for {} and {}",
            domain.label(),
            first.label(),
            second.label()
        );
        let empty = ValueWithProvenance {
            value: None,
            steps: subtest_steps,
            note: Some(note),
        };
        return DomainResult {
            sum: None,
            standard_score: empty.clone(),
            percentile: empty,
        };
    };

    log::debug!("{}: sum {sum}", domain.label());
    let standard_score = composite_for_sum(sum, ctx).with_prefix(&subtest_steps);
    let percentile = chain_percentile(&standard_score, ctx);

    DomainResult {
        sum: Some(sum),
        standard_score,
        percentile,
    }
}

/// D1 lookup for a possibly bounded sum.
///
/// A bounded sum is looked up one unit inside its bound (`<v` → `v-1`,
/// `>v` → `v+1`); an exact composite `s` found there is re-bounded as `<s+1`
/// or `>s-1`. A failed boundary lookup is returned unchanged.
fn composite_for_sum(sum: SumValue, ctx: &LookupContext) -> ValueWithProvenance<ParsedScore> {
    let (boundary, bound) = match sum.kind {
        SumKind::Exact => return lookup_domain_composite(sum.value, ctx),
        SumKind::Lt => (sum.value - 1.0, Bound::Lt),
        SumKind::Gt => (sum.value + 1.0, Bound::Gt),
    };

    let mut result = lookup_domain_composite(boundary, ctx);
    if let Some(ParsedNumeric::Exact { value }) = result.value {
        let rebounded = match bound {
            Bound::Lt => ParsedNumeric::lt(value + 1.0),
            Bound::Gt => ParsedNumeric::gt(value - 1.0),
        };
        log::debug!("sum {sum}: boundary {boundary} gave {value}, reporting {rebounded}");
        result.value = Some(rebounded);
        result.note = Some(format!(
            "Sum {sum} is bounded; composite taken from boundary sum {boundary}"
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture;

    fn ctx() -> LookupContext {
        fixture::fixture_context().unwrap()
    }

    #[test]
    fn sum_algebra() {
        let e = ParsedNumeric::exact;
        let lt = ParsedNumeric::lt;
        let gt = ParsedNumeric::gt;

        assert_eq!(compute_domain_sum(Some(&e(90.0)), Some(&e(95.0))), Some(SumValue::exact(185.0)));
        assert_eq!(compute_domain_sum(Some(&lt(50.0)), Some(&lt(50.0))), Some(SumValue::lt(100.0)));
        assert_eq!(compute_domain_sum(Some(&gt(150.0)), Some(&gt(150.0))), Some(SumValue::gt(300.0)));
        assert_eq!(compute_domain_sum(Some(&lt(50.0)), Some(&gt(150.0))), Some(SumValue::gt(150.0)));
        assert_eq!(compute_domain_sum(Some(&gt(150.0)), Some(&lt(50.0))), Some(SumValue::gt(150.0)));
        assert_eq!(compute_domain_sum(Some(&gt(150.0)), Some(&e(95.0))), Some(SumValue::gt(245.0)));
        assert_eq!(compute_domain_sum(Some(&e(60.0)), Some(&lt(50.0))), Some(SumValue::lt(110.0)));
        assert_eq!(compute_domain_sum(None, Some(&e(95.0))), None);
        assert_eq!(
            compute_domain_sum(Some(&ParsedNumeric::range(90.0, 95.0)), Some(&e(95.0))),
            None
        );
    }

    #[test]
    fn missing_raw_short_circuits() {
        let ctx = ctx();
        let r = calculate_subtest_result(SubtestKey::Cognitive, None, 12, &ctx);
        assert_eq!(r, SubtestResult::default());
    }

    #[test]
    fn percentile_without_standard_score_reuses_note() {
        let ctx = ctx();
        let r = calculate_subtest_result(SubtestKey::Cognitive, Some(10), 90, &ctx);
        assert!(r.percentile.value.is_none());
        assert_eq!(r.percentile.note.as_deref(), Some("No table for age 90 months"));
        // Age equivalents do not depend on the child's age.
        assert!(r.age_equivalent.value.is_some());
    }

    #[test]
    fn exact_domain_sum_chains_three_tables() {
        let ctx = ctx();
        // RL raw 10 = 80, EL raw 10 = 95 at 12 months.
        let input = ScoreInput::new(12)
            .with_raw(SubtestKey::ReceptiveLanguage, 10)
            .with_raw(SubtestKey::ExpressiveLanguage, 10);
        let result = calculate_all_scores(&input, &ctx);
        let comm = &result.domains.communication;
        assert_eq!(comm.sum, Some(SumValue::exact(175.0)));
        // 175 falls in 175-176.
        assert_eq!(comm.standard_score.value, Some(ParsedNumeric::exact(88.0)));
        let ids: Vec<&str> = comm.percentile.steps.iter().map(|s| s.table_id.as_str()).collect();
        assert_eq!(ids, vec!["B13", "B13", "D1", "C1"]);
    }

    #[test]
    fn bounded_sum_is_rebounded() {
        let ctx = ctx();
        // >245 → boundary 246 → composite 123 → >122.
        let input = ScoreInput::new(12)
            .with_raw(SubtestKey::ReceptiveLanguage, 30)
            .with_raw(SubtestKey::ExpressiveLanguage, 10);
        let result = calculate_all_scores(&input, &ctx);
        let comm = &result.domains.communication;
        assert_eq!(comm.sum, Some(SumValue::gt(245.0)));
        assert_eq!(comm.standard_score.value, Some(ParsedNumeric::gt(122.0)));
        assert!(comm.standard_score.note.is_some());
        assert!(comm.percentile.value.unwrap().is_bounded());
    }

    #[test]
    fn floor_sum_is_rebounded_downward() {
        let ctx = ctx();
        // <100 → boundary 99 → composite 50 → <51.
        let input = ScoreInput::new(12)
            .with_raw(SubtestKey::ReceptiveLanguage, 0)
            .with_raw(SubtestKey::ExpressiveLanguage, 0);
        let comm = calculate_all_scores(&input, &ctx).domains.communication;
        assert_eq!(comm.sum, Some(SumValue::lt(100.0)));
        assert_eq!(comm.standard_score.value, Some(ParsedNumeric::lt(51.0)));
    }

    #[test]
    fn failed_boundary_lookup_is_returned_raw() {
        let mut bundle = fixture::fixture_bundle();
        bundle.sum_to_domain.rows.truncate(1);
        let ctx = LookupContext::new(bundle).unwrap();
        let input = ScoreInput::new(12)
            .with_raw(SubtestKey::ReceptiveLanguage, 30)
            .with_raw(SubtestKey::ExpressiveLanguage, 10);
        let comm = calculate_all_scores(&input, &ctx).domains.communication;
        assert!(comm.standard_score.value.is_none());
        assert_eq!(comm.standard_score.note.as_deref(), Some("Sum 246 not found in D1"));
    }

    #[test]
    fn missing_component_keeps_subtest_steps() {
        let ctx = ctx();
        let input = ScoreInput::new(12).with_raw(SubtestKey::GrossMotor, 10);
        let physical = calculate_all_scores(&input, &ctx).domains.physical;
        assert!(physical.sum.is_none());
        assert!(physical.standard_score.value.is_none());
        assert_eq!(physical.standard_score.steps.len(), 1);
        assert_eq!(physical.percentile.steps.len(), 1);
    }
}
