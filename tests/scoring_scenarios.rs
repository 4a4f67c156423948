//! End-to-end scoring over the fixture tables.

use devscore::context::LookupContext;
use devscore::data::fixture;
use devscore::domain::{ParsedNumeric, ScoreInput, SubtestKey, SumValue};
use devscore::goals::{ReverseStrategy, lookup_raw_score_from_standard_score, plan_goals};
use devscore::scoring::calculate_all_scores;

fn ctx() -> LookupContext {
    fixture::fixture_context().unwrap()
}

#[test]
fn cognitive_raw_10_at_12_months() {
    let ctx = ctx();
    let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 10);
    let result = calculate_all_scores(&input, &ctx);
    let cog = result.subtest(SubtestKey::Cognitive).unwrap();

    assert_eq!(cog.standard_score.value, Some(ParsedNumeric::exact(60.0)));
    assert_eq!(cog.standard_score.steps.len(), 1);
    assert_eq!(cog.standard_score.steps[0].table_id, "B13");
}

#[test]
fn cognitive_raw_20_chains_into_c1() {
    let ctx = ctx();
    let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 20);
    let result = calculate_all_scores(&input, &ctx);
    let cog = result.subtest(SubtestKey::Cognitive).unwrap();

    assert_eq!(cog.standard_score.value, Some(ParsedNumeric::exact(100.0)));
    assert_eq!(cog.percentile.value, Some(ParsedNumeric::exact(50.0)));
    let ids: Vec<&str> = cog.percentile.steps.iter().map(|s| s.table_id.as_str()).collect();
    assert_eq!(ids, vec!["B13", "C1"]);
}

#[test]
fn ceiling_plus_exact_sum() {
    let ctx = ctx();
    let input = ScoreInput::new(12)
        .with_raw(SubtestKey::ReceptiveLanguage, 30)
        .with_raw(SubtestKey::ExpressiveLanguage, 10);
    let result = calculate_all_scores(&input, &ctx);
    assert_eq!(result.domains.communication.sum, Some(SumValue::gt(245.0)));
}

#[test]
fn floor_plus_floor_sum() {
    let ctx = ctx();
    let input = ScoreInput::new(12)
        .with_raw(SubtestKey::ReceptiveLanguage, 0)
        .with_raw(SubtestKey::ExpressiveLanguage, 0);
    let result = calculate_all_scores(&input, &ctx);
    assert_eq!(result.domains.communication.sum, Some(SumValue::lt(100.0)));
}

#[test]
fn floor_plus_ceiling_keeps_only_lower_bound() {
    let ctx = ctx();
    let input = ScoreInput::new(12)
        .with_raw(SubtestKey::ReceptiveLanguage, 0)
        .with_raw(SubtestKey::ExpressiveLanguage, 30);
    let result = calculate_all_scores(&input, &ctx);
    assert_eq!(result.domains.communication.sum, Some(SumValue::gt(150.0)));
}

#[test]
fn null_raw_blocks_the_domain() {
    let ctx = ctx();
    let input = ScoreInput::new(12).with_raw(SubtestKey::ReceptiveLanguage, 10);
    let result = calculate_all_scores(&input, &ctx);
    assert!(result.domains.communication.sum.is_none());
    assert!(result.domains.communication.standard_score.value.is_none());
    assert!(result.domains.physical.sum.is_none());
}

#[test]
fn partial_results_stay_usable() {
    let ctx = ctx();
    let input = ScoreInput::new(12)
        .with_raw(SubtestKey::Cognitive, 20)
        .with_raw(SubtestKey::SocialEmotional, 0);
    let result = calculate_all_scores(&input, &ctx);
    assert!(result.subtest(SubtestKey::Cognitive).unwrap().percentile.is_found());
    let se = result.subtest(SubtestKey::SocialEmotional).unwrap();
    assert!(se.standard_score.value.is_none());
    assert!(se.standard_score.note.is_some());
    assert_eq!(result.subtests.len(), 7);
}

#[test]
fn chained_provenance_prefix_holds_for_every_subtest() {
    let ctx = ctx();
    for age in [12, 30, 50, 71] {
        let mut input = ScoreInput::new(age);
        for (i, key) in SubtestKey::ALL.iter().enumerate() {
            input = input.with_raw(*key, 5 + 4 * i as u32);
        }
        let result = calculate_all_scores(&input, &ctx);
        for r in result.subtests.values() {
            if r.standard_score.value.is_none() {
                continue;
            }
            let n = r.standard_score.steps.len();
            assert!(r.percentile.steps.len() >= n);
            assert_eq!(&r.percentile.steps[..n], &r.standard_score.steps[..]);
        }
    }
}

#[test]
fn goal_plan_matches_forward_scoring() {
    let ctx = ctx();
    let plan = plan_goals(50.0, 12, &[SubtestKey::Cognitive], ReverseStrategy::ExactMinRaw, &ctx);
    let raw = plan.raw_scores[&SubtestKey::Cognitive].value.unwrap();

    let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, raw);
    let result = calculate_all_scores(&input, &ctx);
    let cog = result.subtest(SubtestKey::Cognitive).unwrap();
    assert_eq!(cog.percentile.value, Some(ParsedNumeric::exact(50.0)));
}

#[test]
fn strategies_disagree_when_target_is_not_printed() {
    let ctx = ctx();
    // Expressive language at 12 months: 55 + 4r, so 100 is never printed.
    let exact = lookup_raw_score_from_standard_score(
        100.0,
        SubtestKey::ExpressiveLanguage,
        12,
        ReverseStrategy::ExactMinRaw,
        &ctx,
    );
    let closest = lookup_raw_score_from_standard_score(
        100.0,
        SubtestKey::ExpressiveLanguage,
        12,
        ReverseStrategy::ClosestAtOrBelow,
        &ctx,
    );
    assert!(exact.value.is_none());
    // 55 + 4 * 11 = 99
    assert_eq!(closest.value, Some(11));
}
