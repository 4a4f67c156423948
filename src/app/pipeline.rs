//! Shared run logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve tables -> resolve age -> score / plan
//!
//! The command handlers can then focus on presentation (printing vs JSON).

use std::path::{Path, PathBuf};

use crate::age::{calc_age_months, parse_date};
use crate::cli::{AgeOptions, GoalArgs, ScoreArgs};
use crate::context::LookupContext;
use crate::data::fixture;
use crate::domain::{CalculationResult, GoalPlan, ScoreInput, SubtestKey};
use crate::error::AppError;
use crate::goals::{ReverseStrategy, plan_goals};
use crate::scoring::calculate_all_scores;

/// A scoring run as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub input: ScoreInput,
    pub json: bool,
    pub trail: bool,
    pub output: Option<PathBuf>,
}

/// A goal-planning run as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct GoalConfig {
    pub age_months: i32,
    pub target_percentile: f64,
    pub subtests: Vec<SubtestKey>,
    pub strategy: ReverseStrategy,
    pub json: bool,
    pub trail: bool,
    pub output: Option<PathBuf>,
}

/// Load the configured table bundle, or the built-in fixture tables.
pub fn resolve_context(tables: Option<&Path>) -> Result<LookupContext, AppError> {
    match tables {
        Some(path) => crate::io::tables::load_context(path),
        None => {
            log::warn!("No table bundle configured (--tables / DEVSCORE_TABLES); using built-in fixture tables.");
            fixture::fixture_context()
        }
    }
}

/// Age in completed months from either `--age` or `--dob`/`--test-date`.
pub fn resolve_age(options: &AgeOptions) -> Result<i32, AppError> {
    if let Some(age) = options.age {
        return Ok(age);
    }
    match (&options.dob, &options.test_date) {
        (Some(dob), Some(test_date)) => {
            let dob = parse_date(dob).map_err(AppError::input)?;
            let test_date = parse_date(test_date).map_err(AppError::input)?;
            let age = calc_age_months(dob, test_date);
            if age < 0 {
                return Err(AppError::input(format!(
                    "Test date {test_date} is before date of birth {dob}."
                )));
            }
            Ok(age)
        }
        _ => Err(AppError::input("Provide --age, or both --dob and --test-date.")),
    }
}

pub fn score_config_from_args(args: &ScoreArgs) -> Result<ScoreConfig, AppError> {
    let mut input = ScoreInput::new(resolve_age(&args.age)?);
    for &(subtest, raw) in &args.raw {
        if input.raw_scores.insert(subtest, Some(raw)).is_some() {
            log::warn!("Raw score for {} given more than once; using {raw}.", subtest.key());
        }
    }
    Ok(ScoreConfig {
        input,
        json: args.json,
        trail: args.trail,
        output: args.output.clone(),
    })
}

pub fn goal_config_from_args(args: &GoalArgs) -> Result<GoalConfig, AppError> {
    if !args.percentile.is_finite() {
        return Err(AppError::input("Target percentile must be a finite number."));
    }
    let subtests = if args.subtests.is_empty() {
        SubtestKey::ALL.to_vec()
    } else {
        args.subtests.clone()
    };
    Ok(GoalConfig {
        age_months: resolve_age(&args.age)?,
        target_percentile: args.percentile,
        subtests,
        strategy: args.strategy,
        json: args.json,
        trail: args.trail,
        output: args.output.clone(),
    })
}

pub fn run_score(config: &ScoreConfig, ctx: &LookupContext) -> CalculationResult {
    log::debug!(
        "scoring age {} with {} raw scores",
        config.input.age_months,
        config.input.raw_scores.len()
    );
    calculate_all_scores(&config.input, ctx)
}

pub fn run_goal(config: &GoalConfig, ctx: &LookupContext) -> GoalPlan {
    plan_goals(
        config.target_percentile,
        config.age_months,
        &config.subtests,
        config.strategy,
        ctx,
    )
}
