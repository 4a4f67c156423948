//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! lookup engine. Everything here is converted into plain config structs
//! (`app::pipeline`) before any table is touched.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::SubtestKey;
use crate::goals::ReverseStrategy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "devscore",
    version,
    about = "Score-conversion lookups for a child-development assessment"
)]
pub struct Cli {
    /// Table bundle JSON produced by the table generator.
    ///
    /// Without it the built-in reduced fixture tables are used.
    #[arg(long, global = true, env = "DEVSCORE_TABLES", value_name = "JSON")]
    pub tables: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert raw scores into standard scores, percentiles, age equivalents and composites.
    Score(ScoreArgs),
    /// Find the minimum raw score per subtest needed to reach a target percentile.
    Goal(GoalArgs),
    /// Compute age in completed months and show the matching age band.
    Age(AgeArgs),
    /// List the loaded age bands.
    Bands,
    /// Write the built-in fixture tables as a table bundle JSON file.
    ExportFixture(ExportArgs),
}

/// Child age, either directly in months or from two dates.
#[derive(Debug, Args, Clone)]
pub struct AgeOptions {
    /// Age in completed months.
    #[arg(long, conflicts_with_all = ["dob", "test_date"], required_unless_present = "dob")]
    pub age: Option<i32>,

    /// Date of birth (YYYY-MM-DD).
    #[arg(long, requires = "test_date")]
    pub dob: Option<String>,

    /// Date of testing (YYYY-MM-DD).
    #[arg(long = "test-date", requires = "dob")]
    pub test_date: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub age: AgeOptions,

    /// Raw score for one subtest, e.g. `--raw cognitive=18`. Repeatable.
    #[arg(long = "raw", value_name = "SUBTEST=N", value_parser = parse_raw_arg)]
    pub raw: Vec<(SubtestKey, u32)>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Print the provenance trail for every derived value.
    #[arg(long)]
    pub trail: bool,

    /// Also write the full result as JSON to this file.
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct GoalArgs {
    #[command(flatten)]
    pub age: AgeOptions,

    /// Target percentile rank.
    #[arg(long)]
    pub percentile: f64,

    /// Restrict to these subtests (default: all). Repeatable.
    #[arg(long = "subtest", value_enum)]
    pub subtests: Vec<SubtestKey>,

    /// Raw-score selection policy.
    #[arg(long, value_enum, default_value_t = ReverseStrategy::ClosestAtOrBelow)]
    pub strategy: ReverseStrategy,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Print the provenance trail for every subtest.
    #[arg(long)]
    pub trail: bool,

    /// Also write the full plan as JSON to this file.
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct AgeArgs {
    /// Date of birth (YYYY-MM-DD).
    #[arg(long)]
    pub dob: String,

    /// Date of testing (YYYY-MM-DD).
    #[arg(long = "test-date")]
    pub test_date: String,
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Destination file.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}

/// Parse `subtest=raw`.
fn parse_raw_arg(s: &str) -> Result<(SubtestKey, u32), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected SUBTEST=N, got '{s}'."))?;
    let subtest = SubtestKey::from_str(name.trim(), true)?;
    let raw = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid raw score '{}' for {}.", raw.trim(), subtest.key()))?;
    Ok((subtest, raw))
}
