//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - loads the table bundle
//! - runs scoring / goal planning
//! - prints reports and writes optional JSON exports

use clap::Parser;

use crate::cli::{AgeArgs, Cli, Command, ExportArgs, GoalArgs, ScoreArgs};
use crate::context::LookupContext;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `devscore` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is normal; anything else is worth a mention once logging is up.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli);
    if let Err(err) = dotenv {
        if !err.not_found() {
            log::warn!("Ignoring unreadable .env file: {err}");
        }
    }

    match &cli.command {
        Command::Age(args) => handle_age(args, &cli),
        Command::ExportFixture(args) => handle_export_fixture(args),
        Command::Bands => {
            let ctx = pipeline::resolve_context(cli.tables.as_deref())?;
            print!("{}", crate::report::format_bands(&ctx));
            Ok(())
        }
        Command::Score(args) => {
            let ctx = pipeline::resolve_context(cli.tables.as_deref())?;
            handle_score(args, &ctx)
        }
        Command::Goal(args) => {
            let ctx = pipeline::resolve_context(cli.tables.as_deref())?;
            handle_goal(args, &ctx)
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn handle_score(args: &ScoreArgs, ctx: &LookupContext) -> Result<(), AppError> {
    let config = pipeline::score_config_from_args(args)?;
    let result = pipeline::run_score(&config, ctx);

    if config.json {
        println!("{}", crate::io::results::to_json_string(&result)?);
    } else {
        print!("{}", crate::report::format_calculation(&result, config.trail));
    }

    if let Some(path) = &config.output {
        crate::io::results::write_json(path, &result)?;
    }
    Ok(())
}

fn handle_goal(args: &GoalArgs, ctx: &LookupContext) -> Result<(), AppError> {
    let config = pipeline::goal_config_from_args(args)?;
    let plan = pipeline::run_goal(&config, ctx);

    if config.json {
        println!("{}", crate::io::results::to_json_string(&plan)?);
    } else {
        print!("{}", crate::report::format_goal_plan(&plan, config.trail));
    }

    if let Some(path) = &config.output {
        crate::io::results::write_json(path, &plan)?;
    }
    Ok(())
}

fn handle_age(args: &AgeArgs, cli: &Cli) -> Result<(), AppError> {
    let dob = crate::age::parse_date(&args.dob).map_err(AppError::input)?;
    let test_date = crate::age::parse_date(&args.test_date).map_err(AppError::input)?;
    let months = crate::age::calc_age_months(dob, test_date);
    println!("Age: {months} months");

    let ctx = pipeline::resolve_context(cli.tables.as_deref())?;
    match crate::age::find_age_band(months, &ctx) {
        Some(table) => {
            let label = table.age_band().map(|b| b.label.as_str()).unwrap_or("");
            println!("Band: {} ({label})", table.table_id);
        }
        None => println!("Band: none (outside the loaded age bands)"),
    }
    Ok(())
}

fn handle_export_fixture(args: &ExportArgs) -> Result<(), AppError> {
    let bundle = crate::data::fixture::fixture_bundle();
    crate::io::tables::write_table_bundle(&args.out, &bundle)?;
    log::info!("wrote fixture bundle to {}", args.out.display());
    Ok(())
}
