//! Planka Import
//!
//! Loads a JSON description of boards, lists, cards and tasks into a
//! Planka PostgreSQL database.

use anyhow::{Context, Result};
use clap::Parser;
use planka_import::cli::{Cli, Mode};
use planka_import::config::Config;
use planka_import::document;
use planka_import::error::ImportError;
use planka_import::import::{ImportOptions, ImportReport, run_import};
use planka_import::logging::{self, LogDestination, LogLevel};
use planka_import::store::PgStore;
use planka_import::template::generate_template;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.log_level.parse::<LogLevel>() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(level, &LogDestination::parse(&cli.log)) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ImportError>() {
                Some(ImportError::ProjectNotFound(name)) => {
                    error!("Project {} does not exist.", name)
                }
                _ => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mode = cli.mode();
    debug!(mode = mode.as_str(), "Starting");

    if mode == Mode::GenerateTemplate {
        let dir = std::env::current_dir().context("cannot determine working directory")?;
        generate_template(&dir)
            .with_context(|| format!("failed to write template into {}", dir.display()))?;
        return Ok(());
    }

    // clap enforces both positionals outside template mode
    let (Some(project_name), Some(file_name)) = (cli.project_name.as_deref(), &cli.file_name)
    else {
        anyhow::bail!("PROJECT_NAME and FILE_NAME are required");
    };

    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.connection.apply(&mut config.database);

    let document = document::from_file(file_name)?;

    let mut store = PgStore::connect(&config.database)?;

    let mut options = if mode == Mode::MergeLoad {
        ImportOptions::merge()
    } else {
        ImportOptions::create()
    };
    options.dedupe_cards = cli.dedupe_cards;

    let report = run_import(&mut store, project_name, &document, &options)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("Import complete:");
    println!("  Mode: {:?}", report.mode);
    println!("  Project: {}", report.project.name());
    println!("  Inserted: {} rows", report.total_inserted());
    for (table, count) in &report.rows_inserted {
        println!("    {}: {}", table, count);
    }
    if !report.rows_reused.is_empty() {
        println!("  Reused: {} rows", report.total_reused());
        for (table, count) in &report.rows_reused {
            println!("    {}: {}", table, count);
        }
    }
    if !report.rows_skipped.is_empty() {
        println!("  Skipped: {} rows", report.total_skipped());
        for (table, count) in &report.rows_skipped {
            println!("    {}: {}", table, count);
        }
    }
}
