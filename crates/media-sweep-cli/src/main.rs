mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ScanArgs};
use dotenv::dotenv;
use media_sweep_core::{AppConfig, SweepEngine, SweepReport};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenv().ok();

    let args = Cli::parse();
    let _guard = logging::init_logger(args.verbose);

    let config = match media_sweep_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Some(Commands::Scan(scan_args)) => match run_scan(config, &scan_args, args.verbose) {
            Ok(code) => code,
            Err(err) => {
                error!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            ExitCode::SUCCESS
        }
        None => {
            let _ = Cli::command().print_long_help();
            ExitCode::SUCCESS
        }
    }
}

fn apply_overrides(mut config: AppConfig, args: &ScanArgs) -> AppConfig {
    if let Some(root) = &args.media_root {
        config.media_root = root.to_string_lossy().into_owned();
    }
    if let Some(database) = &args.database {
        config.database_path = database.to_string_lossy().into_owned();
    }
    if args.no_db_scan {
        config.scan_whole_store = false;
    }
    if args.db_fast {
        config.intensive = false;
    }
    config.exclude.extend(args.exclude.iter().cloned());
    config.integrations.extend(args.integrations.iter().cloned());
    config
}

fn run_scan(config: AppConfig, args: &ScanArgs, verbose: bool) -> anyhow::Result<ExitCode> {
    let engine = SweepEngine::new(apply_overrides(config, args));
    let reporter = CliReporter::new();

    info!(
        "Scanning {} against {} ({} extraction, whole-store scan {})",
        engine.config().media_root.cyan(),
        engine.config().database_path.cyan(),
        if engine.config().intensive { "intensive" } else { "fast" },
        if engine.config().scan_whole_store { "on" } else { "off" },
    );
    info!("Excluding: {}", engine.exclusions().prefixes().join(", "));

    let report = engine.scan(&reporter).context("Scan failed")?;
    print_summary(&report);

    if args.dry_run || verbose {
        for candidate in report.candidates() {
            println!("{}", candidate.relative);
        }
    }

    if report.candidates().is_empty() {
        info!("{}", "Nothing to delete.".green());
        return Ok(ExitCode::SUCCESS);
    }
    if args.dry_run {
        info!("Dry run: no files were deleted.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes {
        let prompt = format!(
            "Type \"yes\" to permanently delete these {} files:",
            report.candidates().len()
        );
        if !prompt_confirm(&prompt).context("Could not read confirmation")? {
            println!("{}", "Aborted. No files were deleted.".yellow());
            return Ok(ExitCode::SUCCESS);
        }
    }

    let deletion = engine
        .delete(&report, &reporter)
        .context("Deletion failed")?;
    for failure in &deletion.errors {
        warn!("{}", failure);
    }
    info!(
        "{} deleted, {} skipped, {} errors",
        format!("{}", deletion.deleted).green(),
        deletion.skipped,
        format!("{}", deletion.errors.len()).red(),
    );

    if deletion.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("{} files could not be deleted", deletion.errors.len());
        Ok(ExitCode::FAILURE)
    }
}

fn print_summary(report: &SweepReport) {
    println!();
    info!(
        "Collect: {}, Scan: {}",
        format!("{:.2}s", report.collect_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.scan_duration.as_secs_f64()).green(),
    );
    info!(
        "{} referenced paths, {} files considered, {} unreferenced",
        format!("{}", report.referenced_paths).cyan(),
        format!("{}", report.total_files()).cyan(),
        format!("{}", report.candidates().len()).red(),
    );
}

/// Only a literal `yes` confirms.
fn prompt_confirm(prompt: &str) -> io::Result<bool> {
    println!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "yes")
}
