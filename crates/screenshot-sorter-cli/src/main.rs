mod commands;
mod logging;
mod progress;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands, FolderArgs, OrganizeArgs};
use dotenv::dotenv;
use progress::CliReporter;
use screenshot_sorter_core::{report, AppConfig, OrganizeEngine};
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match screenshot_sorter_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args.command {
        Some(Commands::Organize(args)) => run_organize(config, args),
        Some(Commands::Plan(args)) => run_plan(config, args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => run_organize(config, OrganizeArgs::default()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("FATAL: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn engine_for(config: AppConfig, args: FolderArgs) -> OrganizeEngine {
    let engine = OrganizeEngine::new(config);
    match args.folder {
        Some(folder) => engine.with_source_folder(folder),
        None => engine,
    }
}

fn run_organize(config: AppConfig, args: OrganizeArgs) -> anyhow::Result<()> {
    let engine = engine_for(config, args.folder);
    let reporter = CliReporter::new();
    let result = engine.organize(&reporter)?;

    report::log_summary(&result);

    info!(
        "Scan: {}, Process: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.process_duration.as_secs_f64()).green(),
    );
    info!(
        "{} moved into {} folders, {} ignored, {} failed",
        format!("{}", result.moved.len()).green(),
        format!("{}", result.folders_created).cyan(),
        format!("{}", result.ignored.len()).yellow(),
        format!("{}", result.failed.len()).red(),
    );

    if let Some(path) = args.report {
        report::write_csv(&result, &path)
            .with_context(|| format!("Error writing report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

fn run_plan(config: AppConfig, args: FolderArgs) -> anyhow::Result<()> {
    let engine = engine_for(config, args);
    let preview = engine.preview()?;

    for folder in preview.plan.folders() {
        println!("{}", preview.source_folder.join(folder).display().to_string().cyan());
    }
    for planned in preview.plan.moves() {
        println!(
            "  {} -> {}",
            planned.record.file_name,
            planned.target_dir.display().to_string().green()
        );
    }
    for ignored in &preview.ignored {
        println!("  {} ({})", ignored.file_name.yellow(), ignored.reason);
    }
    info!(
        "{} files scanned, {} would move, {} ignored",
        preview.files_scanned,
        preview.plan.len(),
        preview.ignored.len(),
    );

    Ok(())
}
