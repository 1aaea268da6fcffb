use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "screenshot-sorter")]
#[command(about = "Sort screenshots into per-app folders with a status bar", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stamp and move every screenshot in the source folder (default)
    Organize(OrganizeArgs),
    /// Show where each screenshot would go without touching any file
    Plan(FolderArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args, Default)]
pub struct FolderArgs {
    /// Source folder, overrides the configured one
    #[arg(long)]
    pub folder: Option<PathBuf>,
}

#[derive(Debug, Args, Default)]
pub struct OrganizeArgs {
    #[command(flatten)]
    pub folder: FolderArgs,
    /// Write a CSV with the outcome of every file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
