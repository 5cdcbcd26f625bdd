use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "media-sweep")]
#[command(about = "Find and delete media files nothing in the store refers to", long_about = None)]
pub struct Cli {
    /// Debug logging and a full candidate listing
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect references, list unreferenced media and optionally delete them
    Scan(ScanArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Media root directory (overrides `media_root`)
    #[arg(long)]
    pub media_root: Option<PathBuf>,

    /// SQLite snapshot of the store (overrides `database_path`)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// List candidates, delete nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Delete without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Skip the whole-store text scan
    #[arg(long)]
    pub no_db_scan: bool,

    /// Pattern-only extraction: no decoding, no JSON or serialized payloads
    #[arg(long)]
    pub db_fast: bool,

    /// Path prefix under the media root to keep (repeatable)
    #[arg(short, long = "exclude", value_name = "PREFIX")]
    pub exclude: Vec<String>,

    /// Enable a plugin integration, e.g. `mega_menu` (repeatable)
    #[arg(long = "integration", value_name = "NAME")]
    pub integrations: Vec<String>,
}
