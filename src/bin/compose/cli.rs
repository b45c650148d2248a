//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// compose - Inspect and check composable part catalogs
#[derive(Parser)]
#[command(name = "compose")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show parts with their exports and imports
    Inspect(InspectArgs),

    /// List imports grouped by import equality
    Imports(ImportsArgs),

    /// Lint a catalog
    Check(CheckArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// Catalog file or directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Only show parts matching a bare or qualified id
    #[arg(long)]
    pub part: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ImportsArgs {
    /// Catalog file or directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Only show imports shared by two or more sites
    #[arg(long)]
    pub equivalent: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Catalog file or directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub deny_warnings: bool,
}
