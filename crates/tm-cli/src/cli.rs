//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - versioned schema change-sets with an in-database ledger
#[derive(Parser, Debug)]
#[command(name = "tide")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(long, global = true, env = "TIDEMARK_DATABASE")]
    pub database: Option<String>,

    /// Override change-set directory
    #[arg(long, global = true, env = "TIDEMARK_MIGRATIONS_DIR")]
    pub migrations_dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every pending change-set in order
    Run(RunArgs),

    /// Author a new empty change-set
    Create(CreateArgs),

    /// Revert the most recently applied change-set
    Rollback(RollbackArgs),

    /// Show applied and pending change-sets
    Status(StatusArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// List pending change-sets without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Human-readable change-set name, e.g. "Add user preferences"
    pub name: String,
}

/// Arguments for the rollback command
#[derive(Args, Debug)]
pub struct RollbackArgs {}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,

    /// Exit with code 1 when pending change-sets exist
    #[arg(long)]
    pub fail_on_pending: bool,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
