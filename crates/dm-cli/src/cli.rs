//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// docmig - apply versioned migrations to a MongoDB database
#[derive(Parser, Debug)]
#[command(name = "docmig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./docmig.yml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// MongoDB connection string (default: mongodb://localhost:27017)
    #[arg(
        long,
        global = true,
        env = "DOCMIG_CONNECTION_STRING",
        alias = "connection_string"
    )]
    pub connection_string: Option<String>,

    /// Target database name
    #[arg(short, long, global = true, env = "DOCMIG_DATABASE")]
    pub database: Option<String>,

    /// Directory containing migration_<version> scripts (default: migrations)
    #[arg(short, long, global = true)]
    pub migrations_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Run(RunArgs),

    /// Show the recorded version and pending migrations
    Status(StatusArgs),

    /// Clear a lock left behind by an interrupted run
    Unlock(UnlockArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable summary
    Text,
    /// JSON object
    Json,
}

/// Arguments for the unlock command
#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// Also overwrite the recorded version
    #[arg(long)]
    pub set_version: Option<u64>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
