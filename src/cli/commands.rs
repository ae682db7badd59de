//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cursor pagination navigator CLI
#[derive(Parser, Debug)]
#[command(name = "cursornav")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Navigator configuration file (YAML)
    #[arg(short, long, global = true, default_value = "cursornav.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of the filtered result set
    Page {
        /// 1-indexed page number
        #[arg(default_value = "1")]
        number: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Walk to the last page of the filtered result set
    Last {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the approximate record and page count
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Validate the configuration and check the store answers
    Validate,
}

/// Filter values shared by the data commands
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Issue type (omit for all)
    #[arg(long)]
    pub issue_type: Option<String>,

    /// Severity: low, medium, high, critical (omit for all)
    #[arg(long)]
    pub severity: Option<String>,

    /// Affected entity (omit for all)
    #[arg(long)]
    pub entity: Option<String>,

    /// Status: open, acknowledged, resolved (omit for all)
    #[arg(long)]
    pub status: Option<String>,

    /// Originating rule-run id
    #[arg(long)]
    pub run_id: Option<String>,

    /// Free-text substring search
    #[arg(long)]
    pub search: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
