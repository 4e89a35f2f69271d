//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tw_core::Granularity;

/// Minimal tools to get information out of Timewarrior.
///
/// Reports minutes spent on tagged activities, bucketed by day, week, month or year.
#[derive(Debug, Parser)]
#[command(name = "twtools", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show minutes spent on tags, bucketed by calendar unit.
    ///
    /// Example: `twtools stats year week coding` shows minutes spent on `coding`
    /// during the last year, week by week.
    Stats {
        /// How far back to look (e.g. "month", "last year", "45 days ago", "2023-01-01").
        hint: String,

        /// Bucket size: day, week, month or year.
        granularity: Granularity,

        /// Timewarrior tags to report, one series each.
        #[arg(required = true)]
        tags: Vec<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the activity currently being tracked.
    Current,
}
