//! CLI argument parsing for pq.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pq",
    about = "Inspect task dependency snapshots: ordering, locks, and edge gating",
    version,
    after_help = "Logs are written to: ~/.local/share/prereq/logs/prereq.log"
)]
pub struct Cli {
    /// Path to a snapshot JSON file (default: tasks.json)
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Owner scope to inspect (default: the snapshot's only owner)
    #[arg(short, long, global = true)]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print tasks in dependency order with lock annotations
    Order,

    /// Check whether a dependency edge could be added
    Check {
        /// Task that must be completed first
        provider_id: String,

        /// Task that would depend on it
        dependent_id: String,
    },

    /// Show one task with its prerequisites and lock state
    Show {
        /// Task ID
        id: String,
    },

    /// List the owners present in the snapshot
    Owners,
}
