//! CLI argument definitions and command implementations.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod branch;
pub mod completions;
pub mod graph;
pub mod tags;

/// Commit attribution and branch topology analysis for grading.
#[derive(Parser)]
#[command(name = "tutor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "tutor.toml")]
    pub config: String,

    /// Analyze this local repository instead of the configured source.
    #[arg(long, global = true)]
    pub repo: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Reconstruct the branch paths of the history snapshot
    Graph {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print a DOT graph description
        #[arg(long, conflicts_with = "json")]
        dot: bool,
    },

    /// Attribute a feature branch: first commit and merge point
    Branch {
        /// Feature branch name
        name: String,

        /// Base branch to measure against (defaults to the configured one)
        #[arg(long)]
        base: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Reconstruct which tags existed at a date
    Tags {
        /// The date to reconstruct, RFC 3339 (e.g. 2024-03-01T12:00:00Z)
        #[arg(long)]
        at: DateTime<Utc>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
