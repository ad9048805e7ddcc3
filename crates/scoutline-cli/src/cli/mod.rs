//! CLI command definitions and dispatch for the `scout` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod embed;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Enrich player profiles with embeddings for semantic scouting search.
#[derive(Parser)]
#[command(name = "scout", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one enrichment pass: normalize, embed, and store vectors.
    Embed {
        /// Only process players that have no embedding yet.
        #[arg(long)]
        only_missing: bool,

        /// Players per concurrent batch.
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        batch_size: u32,

        /// Pause between batches, in milliseconds.
        #[arg(long, default_value_t = 1000)]
        batch_delay: u64,

        /// Normalize and count only; no API calls, no writes.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show enrichment coverage and database info.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
