//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LexUse: add corpus usage examples to Wikidata lexemes
#[derive(Parser)]
#[command(name = "lexuse")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw forms at random and review corpus sentences for them
    Run {
        /// Configuration file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Exclusion list location (default: exclude_list.json)
        #[arg(short, long, value_name = "FILE")]
        exclude_list: Option<PathBuf>,

        /// Number of forms to fetch
        #[arg(short, long)]
        limit: Option<usize>,

        /// Offset into the form query results
        #[arg(long)]
        offset: Option<usize>,

        /// Don't add edited lexemes to the watch list
        #[arg(long)]
        no_watch: bool,

        /// Log statement payloads and API results
        #[arg(long)]
        debug_json: bool,

        /// Show the source document and date of each sentence
        #[arg(long)]
        show_sources: bool,

        /// Skip the introduction
        #[arg(short, long)]
        yes: bool,

        /// Seed for the random order of forms
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a summary of the exclusion list
    Status {
        /// Exclusion list location (default: exclude_list.json)
        #[arg(short, long, value_name = "FILE")]
        exclude_list: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
