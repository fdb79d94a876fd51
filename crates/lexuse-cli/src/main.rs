//! LexUse CLI - semi-automatic usage examples for Wikidata lexemes.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::prelude::*;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // The exclusion list is only written after complete decisions, so
    // stopping at a prompt loses nothing.
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        std::process::exit(130);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }

    let result = match cli.command {
        Commands::Run {
            config,
            exclude_list,
            limit,
            offset,
            no_watch,
            debug_json,
            show_sources,
            yes,
            seed,
        } => commands::run::run(
            commands::run::RunArgs {
                config,
                exclude_list,
                limit,
                offset,
                no_watch,
                debug_json,
                show_sources,
                yes,
                seed,
            },
            cli.verbose,
        ),

        Commands::Status { exclude_list, json } => {
            commands::status::run(exclude_list, json, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so prompts on stdout stay readable.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "lexuse=debug,lexuse_cli=debug"
    } else {
        "lexuse=warn,lexuse_cli=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
