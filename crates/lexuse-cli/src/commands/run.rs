//! Run command - the interactive curation session.

use std::path::PathBuf;

use colored::Colorize;
use lexuse::curation::introduction;
use lexuse::{
    ConsolePrompter, ExclusionStore, LexUseConfig, LexUseError, Orchestrator, RunContext,
    RunSummary,
};

/// Flags of `lexuse run`.
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub exclude_list: Option<PathBuf>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub no_watch: bool,
    pub debug_json: bool,
    pub show_sources: bool,
    pub yes: bool,
    pub seed: Option<u64>,
}

pub fn run(args: RunArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;

    if verbose {
        eprintln!(
            "{} {} ({}), exclusion list {}",
            "Language:".cyan(),
            config.language.name,
            config.language.code,
            config.exclusion_path.display()
        );
    }

    // A damaged exclusion list stops the run before anything is asked.
    let mut store = ExclusionStore::open(&config.exclusion_path)?;
    let mut ctx = RunContext::live(config)?;
    let mut prompter = ConsolePrompter::stdio();

    if !args.yes {
        match introduction(&mut prompter) {
            Ok(true) => {}
            Ok(false) | Err(LexUseError::InputClosed) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }

    let mut orchestrator = Orchestrator::new(&mut ctx, &mut store, &mut prompter);
    if let Some(seed) = args.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let summary = match orchestrator.run() {
        Ok(summary) => summary,
        Err(LexUseError::InputClosed) => {
            println!();
            println!("{}", "Input closed, stopping.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_summary(&summary);
    if store.is_degraded() {
        println!(
            "{} the exclusion list could not be saved; handled forms may be offered again.",
            "Warning:".yellow().bold()
        );
    }

    Ok(())
}

/// Configuration file, then command-line overrides.
fn build_config(args: &RunArgs) -> Result<LexUseConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => LexUseConfig::load(path)?,
        None => LexUseConfig::default(),
    };

    if let Some(path) = &args.exclude_list {
        config = config.with_exclusion_path(path);
    }
    let limit = args.limit.unwrap_or(config.query_limit);
    let offset = args.offset.unwrap_or(config.query_offset);
    config = config.with_query_window(limit, offset);

    if args.no_watch {
        config = config.with_watch_edited(false);
    }
    if args.debug_json {
        config = config.with_debug_json(true);
    }
    if args.show_sources {
        config = config.with_sentence_sources(true);
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Session summary:".yellow().bold());
    println!("  Forms fetched:         {}", summary.forms.to_string().white());
    println!("  Forms drawn:           {}", summary.drawn.to_string().white());
    println!(
        "  Already excluded:      {}",
        summary.skipped_excluded.to_string().white()
    );
    println!(
        "  Usage examples added:  {}",
        summary.edits_saved.to_string().green()
    );
    if summary.failed_submissions > 0 {
        println!(
            "  Failed submissions:    {}",
            summary.failed_submissions.to_string().red()
        );
    }
    if summary.missing_publication_dates > 0 {
        println!(
            "  Missing dates:         {}",
            summary.missing_publication_dates.to_string().yellow()
        );
    }
    println!("  Forms excluded:        {}", summary.excluded.to_string().white());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RunArgs {
        RunArgs {
            config: None,
            exclude_list: None,
            limit: None,
            offset: None,
            no_watch: false,
            debug_json: false,
            show_sources: false,
            yes: false,
            seed: None,
        }
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&args()).unwrap();
        assert_eq!(config.query_limit, 50);
        assert!(config.watch_edited);
    }

    #[test]
    fn test_flags_override_config() {
        let mut args = args();
        args.limit = Some(5);
        args.offset = Some(20);
        args.no_watch = true;
        args.exclude_list = Some(PathBuf::from("other.json"));

        let config = build_config(&args).unwrap();
        assert_eq!(config.query_limit, 5);
        assert_eq!(config.query_offset, 20);
        assert!(!config.watch_edited);
        assert_eq!(config.exclusion_path, PathBuf::from("other.json"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let mut args = args();
        args.limit = Some(0);
        assert!(build_config(&args).is_err());
    }
}
