//! The curation workflow.
//!
//! Forms are drawn at random from the query result ([`CandidateSampler`]),
//! corpus sentences for each form are offered to the operator shortest
//! first ([`SentenceCurator`]), an accepted sentence is tied to a sense of
//! the entry ([`SenseResolver`]) and submitted. The [`Orchestrator`] runs
//! these steps as a state machine and records every finished form in the
//! exclusion list.
//!
//! # Usage
//!
//! ```no_run
//! use lexuse::{ConsolePrompter, ExclusionStore, LexUseConfig, Orchestrator, RunContext};
//!
//! let config = LexUseConfig::default();
//! let mut store = ExclusionStore::open(&config.exclusion_path).unwrap();
//! let mut ctx = RunContext::live(config).unwrap();
//! let mut prompter = ConsolePrompter::stdio();
//!
//! let summary = Orchestrator::new(&mut ctx, &mut store, &mut prompter).run().unwrap();
//! println!("Edits saved: {}", summary.edits_saved);
//! ```

mod candidate;
mod curator;
mod orchestrator;
mod resolver;
mod sampler;

pub use candidate::{CandidateSentence, rank_candidates};
pub use curator::{SearchOutcome, SentenceCurator};
pub use orchestrator::{
    Curation, ExclusionReason, Orchestrator, RunSummary, State, introduction,
};
pub use resolver::{Resolution, SenseResolver};
pub use sampler::CandidateSampler;
