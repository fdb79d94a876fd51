//! LexUse: semi-automatic usage examples for lexemes.
//!
//! LexUse draws lexical forms that still lack a usage example from a
//! knowledge graph, finds sentences containing them in a document corpus,
//! and lets an operator pick a sentence and the sense it demonstrates. The
//! result is written back as a referenced usage example statement.
//!
//! # Core Principles
//!
//! - **Operator in the loop**: Nothing is written without an explicit yes
//! - **Full provenance**: Every example cites its corpus, document and dates
//! - **Never twice**: Handled forms go to a persistent exclusion list
//!
//! # Example
//!
//! ```no_run
//! use lexuse::{ExclusionStore, LexUseConfig, Orchestrator, RunContext};
//! use lexuse::prompt::ConsolePrompter;
//!
//! let config = LexUseConfig::default().with_query_window(20, 0);
//! let mut store = ExclusionStore::open(&config.exclusion_path).unwrap();
//! let mut ctx = RunContext::live(config).unwrap();
//! let mut prompter = ConsolePrompter::stdio();
//!
//! let summary = Orchestrator::new(&mut ctx, &mut store, &mut prompter).run().unwrap();
//! println!("Forms excluded: {}", summary.excluded);
//! ```

pub mod config;
pub mod curation;
pub mod edit;
pub mod error;
pub mod exclusion;
pub mod lexeme;
pub mod prompt;
pub mod services;

mod context;

pub use config::{Credentials, Language, LexUseConfig};
pub use context::RunContext;
pub use curation::{
    CandidateSampler, CandidateSentence, ExclusionReason, Orchestrator, Resolution, RunSummary,
    SenseResolver, SentenceCurator,
};
pub use edit::{EditSubmitter, UsageExampleEdit};
pub use error::{LexUseError, Result};
pub use exclusion::{ExclusionRecord, ExclusionStore};
pub use lexeme::{LexicalForm, Sense};
pub use prompt::{ConsolePrompter, Prompter, Verdict};
