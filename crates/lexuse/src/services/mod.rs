//! External collaborators of the curation workflow.
//!
//! The workflow talks to three services through traits:
//!
//! - [`LexemeSource`] - the graph query endpoint (forms and senses)
//! - [`CorpusSearch`] - a document corpus returning candidate sentences
//! - [`EntityWriter`] - the wiki write API (edits and watch list)
//!
//! # Supported Services
//!
//! - **Wikidata Query Service** - [`WikidataQueryService`], SPARQL over HTTP
//! - **Riksdagen open data** - [`RiksdagenCorpus`], Swedish parliament documents
//! - **Wikibase action API** - [`WikibaseClient`], bot-password login
//!
//! In-memory implementations live in [`memory`] for headless runs.

pub mod memory;
mod provider;
mod riksdagen;
mod wikibase;
mod wikidata;

pub use memory::{InMemoryCorpus, InMemoryLexemes, RecordingWriter, WriterLog};
pub use provider::{
    CorpusProvenance, CorpusSearch, EntityWriter, LexemeSource, SentenceBatch, SentenceSource,
    WriteResult,
};
pub use riksdagen::RiksdagenCorpus;
pub use wikibase::WikibaseClient;
pub use wikidata::WikidataQueryService;
