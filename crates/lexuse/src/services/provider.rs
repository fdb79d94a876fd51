//! Collaborator traits and the types they exchange.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::lexeme::{LexicalForm, Sense};

/// Where a candidate sentence was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSource {
    /// Id of the source document in the corpus.
    pub document_id: String,

    /// Publication date of the document, if the corpus knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
}

impl SentenceSource {
    /// Create a source entry.
    pub fn new(document_id: impl Into<String>, publication_date: Option<NaiveDate>) -> Self {
        Self {
            document_id: document_id.into(),
            publication_date,
        }
    }
}

/// Candidate sentences of one search, keyed by sentence text in corpus order.
///
/// A sentence found in two documents keeps the last document.
pub type SentenceBatch = IndexMap<String, SentenceSource>;

/// How edits cite a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusProvenance {
    /// Item of the corpus, cited with "stated in".
    pub stated_in: String,

    /// External-id property holding the document id.
    pub document_property: String,
}

/// Read access to lexical entries in the knowledge graph.
pub trait LexemeSource {
    /// Forms of entries that still lack a usage example.
    fn fetch_forms(&self) -> Result<Vec<LexicalForm>>;

    /// Senses of an entry that carry a concept link and a gloss in the
    /// configured language.
    fn fetch_senses(&self, entry_id: &str) -> Result<Vec<Sense>>;

    /// Number of senses the entry has at all.
    fn count_senses(&self, entry_id: &str) -> Result<usize>;

    /// Name of this source (for logging).
    fn name(&self) -> &str;
}

/// Search for candidate sentences in a document corpus.
pub trait CorpusSearch {
    /// Sentences that use `form`. An empty batch means nothing suitable
    /// was found; an error means the search itself failed.
    fn search(&self, form: &LexicalForm) -> Result<SentenceBatch>;

    /// Citation details for edits based on this corpus.
    fn provenance(&self) -> &CorpusProvenance;

    /// Name of this corpus (for logging).
    fn name(&self) -> &str;
}

/// Answer of the write API to an edit.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    /// Whether the edit was saved.
    pub success: bool,

    /// Raw API response.
    pub payload: Value,
}

/// Write access to the knowledge graph for one authenticated operator.
pub trait EntityWriter {
    /// Append `statement` to the entity in a single edit. Existing
    /// statements are never replaced.
    fn append_statement(&mut self, entry_id: &str, statement: &Value, summary: &str)
    -> Result<WriteResult>;

    /// Add the entity to the operator's watch list. Returns the raw
    /// response text.
    fn watch(&mut self, entry_id: &str) -> Result<String>;

    /// Name of this writer (for logging).
    fn name(&self) -> &str;
}
