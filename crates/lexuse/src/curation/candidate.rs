//! Candidate sentences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::{SentenceBatch, SentenceSource};

/// A corpus sentence that may become a usage example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSentence {
    /// Sentence text.
    pub text: String,

    /// Id of the document the sentence comes from.
    pub source_document_id: String,

    /// Publication date of that document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
}

impl CandidateSentence {
    /// Create a candidate.
    pub fn new(
        text: impl Into<String>,
        source_document_id: impl Into<String>,
        publication_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            text: text.into(),
            source_document_id: source_document_id.into(),
            publication_date,
        }
    }

    /// Build a candidate from a batch entry.
    pub fn from_source(text: String, source: SentenceSource) -> Self {
        Self {
            text,
            source_document_id: source.document_id,
            publication_date: source.publication_date,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Order a batch shortest first; sentences of equal length keep corpus order.
pub fn rank_candidates(batch: SentenceBatch) -> Vec<CandidateSentence> {
    let mut candidates: Vec<CandidateSentence> = batch
        .into_iter()
        .map(|(text, source)| CandidateSentence::from_source(text, source))
        .collect();
    candidates.sort_by_key(CandidateSentence::word_count);
    candidates
}
