//! Fetching and presenting candidate sentences for a form.

use tracing::{info, warn};

use crate::error::{LexUseError, Result};
use crate::lexeme::LexicalForm;
use crate::prompt::{Prompter, Verdict};
use crate::services::CorpusSearch;

use super::candidate::{CandidateSentence, rank_candidates};

/// Result of searching the corpus for a form.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Candidates, shortest first.
    Found(Vec<CandidateSentence>),
    /// The search worked but nothing usable came back.
    Empty,
    /// The search itself failed.
    Failed(LexUseError),
}

/// Finds candidate sentences and asks the operator about them.
#[derive(Debug, Clone, Default)]
pub struct SentenceCurator {
    show_sources: bool,
}

impl SentenceCurator {
    /// Create a curator.
    pub fn new(show_sources: bool) -> Self {
        Self { show_sources }
    }

    /// Search the corpus for `form` and rank the result.
    pub fn gather(&self, corpus: &dyn CorpusSearch, form: &LexicalForm) -> SearchOutcome {
        match corpus.search(form) {
            Ok(batch) if batch.is_empty() => {
                info!(word = %form.word, form = %form.form_id, corpus = corpus.name(), "no sentences found");
                SearchOutcome::Empty
            }
            Ok(batch) => SearchOutcome::Found(rank_candidates(batch)),
            Err(e) => {
                warn!(word = %form.word, form = %form.form_id, corpus = corpus.name(), error = %e, "corpus search failed");
                SearchOutcome::Failed(e)
            }
        }
    }

    /// Ask the operator whether `candidate` is a usable example for `form`.
    ///
    /// `position` is one-based.
    pub fn present(
        &self,
        prompter: &mut dyn Prompter,
        form: &LexicalForm,
        candidate: &CandidateSentence,
        position: usize,
        total: usize,
    ) -> Result<Verdict> {
        prompter.say(&format!("Presenting sentence {}/{}", position, total));

        let mut message = format!(
            "Found the following sentence with {} words. Is it suitable as a usage example for the form '{}'?\n'{}'",
            candidate.word_count(),
            form.word,
            candidate.text
        );
        if self.show_sources {
            let date = candidate
                .publication_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown date".to_string());
            message.push_str(&format!("\n(document {}, {})", candidate.source_document_id, date));
        }

        prompter.review(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::services::{InMemoryCorpus, SentenceBatch, SentenceSource};
    use chrono::NaiveDate;

    fn form() -> LexicalForm {
        LexicalForm::new("L1", "L1-F1", "banken", "noun")
    }

    #[test]
    fn test_gather_distinguishes_empty_and_failed() {
        let curator = SentenceCurator::default();
        let empty = InMemoryCorpus::new();
        assert!(matches!(curator.gather(&empty, &form()), SearchOutcome::Empty));

        let broken = InMemoryCorpus::new().failing_for("L1-F1");
        assert!(matches!(curator.gather(&broken, &form()), SearchOutcome::Failed(_)));
    }

    #[test]
    fn test_gather_ranks_shortest_first() {
        let mut batch = SentenceBatch::new();
        batch.insert("Banken har en lång och krånglig historia bakom sig.".to_string(), SentenceSource::new("A", None));
        batch.insert("Banken stängde.".to_string(), SentenceSource::new("B", None));
        let corpus = InMemoryCorpus::new().with_batch("L1-F1", batch);

        let SearchOutcome::Found(candidates) = SentenceCurator::default().gather(&corpus, &form()) else {
            panic!("expected candidates");
        };
        assert_eq!(candidates[0].source_document_id, "B");
        assert_eq!(candidates[1].source_document_id, "A");
    }

    #[test]
    fn test_present_shows_word_count_and_source() {
        let candidate = CandidateSentence::new(
            "Banken stängde tidigt i dag.",
            "H501",
            NaiveDate::from_ymd_opt(2020, 3, 1),
        );
        let mut prompter = ScriptedPrompter::new([Answer::Skip]);
        let verdict = SentenceCurator::new(true)
            .present(&mut prompter, &form(), &candidate, 1, 3)
            .unwrap();

        assert_eq!(verdict, Verdict::Skip);
        assert!(prompter.saw("Presenting sentence 1/3"));
        assert!(prompter.saw("with 5 words"));
        assert!(prompter.saw("the form 'banken'"));
        assert!(prompter.saw("(document H501, 2020-03-01)"));
    }
}
