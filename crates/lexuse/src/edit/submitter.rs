//! Submitting usage example edits.

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::LexUseConfig;
use crate::context::RunContext;
use crate::curation::CandidateSentence;
use crate::error::{LexUseError, Result};
use crate::lexeme::{LexicalForm, Sense};

use super::UsageExampleEdit;
use super::statement::usage_example_statement;

/// What happened to a submitted edit.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The write API accepted the statement.
    pub saved: bool,

    /// The entry was added to the watch list.
    pub watched: bool,

    /// Raw write API response.
    pub payload: Value,
}

/// Builds and sends usage example edits.
#[derive(Debug, Clone)]
pub struct EditSubmitter {
    language: String,
    summary: String,
    watch: bool,
    debug_json: bool,
}

impl EditSubmitter {
    /// Create a submitter from the run configuration.
    pub fn new(config: &LexUseConfig) -> Self {
        Self {
            language: config.language.code.clone(),
            summary: config.edit_summary.clone(),
            watch: config.watch_edited,
            debug_json: config.debug_json,
        }
    }

    /// Assemble an edit retrieved today.
    ///
    /// Fails without touching the network when the document has no
    /// publication date.
    pub fn prepare(
        &self,
        form: &LexicalForm,
        sense: &Sense,
        candidate: &CandidateSentence,
    ) -> Result<UsageExampleEdit> {
        self.prepare_on(form, sense, candidate, Utc::now().date_naive())
    }

    /// Assemble an edit with an explicit retrieval date.
    pub fn prepare_on(
        &self,
        form: &LexicalForm,
        sense: &Sense,
        candidate: &CandidateSentence,
        fetch_date: NaiveDate,
    ) -> Result<UsageExampleEdit> {
        let publication_date =
            candidate
                .publication_date
                .ok_or_else(|| LexUseError::MissingPublicationDate {
                    document_id: candidate.source_document_id.clone(),
                })?;

        Ok(UsageExampleEdit {
            entry_id: form.entry_id.clone(),
            form_id: form.form_id.clone(),
            sense_id: sense.id.clone(),
            sentence: candidate.text.clone(),
            source_document_id: candidate.source_document_id.clone(),
            publication_date,
            fetch_date,
        })
    }

    /// Append the statement to the entry and watch it on success.
    ///
    /// A rejected edit is reported through [`SubmitOutcome::saved`]; errors
    /// are transport or login failures. A failing watch-list request only
    /// logs, the edit is saved at that point.
    pub fn submit(&self, ctx: &mut RunContext, edit: &UsageExampleEdit) -> Result<SubmitOutcome> {
        let statement = usage_example_statement(edit, &self.language, ctx.corpus.provenance());
        if self.debug_json {
            debug!(statement = %statement, "usage example statement");
        }

        let result = ctx
            .writer
            .append_statement(&edit.entry_id, &statement, &self.summary)?;
        if self.debug_json {
            debug!(payload = %result.payload, "write API result");
        }

        if !result.success {
            warn!(entry = %edit.entry_id, payload = %result.payload, "edit was rejected");
            return Ok(SubmitOutcome {
                saved: false,
                watched: false,
                payload: result.payload,
            });
        }
        info!(entry = %edit.entry_id, form = %edit.form_id, sense = %edit.sense_id, "usage example added");

        let mut watched = false;
        if self.watch {
            match ctx.writer.watch(&edit.entry_id) {
                Ok(response) => {
                    if self.debug_json {
                        debug!(response = %response, "watch API result");
                    }
                    watched = true;
                }
                Err(e) => warn!(entry = %edit.entry_id, error = %e, "could not add entry to watch list"),
            }
        }

        Ok(SubmitOutcome {
            saved: true,
            watched,
            payload: result.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryCorpus, InMemoryLexemes, RecordingWriter};

    fn form() -> LexicalForm {
        LexicalForm::new("L1", "L1-F1", "banken", "noun")
    }

    fn sense() -> Sense {
        Sense::new("L1-S1", "penninginrättning", "sv").with_concept("Q22687")
    }

    fn dated() -> CandidateSentence {
        CandidateSentence::new("Banken stängde tidigt.", "H501", NaiveDate::from_ymd_opt(2020, 3, 1))
    }

    fn context(writer: RecordingWriter) -> RunContext {
        RunContext::new(
            LexUseConfig::default(),
            Box::new(InMemoryLexemes::new(vec![])),
            Box::new(InMemoryCorpus::new()),
            Box::new(writer),
        )
    }

    #[test]
    fn test_missing_publication_date_is_rejected() {
        let submitter = EditSubmitter::new(&LexUseConfig::default());
        let undated = CandidateSentence::new("Banken stängde tidigt.", "H502", None);
        let err = submitter.prepare(&form(), &sense(), &undated).unwrap_err();
        assert!(matches!(err, LexUseError::MissingPublicationDate { ref document_id } if document_id == "H502"));
    }

    #[test]
    fn test_submit_appends_and_watches() {
        let writer = RecordingWriter::new();
        let log = writer.log();
        let mut ctx = context(writer);
        let submitter = EditSubmitter::new(&ctx.config);

        let edit = submitter.prepare(&form(), &sense(), &dated()).unwrap();
        let outcome = submitter.submit(&mut ctx, &edit).unwrap();

        assert!(outcome.saved);
        assert!(outcome.watched);
        let log = log.borrow();
        assert_eq!(log.edits.len(), 1);
        assert_eq!(log.edits[0].0, "L1");
        assert_eq!(log.edits[0].2, "Added usage example with [[Wikidata:LexUse]]");
        assert_eq!(log.watched, vec!["L1"]);
    }

    #[test]
    fn test_watch_failure_keeps_edit() {
        let writer = RecordingWriter::new().failing_watch();
        let log = writer.log();
        let mut ctx = context(writer);
        let submitter = EditSubmitter::new(&ctx.config);

        let edit = submitter.prepare(&form(), &sense(), &dated()).unwrap();
        let outcome = submitter.submit(&mut ctx, &edit).unwrap();

        assert!(outcome.saved);
        assert!(!outcome.watched);
        assert_eq!(log.borrow().edits.len(), 1);
    }

    #[test]
    fn test_rejected_edit_is_not_watched() {
        let writer = RecordingWriter::new().rejecting();
        let log = writer.log();
        let mut ctx = context(writer);
        let submitter = EditSubmitter::new(&ctx.config);

        let edit = submitter.prepare(&form(), &sense(), &dated()).unwrap();
        let outcome = submitter.submit(&mut ctx, &edit).unwrap();

        assert!(!outcome.saved);
        assert!(log.borrow().watched.is_empty());
    }

    #[test]
    fn test_watch_disabled() {
        let writer = RecordingWriter::new();
        let log = writer.log();
        let mut ctx = context(writer);
        let submitter = EditSubmitter::new(&ctx.config.clone().with_watch_edited(false));

        let edit = submitter.prepare(&form(), &sense(), &dated()).unwrap();
        assert!(!submitter.submit(&mut ctx, &edit).unwrap().watched);
        assert!(log.borrow().watched.is_empty());
    }
}
