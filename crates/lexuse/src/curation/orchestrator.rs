//! The curation run as an explicit state machine.
//!
//! ```text
//! Sampling -> Curating -> Resolving -> Submitting -> Excluding -> Sampling
//!    |            |  ^         |                         ^
//!    v            |  +---------+ (no sense)              |
//!  Done           +--------------------------------------+ (skip / exhausted)
//! ```
//!
//! The exclusion list is written only in `Excluding`, after a decision
//! about the form is complete. A form whose candidates ran out only
//! because of gaps in the data (no gloss in the run language, no
//! publication date) goes back to `Sampling` unexcluded.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::RunContext;
use crate::edit::EditSubmitter;
use crate::error::{LexUseError, Result};
use crate::exclusion::{ExclusionRecord, ExclusionStore};
use crate::lexeme::{LexicalForm, Sense};
use crate::prompt::{Prompter, Verdict};

use super::candidate::CandidateSentence;
use super::curator::{SearchOutcome, SentenceCurator};
use super::resolver::{Resolution, SenseResolver};
use super::sampler::CandidateSampler;

/// Why a form was added to the exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// A usage example was saved.
    Completed,
    /// The write failed; the form is not retried this run.
    SubmissionFailed,
    /// The operator skipped the form.
    Skipped,
    /// Every candidate sentence was rejected.
    Exhausted,
    /// The corpus had no usable sentence.
    NoCandidates,
    /// The corpus search failed.
    SearchFailed,
}

/// Iteration over the candidates of one form.
#[derive(Debug)]
pub struct Curation {
    pub form: LexicalForm,
    candidates: Vec<CandidateSentence>,
    next: usize,
    data_gap: bool,
}

impl Curation {
    fn new(form: LexicalForm, candidates: Vec<CandidateSentence>) -> Self {
        Self {
            form,
            candidates,
            next: 0,
            data_gap: false,
        }
    }
}

/// Orchestrator states.
#[derive(Debug)]
pub enum State {
    Sampling,
    Curating(Curation),
    Resolving(Curation, CandidateSentence),
    Submitting(Curation, CandidateSentence, Sense),
    Excluding(LexicalForm, ExclusionReason),
    Done,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Forms returned by the query.
    pub forms: usize,
    /// Forms drawn, including excluded ones.
    pub drawn: usize,
    /// Draws skipped because the form was already excluded.
    pub skipped_excluded: usize,
    /// Usage examples saved.
    pub edits_saved: usize,
    /// Edits rejected or failed in transit.
    pub failed_submissions: usize,
    /// Accepted sentences dropped for lack of a publication date.
    pub missing_publication_dates: usize,
    /// Forms added to the exclusion list.
    pub excluded: usize,
}

/// Ask the operator to start a run.
pub fn introduction(prompter: &mut dyn Prompter) -> Result<bool> {
    prompter.confirm(
        "This tool enables you to semi-automatically add usage examples to lexemes with \
         both good senses and forms (with P5137 and grammatical features respectively).\n\
         Please pay attention to the lexical category of the lexeme.\n\
         Also try adding only short and concise examples to avoid bloat and maximise usefulness.\n\
         This tool adds edited lexemes (indefinitely) to your watchlist.\n\
         Continue?",
    )
}

/// Drives one curation run.
pub struct Orchestrator<'a> {
    ctx: &'a mut RunContext,
    store: &'a mut ExclusionStore,
    prompter: &'a mut dyn Prompter,
    curator: SentenceCurator,
    resolver: SenseResolver,
    submitter: EditSubmitter,
    seed: Option<u64>,
    summary: RunSummary,
    fatal: Option<LexUseError>,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over a context, an exclusion list and an
    /// operator.
    pub fn new(
        ctx: &'a mut RunContext,
        store: &'a mut ExclusionStore,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        let curator = SentenceCurator::new(ctx.config.show_sentence_sources);
        let resolver = SenseResolver::new(&ctx.config);
        let submitter = EditSubmitter::new(&ctx.config);
        Self {
            ctx,
            store,
            prompter,
            curator,
            resolver,
            submitter,
            seed: None,
            summary: RunSummary::default(),
            fatal: None,
        }
    }

    /// Draw forms in a reproducible order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run until every form has been drawn.
    ///
    /// A failing form query, a failed login and a closed console end the
    /// run with an error; everything else is handled per form. A form whose
    /// submission failed is excluded before the error is returned.
    pub fn run(mut self) -> Result<RunSummary> {
        let forms = self.ctx.lexemes.fetch_forms()?;
        self.summary.forms = forms.len();

        if forms.is_empty() {
            self.prompter.say(&format!(
                "No {} lexemes containing both a sense, forms with grammatical features \
                 and missing a usage example was found",
                self.ctx.config.language.name
            ));
            return Ok(self.summary);
        }

        self.prompter
            .say(&format!("Got {} suitable forms from Wikidata", forms.len()));
        self.prompter.say("Going through the list of forms at random.");

        let mut sampler = match self.seed {
            Some(seed) => CandidateSampler::with_seed(forms, seed),
            None => CandidateSampler::new(forms),
        };

        let mut state = State::Sampling;
        loop {
            state = match state {
                State::Sampling => self.sample(&mut sampler),
                State::Curating(curation) => self.curate(curation)?,
                State::Resolving(curation, candidate) => self.resolve(curation, candidate)?,
                State::Submitting(curation, candidate, sense) => {
                    self.submit(curation, candidate, sense)?
                }
                State::Excluding(form, reason) => {
                    let next = self.exclude(form, reason);
                    if let Some(e) = self.fatal.take() {
                        return Err(e);
                    }
                    next
                }
                State::Done => break,
            };
        }

        self.summary.drawn = sampler.drawn();
        self.summary.skipped_excluded = sampler.skipped_excluded();
        Ok(self.summary)
    }

    fn sample(&mut self, sampler: &mut CandidateSampler) -> State {
        let language = self.ctx.config.language.code.clone();
        let Some(form) = sampler.next_eligible(self.store, &language) else {
            self.prompter
                .say("No more results. Run the tool again to continue");
            return State::Done;
        };

        self.prompter.say(&format!(
            "Trying to find examples for the {} lexeme form: {} with id: {}",
            form.category, form.word, form.form_id
        ));

        match self.curator.gather(self.ctx.corpus.as_ref(), &form) {
            SearchOutcome::Found(candidates) => State::Curating(Curation::new(form, candidates)),
            SearchOutcome::Empty => {
                self.prompter.say(
                    "Added to exclude list because no suitable sentences were found",
                );
                State::Excluding(form, ExclusionReason::NoCandidates)
            }
            SearchOutcome::Failed(e) => {
                if self.ctx.config.exclude_on_search_failure {
                    self.prompter.say(&format!(
                        "Added to exclude list because the corpus search failed: {}",
                        e
                    ));
                    State::Excluding(form, ExclusionReason::SearchFailed)
                } else {
                    self.prompter
                        .say(&format!("Corpus search failed, moving on: {}", e));
                    State::Sampling
                }
            }
        }
    }

    fn curate(&mut self, mut curation: Curation) -> Result<State> {
        let total = curation.candidates.len();
        let Some(candidate) = curation.candidates.get(curation.next).cloned() else {
            if curation.data_gap {
                info!(form = %curation.form.form_id, "candidates ran out on missing data, not excluding");
                self.prompter.say(&format!(
                    "Not adding {} to the exclude list so it can be tried again once the data is fixed",
                    curation.form.word
                ));
                return Ok(State::Sampling);
            }
            debug!(form = %curation.form.form_id, "all candidates rejected");
            return Ok(State::Excluding(curation.form, ExclusionReason::Exhausted));
        };
        curation.next += 1;

        let verdict = self.curator.present(
            &mut *self.prompter,
            &curation.form,
            &candidate,
            curation.next,
            total,
        )?;

        Ok(match verdict {
            Verdict::Accept => State::Resolving(curation, candidate),
            Verdict::Reject => State::Curating(curation),
            Verdict::Skip => State::Excluding(curation.form, ExclusionReason::Skipped),
        })
    }

    fn resolve(&mut self, mut curation: Curation, candidate: CandidateSentence) -> Result<State> {
        let resolved = self.resolver.resolve(
            self.ctx.lexemes.as_ref(),
            &mut *self.prompter,
            &curation.form,
        );

        match resolved {
            Ok(Resolution::Matched(sense)) => Ok(State::Submitting(curation, candidate, sense)),
            Ok(Resolution::Declined) => Ok(State::Curating(curation)),
            Ok(Resolution::MissingGloss) => {
                curation.data_gap = true;
                Ok(State::Curating(curation))
            }
            Err(e @ LexUseError::Service { .. }) => {
                warn!(entry = %curation.form.entry_id, error = %e, "sense lookup failed");
                self.prompter
                    .say(&format!("Could not fetch senses: {}", e));
                Ok(State::Curating(curation))
            }
            Err(e) => Err(e),
        }
    }

    fn submit(
        &mut self,
        mut curation: Curation,
        candidate: CandidateSentence,
        sense: Sense,
    ) -> Result<State> {
        let edit = match self.submitter.prepare(&curation.form, &sense, &candidate) {
            Ok(edit) => edit,
            Err(e @ LexUseError::MissingPublicationDate { .. }) => {
                self.summary.missing_publication_dates += 1;
                self.prompter.say(&format!(
                    "{}. We have no fallback for that at the moment. Abort adding usage example.",
                    e
                ));
                curation.data_gap = true;
                return Ok(State::Curating(curation));
            }
            Err(e) => return Err(e),
        };

        let form = curation.form;
        match self.submitter.submit(self.ctx, &edit) {
            Ok(outcome) if outcome.saved => {
                self.summary.edits_saved += 1;
                self.prompter.say(&format!(
                    "Successfully added usage example to {}",
                    self.ctx.config.entity_url(&edit.entry_id)
                ));
                if outcome.watched {
                    self.prompter
                        .say(&format!("Added {} to your watchlist", edit.entry_id));
                }
                Ok(State::Excluding(form, ExclusionReason::Completed))
            }
            Ok(outcome) => {
                self.summary.failed_submissions += 1;
                self.prompter.say(&format!(
                    "The usage example was not saved: {}",
                    outcome.payload
                ));
                Ok(State::Excluding(form, ExclusionReason::SubmissionFailed))
            }
            Err(e) => {
                self.summary.failed_submissions += 1;
                warn!(entry = %edit.entry_id, error = %e, "submission failed");
                self.prompter
                    .say(&format!("The usage example was not saved: {}", e));
                // Only a per-edit failure lets the run go on; a bad login
                // fails every later edit too.
                if !matches!(e, LexUseError::Service { .. }) {
                    self.fatal = Some(e);
                }
                Ok(State::Excluding(form, ExclusionReason::SubmissionFailed))
            }
        }
    }

    fn exclude(&mut self, form: LexicalForm, reason: ExclusionReason) -> State {
        let language = &self.ctx.config.language.code;
        info!(form = %form.form_id, word = %form.word, ?reason, "excluding form");
        self.store
            .add(ExclusionRecord::now(form.form_id, form.word, language.clone()));
        self.summary.excluded += 1;
        State::Sampling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexUseConfig;
    use crate::prompt::ScriptedPrompter;
    use crate::services::{InMemoryCorpus, InMemoryLexemes, RecordingWriter};

    fn context(lexemes: InMemoryLexemes) -> RunContext {
        RunContext::new(
            LexUseConfig::default().with_pause_secs(0),
            Box::new(lexemes),
            Box::new(InMemoryCorpus::new()),
            Box::new(RecordingWriter::new()),
        )
    }

    #[test]
    fn test_empty_query_result_ends_run() {
        let mut ctx = context(InMemoryLexemes::new(vec![]));
        let mut store = ExclusionStore::in_memory();
        let mut prompter = ScriptedPrompter::new([]);

        let summary = Orchestrator::new(&mut ctx, &mut store, &mut prompter)
            .run()
            .unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(prompter.saw("No Swedish lexemes containing both a sense"));
    }

    #[test]
    fn test_failing_query_is_fatal() {
        let mut ctx = context(InMemoryLexemes::new(vec![]).failing());
        let mut store = ExclusionStore::in_memory();
        let mut prompter = ScriptedPrompter::new([]);

        let result = Orchestrator::new(&mut ctx, &mut store, &mut prompter).run();
        assert!(matches!(result, Err(LexUseError::Service { .. })));
    }

    #[test]
    fn test_form_without_sentences_is_excluded() {
        let form = LexicalForm::new("L1", "L1-F1", "ord", "noun");
        let mut ctx = context(InMemoryLexemes::new(vec![form]));
        let mut store = ExclusionStore::in_memory();
        let mut prompter = ScriptedPrompter::new([]);

        let summary = Orchestrator::new(&mut ctx, &mut store, &mut prompter)
            .with_seed(1)
            .run()
            .unwrap();

        assert_eq!(summary.drawn, 1);
        assert_eq!(summary.excluded, 1);
        assert!(store.is_excluded("L1-F1", "sv"));
        assert!(prompter.saw("No more results."));
    }
}
