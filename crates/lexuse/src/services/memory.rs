//! In-memory collaborators for headless runs and tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::{Value, json};

use crate::error::{LexUseError, Result};
use crate::lexeme::{LexicalForm, Sense};

use super::provider::{
    CorpusProvenance, CorpusSearch, EntityWriter, LexemeSource, SentenceBatch, WriteResult,
};

/// Lexeme source backed by fixed forms and senses.
#[derive(Debug, Default)]
pub struct InMemoryLexemes {
    forms: Vec<LexicalForm>,
    senses: HashMap<String, Vec<Sense>>,
    sense_counts: HashMap<String, usize>,
    failing: bool,
}

impl InMemoryLexemes {
    /// Create a source returning `forms`.
    pub fn new(forms: Vec<LexicalForm>) -> Self {
        Self {
            forms,
            ..Self::default()
        }
    }

    /// Set the senses of an entry.
    pub fn with_senses(mut self, entry_id: impl Into<String>, senses: Vec<Sense>) -> Self {
        self.senses.insert(entry_id.into(), senses);
        self
    }

    /// Report `count` senses for an entry regardless of the senses set.
    pub fn with_sense_count(mut self, entry_id: impl Into<String>, count: usize) -> Self {
        self.sense_counts.insert(entry_id.into(), count);
        self
    }

    /// Make every query fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(LexUseError::service("memory", "query endpoint unavailable"));
        }
        Ok(())
    }
}

impl LexemeSource for InMemoryLexemes {
    fn fetch_forms(&self) -> Result<Vec<LexicalForm>> {
        self.check()?;
        Ok(self.forms.clone())
    }

    fn fetch_senses(&self, entry_id: &str) -> Result<Vec<Sense>> {
        self.check()?;
        Ok(self.senses.get(entry_id).cloned().unwrap_or_default())
    }

    fn count_senses(&self, entry_id: &str) -> Result<usize> {
        self.check()?;
        Ok(self
            .sense_counts
            .get(entry_id)
            .copied()
            .unwrap_or_else(|| self.senses.get(entry_id).map_or(0, Vec::len)))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Corpus backed by prepared batches per form id.
#[derive(Debug)]
pub struct InMemoryCorpus {
    batches: HashMap<String, SentenceBatch>,
    failing: HashSet<String>,
    searched: RefCell<Vec<String>>,
    provenance: CorpusProvenance,
}

impl Default for InMemoryCorpus {
    fn default() -> Self {
        Self {
            batches: HashMap::new(),
            failing: HashSet::new(),
            searched: RefCell::new(Vec::new()),
            provenance: CorpusProvenance {
                stated_in: "Q21592569".to_string(),
                document_property: "P8433".to_string(),
            },
        }
    }
}

impl InMemoryCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch returned for a form.
    pub fn with_batch(mut self, form_id: impl Into<String>, batch: SentenceBatch) -> Self {
        self.batches.insert(form_id.into(), batch);
        self
    }

    /// Make searches for a form fail.
    pub fn failing_for(mut self, form_id: impl Into<String>) -> Self {
        self.failing.insert(form_id.into());
        self
    }

    /// Form ids searched so far, in order.
    pub fn searched(&self) -> Vec<String> {
        self.searched.borrow().clone()
    }
}

impl CorpusSearch for InMemoryCorpus {
    fn search(&self, form: &LexicalForm) -> Result<SentenceBatch> {
        self.searched.borrow_mut().push(form.form_id.clone());
        if self.failing.contains(&form.form_id) {
            return Err(LexUseError::service("memory", "corpus unavailable"));
        }
        Ok(self.batches.get(&form.form_id).cloned().unwrap_or_default())
    }

    fn provenance(&self) -> &CorpusProvenance {
        &self.provenance
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Everything a [`RecordingWriter`] was asked to do.
#[derive(Debug, Default)]
pub struct WriterLog {
    /// (entry id, statement, summary) of every edit attempt.
    pub edits: Vec<(String, Value, String)>,

    /// Entries added to the watch list.
    pub watched: Vec<String>,
}

/// Writer that records edits instead of sending them.
///
/// Keep a handle from [`log`](Self::log) before boxing the writer to
/// inspect it afterwards.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    log: Rc<RefCell<WriterLog>>,
    reject_edits: bool,
    fail_edits: bool,
    fail_login: bool,
    fail_watch: bool,
}

impl RecordingWriter {
    /// Create a writer that accepts every edit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the log.
    pub fn log(&self) -> Rc<RefCell<WriterLog>> {
        Rc::clone(&self.log)
    }

    /// Answer edits with an API error payload.
    pub fn rejecting(mut self) -> Self {
        self.reject_edits = true;
        self
    }

    /// Fail edits at the transport level.
    pub fn failing(mut self) -> Self {
        self.fail_edits = true;
        self
    }

    /// Refuse the login, as the wiki does for a wrong bot password.
    pub fn unauthorized(mut self) -> Self {
        self.fail_login = true;
        self
    }

    /// Fail watch-list requests.
    pub fn failing_watch(mut self) -> Self {
        self.fail_watch = true;
        self
    }
}

impl EntityWriter for RecordingWriter {
    fn append_statement(
        &mut self,
        entry_id: &str,
        statement: &Value,
        summary: &str,
    ) -> Result<WriteResult> {
        self.log.borrow_mut().edits.push((
            entry_id.to_string(),
            statement.clone(),
            summary.to_string(),
        ));

        if self.fail_login {
            return Err(LexUseError::Auth("WrongPass".to_string()));
        }
        if self.fail_edits {
            return Err(LexUseError::service("memory", "write API unavailable"));
        }
        if self.reject_edits {
            return Ok(WriteResult {
                success: false,
                payload: json!({"error": {"code": "failed-save", "info": "rejected"}}),
            });
        }
        Ok(WriteResult {
            success: true,
            payload: json!({"success": 1, "entity": {"id": entry_id}}),
        })
    }

    fn watch(&mut self, entry_id: &str) -> Result<String> {
        if self.fail_watch {
            return Err(LexUseError::service("memory", "watch list unavailable"));
        }
        self.log.borrow_mut().watched.push(entry_id.to_string());
        Ok(json!({"watch": [{"title": entry_id, "watched": true}]}).to_string())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SentenceSource;

    #[test]
    fn test_sense_count_defaults_to_senses() {
        let lexemes = InMemoryLexemes::new(vec![])
            .with_senses("L1", vec![Sense::new("L1-S1", "x", "en")])
            .with_sense_count("L2", 4);
        assert_eq!(lexemes.count_senses("L1").unwrap(), 1);
        assert_eq!(lexemes.count_senses("L2").unwrap(), 4);
        assert_eq!(lexemes.count_senses("L3").unwrap(), 0);
    }

    #[test]
    fn test_corpus_records_searches() {
        let mut batch = SentenceBatch::new();
        batch.insert("En mening.".to_string(), SentenceSource::new("D1", None));
        let corpus = InMemoryCorpus::new()
            .with_batch("L1-F1", batch)
            .failing_for("L2-F1");

        let form = LexicalForm::new("L1", "L1-F1", "mening", "noun");
        assert_eq!(corpus.search(&form).unwrap().len(), 1);
        let broken = LexicalForm::new("L2", "L2-F1", "ord", "noun");
        assert!(corpus.search(&broken).is_err());
        assert_eq!(corpus.searched(), vec!["L1-F1", "L2-F1"]);
    }

    #[test]
    fn test_writer_log_handle() {
        let mut writer = RecordingWriter::new();
        let log = writer.log();
        writer.append_statement("L1", &json!({}), "summary").unwrap();
        writer.watch("L1").unwrap();
        assert_eq!(log.borrow().edits.len(), 1);
        assert_eq!(log.borrow().watched, vec!["L1"]);
    }
}
