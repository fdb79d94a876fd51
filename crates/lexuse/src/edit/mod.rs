//! Writing usage examples to the knowledge graph.
//!
//! An accepted sentence with a resolved sense becomes a
//! [`UsageExampleEdit`]. The [`EditSubmitter`] turns it into one statement
//! appended to the lexical entry and, on success, adds the entry to the
//! operator's watch list.

mod statement;
mod submitter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use statement::{usage_example_statement, wikibase_time};
pub use submitter::{EditSubmitter, SubmitOutcome};

/// Everything needed for one usage example edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageExampleEdit {
    /// Lexical entry the statement is added to.
    pub entry_id: String,

    /// Form the sentence demonstrates.
    pub form_id: String,

    /// Sense the sentence demonstrates.
    pub sense_id: String,

    /// The sentence.
    pub sentence: String,

    /// Document the sentence was taken from.
    pub source_document_id: String,

    /// Publication date of that document.
    pub publication_date: NaiveDate,

    /// Day the sentence was retrieved (UTC).
    pub fetch_date: NaiveDate,
}
