//! Operator interaction.
//!
//! All questions put to the operator go through the [`Prompter`] trait, so
//! the curation workflow can run against a console or, in tests, against a
//! scripted list of answers.

mod console;
mod scripted;

use std::time::Duration;

use crate::error::Result;

pub use console::ConsolePrompter;
pub use scripted::{Answer, ScriptedPrompter};

/// Operator verdict on a candidate sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Use the sentence.
    Accept,
    /// Move on to the next sentence.
    Reject,
    /// Abandon the form.
    Skip,
}

/// Port for questions to the operator.
///
/// Every method blocks until a recognised answer is given; there is no
/// timeout.
pub trait Prompter {
    /// Ask a yes/no question. An empty answer means yes.
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask a yes/no/skip question about a sentence. An empty answer means yes.
    fn review(&mut self, message: &str) -> Result<Verdict>;

    /// Show a numbered menu (starting at 1) and return the zero-based index
    /// of the chosen option, or `None` when the operator cancels.
    fn choose(&mut self, message: &str, options: &[String]) -> Result<Option<usize>>;

    /// Show informational text.
    fn say(&mut self, message: &str);

    /// Wait before continuing.
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
