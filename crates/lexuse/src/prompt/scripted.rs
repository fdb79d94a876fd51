//! Prompter that replays prepared answers, for headless runs.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{LexUseError, Result};

use super::{Prompter, Verdict};

/// A prepared operator answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Skip,
    /// Menu entry as the operator would type it (1-based, 0 cancels).
    Choice(usize),
}

/// Prompter that answers from a queue and records everything shown.
///
/// Running out of answers behaves like a closed console.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    transcript: Vec<String>,
    pauses: Vec<Duration>,
}

impl ScriptedPrompter {
    /// Create a prompter with the given answers.
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            transcript: Vec::new(),
            pauses: Vec::new(),
        }
    }

    /// Every message shown, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Whether any shown message contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|m| m.contains(needle))
    }

    /// Answers not consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Pauses requested.
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    fn next(&mut self, message: &str) -> Result<Answer> {
        self.transcript.push(message.to_string());
        self.answers.pop_front().ok_or(LexUseError::InputClosed)
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        match self.next(message)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            other => Err(LexUseError::Config(format!(
                "scripted answer {:?} does not fit a yes/no question",
                other
            ))),
        }
    }

    fn review(&mut self, message: &str) -> Result<Verdict> {
        match self.next(message)? {
            Answer::Yes => Ok(Verdict::Accept),
            Answer::No => Ok(Verdict::Reject),
            Answer::Skip => Ok(Verdict::Skip),
            other => Err(LexUseError::Config(format!(
                "scripted answer {:?} does not fit a sentence review",
                other
            ))),
        }
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        let mut shown = message.to_string();
        for (i, option) in options.iter().enumerate() {
            shown.push_str(&format!("\n{}) {}", i + 1, option));
        }
        match self.next(&shown)? {
            Answer::Choice(n) if n >= 1 && n <= options.len() => Ok(Some(n - 1)),
            Answer::Choice(_) => Ok(None),
            other => Err(LexUseError::Config(format!(
                "scripted answer {:?} does not fit a menu",
                other
            ))),
        }
    }

    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut p = ScriptedPrompter::new([Answer::Yes, Answer::Skip, Answer::Choice(2)]);
        assert!(p.confirm("a").unwrap());
        assert_eq!(p.review("b").unwrap(), Verdict::Skip);
        let options = vec!["x".to_string(), "y".to_string()];
        assert_eq!(p.choose("c", &options).unwrap(), Some(1));
        assert_eq!(p.remaining(), 0);
        assert!(p.saw("2) y"));
    }

    #[test]
    fn test_exhausted_script_is_input_closed() {
        let mut p = ScriptedPrompter::new([]);
        assert!(matches!(p.confirm("a"), Err(LexUseError::InputClosed)));
    }

    #[test]
    fn test_pause_is_recorded_not_slept() {
        let mut p = ScriptedPrompter::new([]);
        p.pause(Duration::from_secs(5));
        assert_eq!(p.pauses(), &[Duration::from_secs(5)]);
    }
}
