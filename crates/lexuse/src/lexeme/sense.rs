//! Senses of lexical entries.

use serde::{Deserialize, Serialize};

/// One meaning of a lexical entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Id of the sense (e.g., "L35455-S1").
    pub id: String,

    /// Definition text.
    pub gloss: String,

    /// Language code of the gloss.
    pub language: String,

    /// Item the sense is linked to as a concept, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
}

impl Sense {
    /// Create a sense without a concept link.
    pub fn new(id: impl Into<String>, gloss: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gloss: gloss.into(),
            language: language.into(),
            concept: None,
        }
    }

    /// Link the sense to a concept item.
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// Whether the sense can be offered for a usage example in `language`:
    /// it needs a concept link and a gloss in that language.
    pub fn is_usable_for(&self, language: &str) -> bool {
        self.concept.is_some() && self.language == language
    }
}
