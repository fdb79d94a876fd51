//! Lexical forms.

use serde::{Deserialize, Serialize};

/// One inflected form of a lexical entry, as returned by the form query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalForm {
    /// Id of the lexical entry (e.g., "L35455").
    pub entry_id: String,

    /// Id of the form (e.g., "L35455-F2").
    pub form_id: String,

    /// Surface representation of the form.
    pub word: String,

    /// Label of the lexical category (e.g., "noun").
    pub category: String,
}

impl LexicalForm {
    /// Create a new lexical form.
    pub fn new(
        entry_id: impl Into<String>,
        form_id: impl Into<String>,
        word: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            form_id: form_id.into(),
            word: word.into(),
            category: category.into(),
        }
    }
}

impl std::fmt::Display for LexicalForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.word, self.category, self.form_id)
    }
}
