//! Exclusion records.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A form that must not be offered again for a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRecord {
    /// Id of the excluded form.
    pub form_id: String,

    /// Surface word of the form.
    pub word: String,

    /// Language code the exclusion applies to.
    pub language: String,

    /// When the record was added (ISO-8601).
    pub date_added: String,
}

impl ExclusionRecord {
    /// Create a record dated now.
    pub fn now(
        form_id: impl Into<String>,
        word: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            word: word.into(),
            language: language.into(),
            date_added: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// Override the date (used when importing or testing).
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date_added = date.into();
        self
    }

    pub(crate) fn from_entry(form_id: &str, entry: &StoredEntry) -> Self {
        Self {
            form_id: form_id.to_string(),
            word: entry.word.clone(),
            language: entry.lang.clone(),
            date_added: entry.date.clone(),
        }
    }

    pub(crate) fn to_entry(&self) -> StoredEntry {
        StoredEntry {
            word: self.word.clone(),
            date: self.date_added.clone(),
            lang: self.language.clone(),
        }
    }
}

/// Value stored under a form id in the exclusion file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub word: String,
    pub date: String,
    pub lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_iso_8601() {
        let record = ExclusionRecord::now("L1-F1", "bank", "sv");
        assert!(chrono::DateTime::parse_from_rfc3339(&record.date_added).is_ok());
    }

    #[test]
    fn test_entry_conversion_keeps_fields() {
        let record = ExclusionRecord::now("L1-F1", "bank", "sv").with_date("2021-03-01T12:00:00");
        let entry = record.to_entry();
        assert_eq!(entry.lang, "sv");
        assert_eq!(ExclusionRecord::from_entry("L1-F1", &entry), record);
    }
}
