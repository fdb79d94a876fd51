//! Run-wide configuration.
//!
//! Settings are loaded from an optional JSON file and then overridden by
//! command-line flags. Credentials never live in the file; they are read
//! from the environment when the live run context is built.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LexUseError, Result};

/// Environment variable holding the wiki (bot) user name.
pub const USERNAME_ENV: &str = "LEXUSE_USERNAME";

/// Environment variable holding the wiki (bot) password.
pub const PASSWORD_ENV: &str = "LEXUSE_PASSWORD";

/// The language whose lexemes are being worked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code used for glosses and monolingual text (e.g., "sv").
    pub code: String,

    /// Item id of the language in the knowledge graph (e.g., "Q9027").
    pub qid: String,

    /// English name, used in operator messages.
    pub name: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            code: "sv".to_string(),
            qid: "Q9027".to_string(),
            name: "Swedish".to_string(),
        }
    }
}

/// Service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// SPARQL query service.
    pub sparql_url: String,

    /// MediaWiki action API of the knowledge graph.
    pub api_url: String,

    /// Base URL of the entity pages (also the prefix of SPARQL entity IRIs).
    pub entity_prefix: String,

    /// Document list endpoint of the corpus.
    pub corpus_url: String,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sparql_url: "https://query.wikidata.org/sparql".to_string(),
            api_url: "https://www.wikidata.org/w/api.php".to_string(),
            entity_prefix: "http://www.wikidata.org/entity/".to_string(),
            corpus_url: "https://data.riksdagen.se/dokumentlista/".to_string(),
            user_agent: format!("LexUse/{} (https://www.wikidata.org/wiki/Wikidata:LexUse)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Configuration for a curation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexUseConfig {
    /// Target language.
    pub language: Language,

    /// Maximum number of forms fetched per run.
    pub query_limit: usize,

    /// Offset into the form query results.
    pub query_offset: usize,

    /// Location of the exclusion list.
    pub exclusion_path: PathBuf,

    /// Courtesy pause after operator guidance, in seconds.
    pub pause_secs: u64,

    /// Shortest corpus sentence offered, in words.
    pub min_sentence_words: usize,

    /// Longest corpus sentence offered, in words.
    pub max_sentence_words: usize,

    /// Number of corpus result pages fetched per form.
    pub max_corpus_pages: usize,

    /// Exclude a form when its corpus search fails, as if nothing was found.
    pub exclude_on_search_failure: bool,

    /// Add edited entries to the operator's watch list.
    pub watch_edited: bool,

    /// Log statement payloads and write API results.
    pub debug_json: bool,

    /// Show the source document and date with each sentence.
    pub show_sentence_sources: bool,

    /// Edit summary attached to every usage example edit.
    pub edit_summary: String,

    /// Service endpoints.
    pub endpoints: Endpoints,
}

impl Default for LexUseConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            query_limit: 50,
            query_offset: 0,
            exclusion_path: PathBuf::from("exclude_list.json"),
            pause_secs: 5,
            min_sentence_words: 5,
            max_sentence_words: 50,
            max_corpus_pages: 1,
            exclude_on_search_failure: true,
            watch_edited: true,
            debug_json: false,
            show_sentence_sources: false,
            edit_summary: "Added usage example with [[Wikidata:LexUse]]".to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl LexUseConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file. Missing keys take their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| LexUseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: LexUseConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            LexUseError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.language.code.trim().is_empty() {
            return Err(LexUseError::Config("language code must not be empty".to_string()));
        }
        if self.query_limit == 0 {
            return Err(LexUseError::Config("query_limit must be at least 1".to_string()));
        }
        if self.min_sentence_words > self.max_sentence_words {
            return Err(LexUseError::Config(format!(
                "min_sentence_words ({}) exceeds max_sentence_words ({})",
                self.min_sentence_words, self.max_sentence_words
            )));
        }
        Ok(())
    }

    /// Set the exclusion list location.
    pub fn with_exclusion_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclusion_path = path.into();
        self
    }

    /// Set the query window.
    pub fn with_query_window(mut self, limit: usize, offset: usize) -> Self {
        self.query_limit = limit;
        self.query_offset = offset;
        self
    }

    /// Set the courtesy pause.
    pub fn with_pause_secs(mut self, secs: u64) -> Self {
        self.pause_secs = secs;
        self
    }

    /// Enable or disable watch-list additions.
    pub fn with_watch_edited(mut self, watch: bool) -> Self {
        self.watch_edited = watch;
        self
    }

    /// Enable or disable payload logging.
    pub fn with_debug_json(mut self, debug: bool) -> Self {
        self.debug_json = debug;
        self
    }

    /// Show sentence sources to the operator.
    pub fn with_sentence_sources(mut self, show: bool) -> Self {
        self.show_sentence_sources = show;
        self
    }

    /// Decide whether failed corpus searches exclude the form.
    pub fn with_exclude_on_search_failure(mut self, exclude: bool) -> Self {
        self.exclude_on_search_failure = exclude;
        self
    }

    /// The courtesy pause as a duration.
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }

    /// Page URL of an entity, shown to the operator.
    pub fn entity_url(&self, id: &str) -> String {
        format!("{}{}", self.endpoints.entity_prefix, id)
    }
}

/// Login credentials for the wiki write API.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let username = std::env::var(USERNAME_ENV).map_err(|_| {
            LexUseError::Config(format!("{} environment variable not set", USERNAME_ENV))
        })?;
        let password = std::env::var(PASSWORD_ENV).map_err(|_| {
            LexUseError::Config(format!("{} environment variable not set", PASSWORD_ENV))
        })?;
        Ok(Self::new(username, password))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_swedish_setup() {
        let config = LexUseConfig::default();
        assert_eq!(config.language.code, "sv");
        assert_eq!(config.language.qid, "Q9027");
        assert_eq!(config.exclusion_path, PathBuf::from("exclude_list.json"));
        assert!(config.exclude_on_search_failure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"query_limit": 10, "language": {{"code": "da", "qid": "Q9035", "name": "Danish"}}}}"#).unwrap();

        let config = LexUseConfig::load(file.path()).unwrap();
        assert_eq!(config.query_limit, 10);
        assert_eq!(config.language.code, "da");
        assert_eq!(config.pause_secs, 5);
        assert_eq!(config.endpoints.sparql_url, "https://query.wikidata.org/sparql");
    }

    #[test]
    fn test_validate_rejects_inverted_word_bounds() {
        let mut config = LexUseConfig::default();
        config.min_sentence_words = 30;
        config.max_sentence_words = 10;
        assert!(matches!(config.validate(), Err(LexUseError::Config(_))));
    }

    #[test]
    fn test_entity_url() {
        let config = LexUseConfig::default();
        assert_eq!(config.entity_url("L123"), "http://www.wikidata.org/entity/L123");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("Bot@lexuse", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("Bot@lexuse"));
        assert!(!shown.contains("hunter2"));
    }
}
