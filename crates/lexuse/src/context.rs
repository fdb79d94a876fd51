//! Per-run state shared by the workflow.

use crate::config::{Credentials, LexUseConfig};
use crate::error::Result;
use crate::services::{
    CorpusSearch, EntityWriter, LexemeSource, RiksdagenCorpus, WikibaseClient,
    WikidataQueryService,
};

/// Configuration and collaborators of one run.
///
/// Built once at start-up and passed by reference; the writer keeps the
/// authenticated session for as long as the context lives.
pub struct RunContext {
    pub config: LexUseConfig,
    pub lexemes: Box<dyn LexemeSource>,
    pub corpus: Box<dyn CorpusSearch>,
    pub writer: Box<dyn EntityWriter>,
}

impl RunContext {
    /// Create a context from explicit collaborators.
    pub fn new(
        config: LexUseConfig,
        lexemes: Box<dyn LexemeSource>,
        corpus: Box<dyn CorpusSearch>,
        writer: Box<dyn EntityWriter>,
    ) -> Self {
        Self {
            config,
            lexemes,
            corpus,
            writer,
        }
    }

    /// Create a context talking to Wikidata and Riksdagen.
    ///
    /// Fails when the bot credentials are not in the environment, so a run
    /// never starts without a way to save its edits.
    pub fn live(config: LexUseConfig) -> Result<Self> {
        config.validate()?;
        let credentials = Credentials::from_env()?;
        let lexemes = WikidataQueryService::new(&config)?;
        let corpus = RiksdagenCorpus::new(&config)?;
        let writer = WikibaseClient::new(&config)?.with_credentials(credentials);
        Ok(Self::new(
            config,
            Box::new(lexemes),
            Box::new(corpus),
            Box::new(writer),
        ))
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("language", &self.config.language.code)
            .field("lexemes", &self.lexemes.name())
            .field("corpus", &self.corpus.name())
            .field("writer", &self.writer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexUseError;

    #[test]
    fn test_live_context_requires_credentials() {
        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            std::env::remove_var("LEXUSE_USERNAME");
            std::env::remove_var("LEXUSE_PASSWORD");
        }

        let result = RunContext::live(LexUseConfig::default());
        assert!(matches!(result, Err(LexUseError::Config(msg)) if msg.contains("LEXUSE_USERNAME")));
    }
}
