//! Choosing the sense a sentence demonstrates.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::LexUseConfig;
use crate::error::Result;
use crate::lexeme::{LexicalForm, Sense};
use crate::prompt::Prompter;
use crate::services::LexemeSource;

/// Outcome of resolving the sense of an accepted sentence.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The operator confirmed or chose this sense.
    Matched(Sense),
    /// The operator declined the offered senses.
    Declined,
    /// The entry has no sense usable in the run language. The entry needs
    /// repair before the form is worth another try.
    MissingGloss,
}

/// Resolves the sense of an accepted sentence with the operator.
#[derive(Debug, Clone)]
pub struct SenseResolver {
    language: String,
    language_name: String,
    entity_prefix: String,
    pause: Duration,
}

impl SenseResolver {
    /// Create a resolver for the configured language.
    pub fn new(config: &LexUseConfig) -> Self {
        Self {
            language: config.language.code.clone(),
            language_name: config.language.name.clone(),
            entity_prefix: config.endpoints.entity_prefix.clone(),
            pause: config.pause(),
        }
    }

    /// Find the sense of `form`'s entry that the sentence demonstrates.
    ///
    /// Anything but [`Resolution::Matched`] abandons the sentence.
    pub fn resolve(
        &self,
        lexemes: &dyn LexemeSource,
        prompter: &mut dyn Prompter,
        form: &LexicalForm,
    ) -> Result<Resolution> {
        let senses: Vec<Sense> = lexemes
            .fetch_senses(&form.entry_id)?
            .into_iter()
            .filter(|s| s.is_usable_for(&self.language))
            .collect();
        debug!(entry = %form.entry_id, senses = senses.len(), "usable senses");

        match senses.len() {
            0 => self.no_usable_senses(lexemes, prompter, form),
            1 => self.confirm_only_sense(prompter, form, senses),
            n => {
                prompter.say(&format!("Found {} senses.", n));
                let options: Vec<String> = senses.iter().map(|s| s.gloss.clone()).collect();
                let question =
                    "Please choose the correct sense corresponding to the meaning in the usage example";
                match prompter.choose(question, &options)? {
                    Some(index) => Ok(senses
                        .into_iter()
                        .nth(index)
                        .map_or(Resolution::Declined, Resolution::Matched)),
                    None => {
                        prompter.say("Cancelled adding this sentence.");
                        Ok(Resolution::Declined)
                    }
                }
            }
        }
    }

    fn confirm_only_sense(
        &self,
        prompter: &mut dyn Prompter,
        form: &LexicalForm,
        mut senses: Vec<Sense>,
    ) -> Result<Resolution> {
        let Some(sense) = senses.pop() else {
            return Ok(Resolution::MissingGloss);
        };
        let question = format!(
            "Found only one sense. Does this example fit the following gloss?\n'{}'",
            sense.gloss
        );
        if prompter.confirm(&question)? {
            return Ok(Resolution::Matched(sense));
        }

        prompter.say(&format!(
            "Cancelled adding sentence as it does not match the only sense currently present.\n\
             Lexemes are entirely dependent on good quality QIDs.\n\
             Please add labels and descriptions to relevant QIDs and then add more senses \
             to the lexeme by matching on QID concepts with similar labels and descriptions \
             in the lexeme language.\n\
             Search for {} in Wikidata: {}",
            form.word,
            search_url(&form.word)
        ));
        prompter.pause(self.pause);
        Ok(Resolution::Declined)
    }

    fn no_usable_senses(
        &self,
        lexemes: &dyn LexemeSource,
        prompter: &mut dyn Prompter,
        form: &LexicalForm,
    ) -> Result<Resolution> {
        let count = lexemes.count_senses(&form.entry_id)?;
        if count > 0 {
            prompter.say(&format!(
                "{} gloss is missing for {} sense(s). Please fix it manually here: {}{}",
                self.language_name, count, self.entity_prefix, form.entry_id
            ));
            prompter.pause(self.pause);
        } else {
            warn!(entry = %form.entry_id, "entry has no senses although the form query requires one");
            prompter.say(&format!("No senses found for {}.", form.entry_id));
        }
        Ok(Resolution::MissingGloss)
    }
}

/// Full-text search page for a word on Wikidata.
fn search_url(word: &str) -> String {
    let mut url = String::from("https://www.wikidata.org/w/index.php?search=");
    for byte in word.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => url.push(byte as char),
            _ => url.push_str(&format!("%{:02X}", byte)),
        }
    }
    url.push_str("&title=Special%3ASearch&profile=advanced&fulltext=0&ns0=1");
    url
}
