//! Riksdagen open data implementation of [`CorpusSearch`].
//!
//! The document list API returns, per matching document, a short summary
//! with the hits wrapped in highlight markup. Summaries are cleaned, split
//! into sentences, and only complete sentences that contain the form as a
//! whole word are kept.

use std::time::Duration;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::LexUseConfig;
use crate::error::{LexUseError, Result};
use crate::lexeme::LexicalForm;

use super::provider::{CorpusProvenance, CorpusSearch, SentenceBatch, SentenceSource};

/// Riksdagen open data portal.
const RIKSDAGEN_ITEM: &str = "Q21592569";

/// Riksdagen document ID.
const DOCUMENT_ID_PROPERTY: &str = "P8433";

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Corpus search against data.riksdagen.se.
pub struct RiksdagenCorpus {
    client: Client,
    url: String,
    max_pages: usize,
    min_words: usize,
    max_words: usize,
    provenance: CorpusProvenance,
}

impl RiksdagenCorpus {
    /// Create a corpus client from the run configuration.
    pub fn new(config: &LexUseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.endpoints.user_agent)
                .map_err(|e| LexUseError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .map_err(|e| LexUseError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.endpoints.corpus_url.clone(),
            max_pages: config.max_corpus_pages.max(1),
            min_words: config.min_sentence_words,
            max_words: config.max_sentence_words,
            provenance: CorpusProvenance {
                stated_in: RIKSDAGEN_ITEM.to_string(),
                document_property: DOCUMENT_ID_PROPERTY.to_string(),
            },
        })
    }

    fn fetch_page(&self, word: &str, page: usize) -> Result<DocumentList> {
        let page = page.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("sok", word),
                ("sort", "rel"),
                ("sortorder", "desc"),
                ("utformat", "json"),
                ("p", page.as_str()),
            ])
            .send()
            .map_err(|e| LexUseError::service("Riksdagen", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(LexUseError::service(
                "Riksdagen",
                format!("search failed ({})", status),
            ));
        }

        let parsed: DocumentListResponse = response
            .json()
            .map_err(|e| LexUseError::service("Riksdagen", format!("invalid response: {}", e)))?;

        Ok(parsed.dokumentlista)
    }
}

impl CorpusSearch for RiksdagenCorpus {
    fn search(&self, form: &LexicalForm) -> Result<SentenceBatch> {
        let mut batch = SentenceBatch::new();

        for page in 1..=self.max_pages {
            let list = self.fetch_page(&form.word, page)?;
            let pages = list.pages();
            let documents = list.dokument.map(OneOrMany::into_vec).unwrap_or_default();
            debug!(word = %form.word, page, documents = documents.len(), "riksdagen results");

            for document in documents {
                collect_sentences(&mut batch, &document, form, self.min_words, self.max_words);
            }

            if page >= pages {
                break;
            }
        }

        Ok(batch)
    }

    fn provenance(&self) -> &CorpusProvenance {
        &self.provenance
    }

    fn name(&self) -> &str {
        "riksdagen"
    }
}

/// Add the usable sentences of one document to the batch.
fn collect_sentences(
    batch: &mut SentenceBatch,
    document: &Document,
    form: &LexicalForm,
    min_words: usize,
    max_words: usize,
) {
    let Some(summary) = document.summary.as_deref() else {
        return;
    };

    let publication_date = document.datum.as_deref().and_then(|datum| {
        let parsed = parse_date(datum);
        if parsed.is_none() {
            warn!(document = %document.id, datum, "unparsable publication date");
        }
        parsed
    });

    for sentence in split_sentences(&clean_summary(summary)) {
        let words = sentence.split_whitespace().count();
        if words < min_words || words > max_words {
            continue;
        }
        if !is_complete(&sentence) || !contains_word(&sentence, form) {
            continue;
        }
        batch.insert(
            sentence,
            SentenceSource::new(document.id.clone(), publication_date),
        );
    }
}

/// Parse the date part of a Riksdagen `datum` ("2017-10-12" or with time).
fn parse_date(datum: &str) -> Option<NaiveDate> {
    let date_part = datum.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Remove markup and entities, collapse whitespace.
fn clean_summary(summary: &str) -> String {
    let text = TAG.replace_all(summary, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Split text after '.', '!' or '?' when the next word starts a new sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 0..chars.len() {
        let (idx, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let boundary = match (chars.get(i + 1), chars.get(i + 2)) {
            (None, _) => true,
            (Some(&(_, next)), Some(&(_, after))) => next.is_whitespace() && after.is_uppercase(),
            (Some(_), None) => false,
        };
        if boundary {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// Starts with an uppercase letter and ends with terminal punctuation.
fn is_complete(sentence: &str) -> bool {
    let starts_upper = sentence.chars().next().is_some_and(|c| c.is_uppercase());
    let ends_terminal = sentence.ends_with(['.', '!', '?']);
    starts_upper && ends_terminal
}

/// Whether the sentence contains the form's word as a whole phrase.
///
/// The word may span several tokens ("i dag"); it must not be glued to a
/// letter, digit or hyphen on either side.
fn contains_word(sentence: &str, form: &LexicalForm) -> bool {
    if form.word.trim().is_empty() {
        return false;
    }
    let pattern = format!(r"(?:^|[^\w-]){}(?:$|[^\w-])", regex::escape(&form.word));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(sentence),
        Err(e) => {
            warn!(word = %form.word, error = %e, "could not build word pattern");
            false
        }
    }
}

/// Document list API response.
#[derive(Debug, Deserialize)]
struct DocumentListResponse {
    dokumentlista: DocumentList,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(rename = "@sidor", default)]
    sidor: Option<String>,
    #[serde(default)]
    dokument: Option<OneOrMany<Document>>,
}

impl DocumentList {
    fn pages(&self) -> usize {
        self.sidor
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    id: String,
    #[serde(default)]
    datum: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// The API returns a bare object instead of an array for a single hit.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}
