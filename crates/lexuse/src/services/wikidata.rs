//! Wikidata Query Service (SPARQL) implementation of [`LexemeSource`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::config::{Language, LexUseConfig};
use crate::error::{LexUseError, Result};
use crate::lexeme::{LexicalForm, Sense};

use super::provider::LexemeSource;

/// Lexical entries that are affixes or interfixes are never offered.
const EXCLUDED_CLASSES: [&str; 4] = [
    "Q62155",   // affix
    "Q134830",  // prefix
    "Q102047",  // suffix
    "Q1153504", // interfix
];

/// SPARQL client for lexeme data.
pub struct WikidataQueryService {
    client: Client,
    sparql_url: String,
    entity_prefix: String,
    language: Language,
    limit: usize,
    offset: usize,
}

impl WikidataQueryService {
    /// Create a query service from the run configuration.
    pub fn new(config: &LexUseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .default_headers(default_headers(&config.endpoints.user_agent)?)
            .build()
            .map_err(|e| LexUseError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            sparql_url: config.endpoints.sparql_url.clone(),
            entity_prefix: config.endpoints.entity_prefix.clone(),
            language: config.language.clone(),
            limit: config.query_limit,
            offset: config.query_offset,
        })
    }

    /// Run a query and return its bindings.
    fn query(&self, sparql: &str) -> Result<Vec<Row>> {
        debug!(query = sparql, "running SPARQL query");

        let response = self
            .client
            .get(&self.sparql_url)
            .query(&[("format", "json"), ("query", sparql)])
            .send()
            .map_err(|e| LexUseError::service("SPARQL", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(LexUseError::service(
                "SPARQL",
                format!("query failed ({}): {}", status, error_text),
            ));
        }

        let parsed: SparqlResponse = response
            .json()
            .map_err(|e| LexUseError::service("SPARQL", format!("invalid response: {}", e)))?;

        Ok(parsed.results.bindings)
    }

    fn forms_query(&self) -> String {
        let excluded = EXCLUDED_CLASSES
            .iter()
            .map(|q| format!("wd:{}", q))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            r#"SELECT DISTINCT ?l ?form ?word ?catLabel WHERE {{
  ?l a ontolex:LexicalEntry; dct:language wd:{qid}.
  VALUES ?excluded {{ {excluded} }}
  MINUS {{ ?l wdt:P31 ?excluded. }}
  ?l wikibase:lexicalCategory ?cat.
  ?l ontolex:lexicalForm ?form.
  ?l ontolex:sense ?sense.
  ?sense wdt:P5137 [].
  MINUS {{ ?l wdt:P5831 ?example. }}
  ?form wikibase:grammaticalFeature [].
  ?form ontolex:representation ?word.
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
}}
LIMIT {limit}
OFFSET {offset}"#,
            qid = self.language.qid,
            excluded = excluded,
            limit = self.limit,
            offset = self.offset,
        )
    }

    fn senses_query(&self, entry_id: &str) -> String {
        format!(
            r#"SELECT ?sense ?gloss (SAMPLE(?item) AS ?concept) WHERE {{
  VALUES ?l {{ wd:{entry} }}.
  ?l ontolex:sense ?sense.
  ?sense skos:definition ?gloss.
  FILTER(LANG(?gloss) = "{lang}")
  ?sense wdt:P5137 ?item.
}}
GROUP BY ?sense ?gloss"#,
            entry = entry_id,
            lang = self.language.code,
        )
    }

    fn count_query(entry_id: &str) -> String {
        format!(
            r#"SELECT (COUNT(DISTINCT ?sense) AS ?count) WHERE {{
  VALUES ?l {{ wd:{entry} }}.
  ?l ontolex:sense ?sense.
}}"#,
            entry = entry_id,
        )
    }
}

impl LexemeSource for WikidataQueryService {
    fn fetch_forms(&self) -> Result<Vec<LexicalForm>> {
        let rows = self.query(&self.forms_query())?;
        parse_forms(&rows, &self.entity_prefix)
    }

    fn fetch_senses(&self, entry_id: &str) -> Result<Vec<Sense>> {
        let rows = self.query(&self.senses_query(entry_id))?;
        let senses = parse_senses(&rows, &self.entity_prefix, &self.language.code)?;
        debug!(entry = entry_id, count = senses.len(), "fetched senses");
        Ok(senses)
    }

    fn count_senses(&self, entry_id: &str) -> Result<usize> {
        let rows = self.query(&Self::count_query(entry_id))?;
        parse_count(&rows)
    }

    fn name(&self) -> &str {
        "wikidata"
    }
}

fn default_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/sparql-results+json"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| LexUseError::Config(format!("Invalid user agent: {}", e)))?,
    );
    Ok(headers)
}

/// SPARQL JSON results document.
#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<Row>,
}

/// One result row: variable name to bound value.
type Row = HashMap<String, Binding>;

#[derive(Debug, Deserialize)]
struct Binding {
    value: String,
    #[serde(rename = "xml:lang", default)]
    lang: Option<String>,
}

fn binding<'a>(row: &'a Row, name: &str) -> Result<&'a Binding> {
    row.get(name).ok_or_else(|| {
        LexUseError::service("SPARQL", format!("result row lacks binding '{}'", name))
    })
}

fn entity_id(iri: &str, prefix: &str) -> String {
    iri.strip_prefix(prefix).unwrap_or(iri).to_string()
}

fn parse_forms(rows: &[Row], prefix: &str) -> Result<Vec<LexicalForm>> {
    rows.iter()
        .map(|row| {
            Ok(LexicalForm::new(
                entity_id(&binding(row, "l")?.value, prefix),
                entity_id(&binding(row, "form")?.value, prefix),
                binding(row, "word")?.value.clone(),
                binding(row, "catLabel")?.value.clone(),
            ))
        })
        .collect()
}

fn parse_senses(rows: &[Row], prefix: &str, language: &str) -> Result<Vec<Sense>> {
    rows.iter()
        .map(|row| {
            let gloss = binding(row, "gloss")?;
            let mut sense = Sense::new(
                entity_id(&binding(row, "sense")?.value, prefix),
                gloss.value.clone(),
                gloss.lang.clone().unwrap_or_else(|| language.to_string()),
            );
            if let Some(concept) = row.get("concept") {
                sense = sense.with_concept(entity_id(&concept.value, prefix));
            }
            Ok(sense)
        })
        .collect()
}

fn parse_count(rows: &[Row]) -> Result<usize> {
    let Some(row) = rows.first() else {
        return Ok(0);
    };
    let value = &binding(row, "count")?.value;
    value
        .parse()
        .map_err(|_| LexUseError::service("SPARQL", format!("count '{}' is not a number", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "http://www.wikidata.org/entity/";

    fn rows(json: &str) -> Vec<Row> {
        let parsed: SparqlResponse = serde_json::from_str(json).unwrap();
        parsed.results.bindings
    }

    #[test]
    fn test_parse_forms_strips_prefix() {
        let rows = rows(
            r#"{"head": {"vars": ["l","form","word","catLabel"]}, "results": {"bindings": [
                {"l": {"type": "uri", "value": "http://www.wikidata.org/entity/L35455"},
                 "form": {"type": "uri", "value": "http://www.wikidata.org/entity/L35455-F2"},
                 "word": {"type": "literal", "xml:lang": "sv", "value": "bankerna"},
                 "catLabel": {"type": "literal", "xml:lang": "en", "value": "noun"}}
            ]}}"#,
        );

        let forms = parse_forms(&rows, PREFIX).unwrap();
        assert_eq!(forms, vec![LexicalForm::new("L35455", "L35455-F2", "bankerna", "noun")]);
    }

    #[test]
    fn test_parse_forms_missing_binding_is_error() {
        let rows = rows(
            r#"{"results": {"bindings": [
                {"l": {"type": "uri", "value": "http://www.wikidata.org/entity/L1"}}
            ]}}"#,
        );
        assert!(matches!(parse_forms(&rows, PREFIX), Err(LexUseError::Service { .. })));
    }

    #[test]
    fn test_parse_senses_keeps_gloss_language_and_concept() {
        let rows = rows(
            r#"{"results": {"bindings": [
                {"sense": {"type": "uri", "value": "http://www.wikidata.org/entity/L1-S1"},
                 "gloss": {"type": "literal", "xml:lang": "sv", "value": "penninginrättning"},
                 "concept": {"type": "uri", "value": "http://www.wikidata.org/entity/Q22687"}},
                {"sense": {"type": "uri", "value": "http://www.wikidata.org/entity/L1-S2"},
                 "gloss": {"type": "literal", "xml:lang": "sv", "value": "strandkant"}}
            ]}}"#,
        );

        let senses = parse_senses(&rows, PREFIX, "sv").unwrap();
        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].id, "L1-S1");
        assert_eq!(senses[0].concept.as_deref(), Some("Q22687"));
        assert!(senses[0].is_usable_for("sv"));
        assert!(senses[1].concept.is_none());
    }

    #[test]
    fn test_parse_count() {
        let rows = rows(
            r#"{"results": {"bindings": [
                {"count": {"datatype": "http://www.w3.org/2001/XMLSchema#integer", "type": "literal", "value": "3"}}
            ]}}"#,
        );
        assert_eq!(parse_count(&rows).unwrap(), 3);
        assert_eq!(parse_count(&[]).unwrap(), 0);
    }

    #[test]
    fn test_queries_use_configuration() {
        let config = LexUseConfig::default().with_query_window(25, 100);
        let service = WikidataQueryService::new(&config).unwrap();

        let forms = service.forms_query();
        assert!(forms.contains("dct:language wd:Q9027"));
        assert!(forms.contains("LIMIT 25"));
        assert!(forms.contains("OFFSET 100"));
        assert!(forms.contains("wd:Q1153504"));

        let senses = service.senses_query("L35455");
        assert!(senses.contains("wd:L35455"));
        assert!(senses.contains(r#"LANG(?gloss) = "sv""#));

        assert!(WikidataQueryService::count_query("L7").contains("wd:L7"));
    }
}
