//! Wikibase action API implementation of [`EntityWriter`].
//!
//! Logs in with a bot password the first time a write is needed and keeps
//! the cookie session and CSRF token for the rest of the run.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::{Credentials, LexUseConfig};
use crate::error::{LexUseError, Result};

use super::provider::{EntityWriter, WriteResult};

/// Authenticated state of a run.
#[derive(Debug, Clone)]
struct Session {
    username: String,
    csrf_token: String,
}

/// Client for the wiki write API.
pub struct WikibaseClient {
    client: Client,
    api_url: String,
    credentials: Option<Credentials>,
    session: Option<Session>,
}

impl WikibaseClient {
    /// Create a client. Credentials are taken from the environment at the
    /// first write unless set with [`with_credentials`](Self::with_credentials),
    /// as [`RunContext::live`](crate::RunContext::live) does.
    pub fn new(config: &LexUseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.endpoints.user_agent)
                .map_err(|e| LexUseError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| LexUseError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.endpoints.api_url.clone(),
            credentials: None,
            session: None,
        })
    }

    /// Use explicit credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Whether a session has been established.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// The current session, logging in first if needed.
    fn session(&mut self) -> Result<Session> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        let credentials = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => Credentials::from_env()?,
        };

        info!(user = %credentials.username, "logging in to the wiki write API");
        let session = self.login(&credentials)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    fn login(&self, credentials: &Credentials) -> Result<Session> {
        let login_token = self.fetch_token("login")?;

        let response = self.post(&[
            ("action", "login"),
            ("lgname", credentials.username.as_str()),
            ("lgpassword", credentials.password.as_str()),
            ("lgtoken", login_token.as_str()),
            ("format", "json"),
        ])?;
        let body: Value = response
            .json()
            .map_err(|e| LexUseError::service("Wikibase", format!("invalid login response: {}", e)))?;

        let result = body["login"]["result"].as_str().unwrap_or("unknown");
        if result != "Success" {
            let reason = body["login"]["reason"].as_str().unwrap_or(result);
            return Err(LexUseError::Auth(reason.to_string()));
        }

        let csrf_token = self.fetch_token("csrf")?;
        Ok(Session {
            username: body["login"]["lgusername"]
                .as_str()
                .unwrap_or(&credentials.username)
                .to_string(),
            csrf_token,
        })
    }

    /// Fetch a token of the given type ("login", "csrf", "watch").
    fn fetch_token(&self, kind: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", kind),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| LexUseError::service("Wikibase", format!("token request failed: {}", e)))?;

        let body: Value = response
            .json()
            .map_err(|e| LexUseError::service("Wikibase", format!("invalid token response: {}", e)))?;

        token_from(&body, kind)
    }

    fn post(&self, params: &[(&str, &str)]) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .post(&self.api_url)
            .form(params)
            .send()
            .map_err(|e| LexUseError::service("Wikibase", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LexUseError::service(
                "Wikibase",
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(response)
    }
}

impl EntityWriter for WikibaseClient {
    fn append_statement(
        &mut self,
        entry_id: &str,
        statement: &Value,
        summary: &str,
    ) -> Result<WriteResult> {
        let session = self.session()?;
        let data = json!({ "claims": [statement] }).to_string();

        let response = self.post(&[
            ("action", "wbeditentity"),
            ("id", entry_id),
            ("data", data.as_str()),
            ("summary", summary),
            ("token", session.csrf_token.as_str()),
            ("format", "json"),
        ])?;
        let payload: Value = response
            .json()
            .map_err(|e| LexUseError::service("Wikibase", format!("invalid edit response: {}", e)))?;

        debug!(user = %session.username, entry = entry_id, "edit submitted");
        Ok(write_result(payload))
    }

    fn watch(&mut self, entry_id: &str) -> Result<String> {
        self.session()?;
        let watch_token = self.fetch_token("watch")?;
        let title = page_title(entry_id);

        let response = self.post(&[
            ("action", "watch"),
            ("titles", title.as_str()),
            ("format", "json"),
            ("formatversion", "2"),
            ("token", watch_token.as_str()),
        ])?;

        response
            .text()
            .map_err(|e| LexUseError::service("Wikibase", format!("invalid watch response: {}", e)))
    }

    fn name(&self) -> &str {
        "wikibase"
    }
}

/// Extract `query.tokens.<kind>token` from a token response.
fn token_from(body: &Value, kind: &str) -> Result<String> {
    body["query"]["tokens"][format!("{}token", kind)]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LexUseError::service("Wikibase", format!("no {} token in response", kind)))
}

/// Interpret a `wbeditentity` response.
fn write_result(payload: Value) -> WriteResult {
    let success = payload.get("error").is_none() && payload["success"].as_i64() == Some(1);
    WriteResult { success, payload }
}

/// Wiki page title of an entity id.
fn page_title(entity_id: &str) -> String {
    match entity_id.chars().next() {
        Some('L') => format!("Lexeme:{}", entity_id),
        Some('P') => format!("Property:{}", entity_id),
        _ => entity_id.to_string(),
    }
}
