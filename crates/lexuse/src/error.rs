//! Error types for the LexUse library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for LexUse operations.
#[derive(Debug, Error)]
pub enum LexUseError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing local state.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The exclusion list exists but cannot be used.
    #[error("Exclusion list '{path}' is unreadable: {message}")]
    CorruptExclusionList { path: PathBuf, message: String },

    /// Transport or API failure of an external service.
    #[error("{service} error: {message}")]
    Service { service: String, message: String },

    /// Login against the wiki write API failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A candidate sentence has no publication date to cite.
    #[error("Publication date of document {document_id} is missing")]
    MissingPublicationDate { document_id: String },

    /// The operator console was closed while waiting for an answer.
    #[error("Input closed while waiting for an answer")]
    InputClosed,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LexUseError {
    /// Build a service error for the named collaborator.
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        LexUseError::Service {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for LexUse operations.
pub type Result<T> = std::result::Result<T, LexUseError>;
