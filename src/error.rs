//! Pipeline error taxonomy.
//!
//! Every variant is terminal for the request that produced it. Callers of
//! [`crate::StreamProvider::fetch_streams`] never see these; they surface
//! only through logs and the diagnostic `try_*` entry points.

use thiserror::Error;

/// Stream resolution errors
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("identity unresolved: {0}")]
    IdentityUnresolved(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StreamError {
    /// Pipeline stage that produced the error, for structured log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            StreamError::IdentityUnresolved(_) => "identity",
            StreamError::ProviderUnavailable(_) | StreamError::Http(_) => "provider",
            StreamError::Decryption(_) => "decrypt",
            StreamError::MalformedPayload(_) | StreamError::Json(_) => "payload",
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
