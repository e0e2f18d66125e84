//! Errors raised while obtaining the API description document.
//!
//! These are the only errors that cross the query boundary. Lookups that
//! find nothing are values ([`api_knowledge_core::Lookup`]), not errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch API document from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch API document from {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Failed to read API document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API document from {origin} is not valid JSON: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API document from {origin} is malformed: {reason}")]
    Malformed { origin: String, reason: String },
}
