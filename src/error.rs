//! Error types at the component seams.
//!
//! Components return typed outcomes for runtime conditions (HTTP status,
//! broker failures); these errors cover what cannot be expressed as an
//! outcome: caller defects, unusable credentials and malformed API bodies.

use thiserror::Error;

/// Invalid search criteria handed in by the caller.
#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("search term must not be empty")]
    EmptySearchTerm,

    #[error("invalid date_from '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Failures of the content fetch that are not a classified response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("content API returned 200 with a malformed JSON body")]
    MalformedBody(#[source] serde_json::Error),
}

/// The credentials could not be obtained. The cache stays empty, so a later
/// call retries.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("secret '{name}' could not be retrieved: {message}")]
    Unavailable { name: String, message: String },

    #[error("secret '{name}' is not a flat JSON string map")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("secret is missing required field '{0}'")]
    MissingField(&'static str),
}

/// A batch submission raised instead of returning a receipt.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("stream '{stream}' rejected the batch: {message}")]
    Service { stream: String, message: String },

    #[error("record {index} could not be encoded for the broker: {message}")]
    InvalidRecord { index: usize, message: String },
}

/// Errors that abort a pipeline run before an outcome exists.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Secrets(#[from] SecretError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
