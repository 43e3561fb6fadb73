//! Error types shared by the common crate and the scanner binary.
//!
//! The `MentionError` enum unifies the failure cases of one scan run: reading the
//! ticker list, talking to the forum, writing the report and publishing it. Nothing
//! is retried, so every variant ends the run.
use std::io;

use thiserror::Error;

/// Unified error type shared across the workspace.
#[derive(Error, Debug)]
pub enum MentionError {
    /// I/O error originating from the standard library (ticker list, report file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while parsing the curated ticker list into symbols.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// A ticker symbol could not be turned into a match pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A required configuration value is absent or blank.
    #[error("Missing configuration value: {0}")]
    MissingConfig(String),

    /// A configuration value is present but unusable.
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// Transport-level failure talking to a remote service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The forum answered, but not with something we understand.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Object storage rejected the upload.
    #[error("Publish failed: {0}")]
    Publish(String),
}
