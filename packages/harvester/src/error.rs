//! Error types for the harvester.
//!
//! Uses the dual-error pattern: `HarvesterError` for setup and batch-level
//! failures, `ProviderError` for a single provider request. Provider errors
//! are caught per attempt by the batch runner.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ProviderKind;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// The document to review does not exist.
    #[error("PDF file not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The reviewer guidance file does not exist.
    #[error("Reviewer guidance file not found: {}", .0.display())]
    GuidanceNotFound(PathBuf),

    /// Unknown provider name on the command line.
    #[error("Unknown provider '{0}'. Expected one of: openai, claude, gemini")]
    UnknownProvider(String),

    /// A provider request failed outside the per-attempt loop.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single review request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response, or the body was unreadable.
    #[error("{provider} request failed: {source}")]
    Http {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// The response parsed but carried no text.
    #[error("{provider} returned no review text")]
    EmptyResponse { provider: ProviderKind },

    /// No API key was configured for the provider.
    #[error("{provider} API key not set (expected {var})")]
    MissingApiKey {
        provider: ProviderKind,
        var: &'static str,
    },

    /// The document could not be read.
    #[error("Failed to read document {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
