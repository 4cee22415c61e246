/*!
 * Error types for the sublingo application.
 *
 * This module contains custom error types for different parts of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to an external provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network failure, timeout, or a non-success status from a single source.
    /// The source resolver treats this as "no match" and continues its chain.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during batch translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The provider returned a different number of texts than it was given
    #[error("Batch parity mismatch: sent {expected} texts, received {actual}")]
    ParityMismatch {
        /// Number of texts in the request batch
        expected: usize,
        /// Number of texts in the response
        actual: usize,
    },

    /// Error from the translation provider API
    #[error("Translation provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A batch kept failing until the retry budget was spent
    #[error("Batch {batch_index} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Zero-based index of the failing batch
        batch_index: usize,
        /// Number of attempts made
        attempts: u32,
        /// Description of the final failure
        last_error: String,
    },
}

/// Errors that can occur while running a translation job end-to-end
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Every candidate download failed or produced an empty payload
    #[error("No usable subtitle file could be downloaded")]
    NoUsableDownload,

    /// The downloaded payload did not parse into any subtitle cues
    #[error("No subtitle cues found in {0}")]
    EmptySubtitle(PathBuf),

    /// Error from the batch translation engine
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Storage or filesystem write error
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the job pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
