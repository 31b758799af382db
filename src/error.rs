use std::time::Duration;
use thiserror::Error;

/// Failures surfaced to callers of the analysis pipeline.
///
/// Failed checks are not errors: they are part of a normal result. These variants
/// cover rejected input and faults that make the whole result untrustworthy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Content is required")]
    MissingContent,

    #[error("contentType must be 'html' or 'markdown' (got '{0}')")]
    InvalidContentType(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Failed to analyze content: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// True for errors caused by the caller's input rather than by the engine.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AnalyzeError::Internal(_))
    }
}

/// Why a single URL validation did not produce an HTTP status.
///
/// Always folded into an `invalid` validation result, never returned to callers.
#[derive(Error, Debug)]
pub enum ValidationFailure {
    #[error("Request timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}
