//! Error taxonomy for study-aid generation
//!
//! Every lane stores one of these as a user-facing message; nothing here is
//! allowed to escape the orchestrator's concurrent dispatch.

use std::fmt;

/// Number of characters kept from raw model output in diagnostics
pub const SNIPPET_CHARS: usize = 200;

/// Errors produced by composition, the backend call, or response repair
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudyError {
    /// No API key configured; every backend call fails identically
    #[error("Gemini AI Service not initialized. API key might be missing.")]
    Uninitialized,
    /// Network failure or backend rejection, with the most specific message available
    #[error("Gemini API Error: {0}")]
    Backend(String),
    /// The model answered, but no valid payload could be recovered
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),
    /// Rejected before any backend call was made
    #[error("{0}")]
    Validation(String),
}

impl StudyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable code, mostly for logs
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Uninitialized => "CONFIGURATION_ERROR",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

pub type StudyResult<T> = Result<T, StudyError>;

/// Diagnostics for a repair-parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedResponse {
    /// Error from the strict parse of the (fence-stripped) text
    pub initial_error: String,
    /// Error from parsing the bracket-balanced candidate, if one was found
    pub extraction_error: Option<String>,
    pub raw_prefix: String,
    pub raw_suffix: String,
    pub candidate_prefix: Option<String>,
}

impl MalformedResponse {
    pub(crate) fn new(raw: &str, initial_error: String) -> Self {
        Self {
            initial_error,
            extraction_error: None,
            raw_prefix: prefix(raw, SNIPPET_CHARS),
            raw_suffix: suffix(raw, SNIPPET_CHARS),
            candidate_prefix: None,
        }
    }

    pub(crate) fn with_candidate(mut self, candidate: &str, error: String) -> Self {
        self.extraction_error = Some(error);
        self.candidate_prefix = Some(prefix(candidate, SNIPPET_CHARS));
        self
    }
}

impl fmt::Display for MalformedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.extraction_error, &self.candidate_prefix) {
            (Some(error), Some(candidate)) => write!(
                f,
                "Failed to parse AI's JSON response even after attempting to extract by bracket balancing. \
                 Error: {error}. Initial Error: {}. Extracted snippet: {candidate}...",
                self.initial_error
            ),
            _ => write!(
                f,
                "Failed to parse AI's JSON response. Initial Error: {}. Raw output snippet: {}...",
                self.initial_error, self.raw_prefix
            ),
        }
    }
}

impl std::error::Error for MalformedResponse {}

/// First `n` characters of `text`
pub(crate) fn prefix(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Last `n` characters of `text`
pub(crate) fn suffix(text: &str, n: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = StudyError::Backend("API key not valid".into());
        assert_eq!(err.to_string(), "Gemini API Error: API key not valid");
        assert_eq!(err.code(), "BACKEND_ERROR");
    }

    #[test]
    fn test_snippets_respect_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(prefix(text, 2), "hé");
        assert_eq!(suffix(text, 3), "rld");
        assert_eq!(suffix("ab", 10), "ab");
    }

    #[test]
    fn test_malformed_display_includes_candidate() {
        let err = MalformedResponse::new("noise {\"a\": } tail", "expected value".into())
            .with_candidate("{\"a\": }", "expected value at line 1".into());
        let message = err.to_string();
        assert!(message.contains("bracket balancing"));
        assert!(message.contains("{\"a\": }"));
        assert!(message.contains("expected value"));
    }

    #[test]
    fn test_malformed_display_without_candidate() {
        let err = MalformedResponse::new("no json here", "expected value".into());
        assert_eq!(
            err.to_string(),
            "Failed to parse AI's JSON response. Initial Error: expected value. Raw output snippet: no json here..."
        );
    }
}
