//! LLM error types

use thiserror::Error;

/// Errors that can occur during completion calls
///
/// Every upstream variant carries the raw response body for diagnostics.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenRouter API error: {status}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format from OpenRouter")]
    InvalidResponse { body: String },

    #[error("Error parsing API response")]
    Parse { body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API key not found. Set the {0} environment variable.")]
    MissingApiKey(String),
}

impl LlmError {
    /// Raw upstream body, when the service answered at all
    pub fn body(&self) -> Option<&str> {
        match self {
            LlmError::ApiError { body, .. } | LlmError::InvalidResponse { body } | LlmError::Parse { body } => {
                Some(body)
            }
            LlmError::Network(_) | LlmError::MissingApiKey(_) => None,
        }
    }

    /// Upstream HTTP status for non-success responses
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
