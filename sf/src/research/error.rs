//! Research stage errors

use thiserror::Error;

use crate::llm::LlmError;

/// Errors produced by the research stages
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Rejected before any network call
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A stage endpoint answered with a non-success status
    #[error("Failed to {action}: {status}")]
    Endpoint {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("No result returned from {0}")]
    EmptyResult(&'static str),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ResearchError {
    pub fn invalid_segments() -> Self {
        Self::InvalidInput("Invalid segments data".to_string())
    }

    pub fn invalid_industry() -> Self {
        Self::InvalidInput("Invalid industry".to_string())
    }

    /// Raw body returned by the upstream or stage endpoint, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Llm(e) => e.body(),
            Self::Endpoint { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the failure happened before anything left the process
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
