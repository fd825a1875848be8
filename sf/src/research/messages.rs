//! Stage endpoint message types
//!
//! JSON bodies exchanged between the orchestrator side and the stage
//! endpoints served by [`crate::server`].

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate-segments`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    #[serde(default)]
    pub industry: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn new(industry: impl Into<String>) -> Self {
        Self {
            industry: Some(serde_json::Value::String(industry.into())),
        }
    }
}

/// Body of `POST /api/enhance-segments`
///
/// Both fields stay untyped so that a missing or non-string value can be
/// rejected as invalid input instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub industry: Option<serde_json::Value>,
    #[serde(default)]
    pub segments: Option<serde_json::Value>,
}

impl EnhanceRequest {
    pub fn new(industry: impl Into<String>, segments: impl Into<String>) -> Self {
        Self {
            industry: Some(serde_json::Value::String(industry.into())),
            segments: Some(serde_json::Value::String(segments.into())),
        }
    }
}

/// Success body of both endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Failure body of both endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
