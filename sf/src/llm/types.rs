//! Completion request/response types
//!
//! `CompletionRequest` and `CompletionResponse` are what the stages see; the
//! `Chat*` types mirror the chat-completions wire format.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - one user prompt, no conversation state
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Fully rendered prompt
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        debug!(prompt_len = prompt.len(), "CompletionRequest::new: called");
        Self { prompt }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Text of the first choice
    pub content: String,

    /// Model that served the request, as reported upstream
    pub model: Option<String>,

    /// Token usage, when reported
    pub usage: TokenUsage,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
            usage: TokenUsage::default(),
        }
    }
}

/// Token usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    #[serde(default, rename = "prompt_tokens")]
    pub input_tokens: u64,
    #[serde(default, rename = "completion_tokens")]
    pub output_tokens: u64,
}

/// Message role; every stage sends a single user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Outbound chat-completions payload
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One outbound message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

// Inbound types. Anything that does not match is a malformed response.

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub content: Option<String>,
}
