//! SegFinder - two-stage market segment research
//!
//! Given an industry, SegFinder asks a chat-completion service for promising
//! segments for high-ticket fractional CFO services, then feeds that list
//! back for a structured deep dive on every segment. If the second call
//! fails, the first list is still shown.
//!
//! # Modules
//!
//! - [`llm`] - completion service client
//! - [`prompts`] - stage prompt templates
//! - [`research`] - the Generator and Enhancer stages
//! - [`session`] - research session state machine
//! - [`orchestrator`] - sequences the stages over a session
//! - [`server`] - HTTP endpoints for both stages
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod research;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig, ResearchConfig, ResolvedLlmConfig, ServerConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenRouterClient, create_client};
pub use orchestrator::{Orchestrator, ProgressUpdate};
pub use prompts::PromptLoader;
pub use research::{
    ErrorEnvelope, HttpSegmentService, LocalSegmentService, ResearchError, SegmentEnhancer, SegmentGenerator,
    SegmentService,
};
pub use server::AppState;
pub use session::{ResearchSession, SessionError, SessionEvent, SessionState};
