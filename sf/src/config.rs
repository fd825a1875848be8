//! SegFinder configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::llm::LlmError;

/// Main SegFinder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service configuration
    pub llm: LlmConfig,

    /// Stage limits
    pub research: ResearchConfig,

    /// HTTP endpoint configuration
    pub server: ServerConfig,

    /// Log level used when `--log-level` is not given
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .segfinder.yml
        let local_config = PathBuf::from(".segfinder.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/segfinder/segfinder.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("segfinder").join("segfinder.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed here; `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// API base URL (`/v1/chat/completions` is appended)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the bearer credential
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Public site URL sent as the referer
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// Environment variable that overrides `site-url` when set
    #[serde(rename = "site-url-env")]
    pub site_url_env: String,

    /// Client title sent with every request
    #[serde(rename = "app-title")]
    pub app_title: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "google/gemini-2.0-flash-001".to_string(),
            base_url: "https://openrouter.ai/api".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            site_url: "https://segment-finder.vercel.app".to_string(),
            site_url_env: "NEXT_PUBLIC_SITE_URL".to_string(),
            app_title: "B2B Segment Finder".to_string(),
            max_tokens: 5000,
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ResolvedLlmConfig, LlmError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using the given variable lookup
    ///
    /// The credential is captured here, once, so request handling never
    /// touches the environment.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedLlmConfig, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!(api_key_env = %self.api_key_env, "resolve_with: called");
        let api_key = match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                debug!("resolve_with: api key missing");
                return Err(LlmError::MissingApiKey(self.api_key_env.clone()));
            }
        };

        let site_url = lookup(&self.site_url_env)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.site_url.clone());

        Ok(ResolvedLlmConfig {
            model: self.model.clone(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key,
            site_url,
            app_title: self.app_title.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
        })
    }
}

/// Completion service settings with the credential captured
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    pub site_url: String,
    pub app_title: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("site_url", &self.site_url)
            .field("app_title", &self.app_title)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Stage limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Segment text is cut to this many characters before enhancement
    #[serde(rename = "max-segment-chars")]
    pub max_segment_chars: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self { max_segment_chars: 5000 }
    }
}

/// HTTP endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
