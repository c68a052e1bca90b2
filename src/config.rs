//! Configuration system for the triage service
//!
//! TOML-based configuration with environment-variable indirection for the
//! completion service credential. The credential itself never appears in the
//! config file, only the name of the environment variable holding it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub llm: LlmSection,
    #[serde(default)]
    pub exchange: ExchangeSection,
}

/// WebSocket server section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Address to bind the WebSocket/health server to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// Completion service section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Model identifier passed to the completion service
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Base URL of the OpenAI-compatible completions endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds for completion calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "google/gemini-2.5-flash-lite-preview-09-2025".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Exchange coordinator section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeSection {
    /// Hard ceiling on responder turns per exchange
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl Default for ExchangeSection {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

fn default_max_rounds() -> u32 {
    10
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange.max_rounds == 0 {
            return Err(ConfigError::InvalidConfig(
                "exchange.max_rounds must be at least 1".to_string(),
            ));
        }
        if self.llm.api_key_env.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "llm.api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the completion service API key from the environment
    ///
    /// Called once at startup; a missing variable is a fatal startup error.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| ConfigError::EnvVarNotFound(self.llm.api_key_env.clone()))
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:0"

[llm]
api_key_env = "TEXTROUTE_API_KEY"
"#;
        toml::from_str(toml_content).expect("test config should parse")
    }
}
