//! OpenRouter completion client
//!
//! Speaks the OpenAI-compatible chat-completions wire format against a
//! configurable base URL. Every call carries the role instructions as the
//! system message followed by the exchange history.
//!
//! The per-request timeout is deliberate: the round ceiling bounds how many
//! completion calls an exchange makes, but only this timeout bounds how long
//! a single call may take.

use crate::llm::provider::{CompletionClient, CompletionError, Message, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// OpenRouter client configuration
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.5-flash-lite-preview-09-2025".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// OpenRouter completion client
pub struct OpenRouterClient {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterClient {
    /// Create a new client; fails fast when the API key is absent
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        if config.api_key.is_empty() {
            return Err(CompletionError::NotConfigured(
                "OpenRouter API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Build the wire request from role instructions and history (pure)
    fn build_wire_request(&self, role_instructions: &str, history: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: role_instructions.to_string(),
        });
        for message in history {
            messages.push(ChatMessage {
                role: match message.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: message.content.clone(),
            });
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages,
        }
    }

    /// Extract the completion text from the wire response (pure)
    fn parse_wire_response(response: ChatResponse) -> Result<String, CompletionError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("no choices returned".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| CompletionError::InvalidResponse("choice has no content".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        role_instructions: &str,
        history: &[Message],
    ) -> Result<String, CompletionError> {
        let wire_request = self.build_wire_request(role_instructions, history);
        debug!(
            model = %wire_request.model,
            messages = wire_request.messages.len(),
            "completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                let message = format!(
                    "HTTP request failed: {} (is_connect: {}, is_timeout: {})",
                    e,
                    e.is_connect(),
                    e.is_timeout()
                );
                warn!("completion network error: {}", message);
                CompletionError::NetworkError(message)
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CompletionError::AuthenticationFailed(format!(
                "completion service rejected credentials: {status}"
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited(format!(
                "completion service rate limit: {status}"
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "completion API error: {}", error_text);
            return Err(CompletionError::ApiError(format!(
                "completion service error: {status} - {error_text}"
            )));
        }

        let wire_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &wire_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        Self::parse_wire_response(wire_response)
    }

    async fn health_check(&self) -> Result<(), CompletionError> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CompletionError::AuthenticationFailed(
                "completion service health check failed".to_string(),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
