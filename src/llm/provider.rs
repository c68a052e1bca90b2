//! Completion client trait and shared message types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single message in a conversation passed to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Message roles in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Client for the external completion service
///
/// The core consumes this as an opaque collaborator: one call produces one
/// piece of text or fails. No retry happens behind this trait - a failure
/// surfaces immediately and aborts the exchange.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logging (e.g. "openrouter")
    fn name(&self) -> &str;

    /// Produce a completion for the given role instructions and history
    async fn complete(
        &self,
        role_instructions: &str,
        history: &[Message],
    ) -> Result<String, CompletionError>;

    /// Check that the client is configured and the service is reachable
    async fn health_check(&self) -> Result<(), CompletionError>;
}

/// Completion service errors
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("client not configured: {0}")]
    NotConfigured(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "hello");

        let assistant = Message::assistant("hi");
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(
            serde_json::to_string(&MessageRole::System).unwrap(),
            "\"system\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::User).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_completion_error_display() {
        let errors = vec![
            CompletionError::NotConfigured("test".to_string()),
            CompletionError::AuthenticationFailed("test".to_string()),
            CompletionError::RateLimited("test".to_string()),
            CompletionError::NetworkError("test".to_string()),
            CompletionError::ApiError("test".to_string()),
            CompletionError::InvalidResponse("test".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
