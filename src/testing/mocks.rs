//! Mock completion client for tests

use crate::llm::provider::{CompletionClient, CompletionError, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// One recorded call to the mock client
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub role_instructions: String,
    pub history: Vec<Message>,
}

/// Scriptable completion client
///
/// Replies are popped from the script in order; once the script is exhausted
/// the fallback reply is returned for every further call. Every call is
/// recorded for assertions.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    fallback: Result<String, CompletionError>,
    healthy: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    /// Replies in order; further calls fail with an "exhausted" error so an
    /// unexpected extra call shows up as a test failure
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            fallback: Err(CompletionError::ApiError("mock script exhausted".to_string())),
            healthy: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same reply for every call, forever
    pub fn repeating<S: Into<String>>(reply: S) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(reply.into()),
            healthy: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a network error
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(CompletionError::NetworkError(
                "mock completion failure".to_string(),
            )),
            healthy: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// After the script runs out, repeat this reply instead of failing
    pub fn then_repeat<S: Into<String>>(mut self, reply: S) -> Self {
        self.fallback = Ok(reply.into());
        self
    }

    /// All calls made so far
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        role_instructions: &str,
        history: &[Message],
    ) -> Result<String, CompletionError> {
        self.calls.lock().await.push(RecordedCall {
            role_instructions: role_instructions.to_string(),
            history: history.to_vec(),
        });

        match self.script.lock().await.pop_front() {
            Some(reply) => reply,
            None => self.fallback.clone(),
        }
    }

    async fn health_check(&self) -> Result<(), CompletionError> {
        if self.healthy {
            Ok(())
        } else {
            Err(CompletionError::NetworkError(
                "mock completion failure".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order_then_exhausted() {
        let mock = MockCompletionClient::scripted(["one", "two"]);

        assert_eq!(mock.complete("role", &[]).await.unwrap(), "one");
        assert_eq!(mock.complete("role", &[]).await.unwrap(), "two");
        assert!(mock.complete("role", &[]).await.is_err());
        assert_eq!(mock.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_repeating_never_exhausts() {
        let mock = MockCompletionClient::repeating("same");
        for _ in 0..20 {
            assert_eq!(mock.complete("role", &[]).await.unwrap(), "same");
        }
    }

    #[tokio::test]
    async fn test_failing_client() {
        let mock = MockCompletionClient::failing();
        assert!(matches!(
            mock.complete("role", &[]).await,
            Err(CompletionError::NetworkError(_))
        ));
        assert!(mock.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let mock = MockCompletionClient::repeating("ok");
        let history = vec![Message::user("hello")];
        mock.complete("be helpful", &history).await.unwrap();

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].role_instructions, "be helpful");
        assert_eq!(calls[0].history, history);
    }
}
