//! Error types for the exchange core
//!
//! Maps the failure taxonomy of the routing protocol onto explicit variants.
//! Ambiguous classification and hitting the round ceiling are NOT errors and
//! have no variant here: the former is `RoutingDecision::Undecided`, the
//! latter a normal `StopReason`.

use crate::config::ConfigError;
use crate::llm::provider::CompletionError;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that abort an in-flight exchange
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// A routing decision named a responder that is not registered.
    /// Configuration defect; never silently rerouted.
    #[error("unknown responder: {name}")]
    UnknownResponder { name: String },

    /// The external completion service failed. No retry, no partial summary.
    #[error("completion service failure: {0}")]
    Completion(#[from] CompletionError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExchangeError {
    pub fn unknown_responder<S: Into<String>>(name: S) -> Self {
        Self::UnknownResponder { name: name.into() }
    }
}

/// Sanitize error messages before they reach the logs
///
/// Redacts credential-looking patterns and sensitive file paths, and caps the
/// message length so a huge upstream body cannot flood the log stream.
pub fn sanitize_error_message(message: &str) -> String {
    static SECRET_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+").unwrap());
    static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+").unwrap()
    });

    let sanitized = SECRET_PATTERN.replace_all(message, "${1}=***");
    let mut sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        // Upstream bodies are often Cyrillic; the cut must land on a char
        // boundary, not a raw byte offset.
        let mut cut = 500 - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_responder_display() {
        let error = ExchangeError::unknown_responder("mystery_agent");
        assert_eq!(error.to_string(), "unknown responder: mystery_agent");
    }

    #[test]
    fn test_completion_error_wrapping() {
        let error: ExchangeError =
            CompletionError::NetworkError("connection refused".to_string()).into();
        assert!(matches!(error, ExchangeError::Completion(_)));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_sanitize_redacts_secrets() {
        let message = "auth failed: password=secret123 token=abc456";
        let sanitized = sanitize_error_message(message);

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc456"));
        assert!(sanitized.contains("password=***"));
        assert!(sanitized.contains("token=***"));
    }

    #[test]
    fn test_sanitize_case_insensitive() {
        let message = "PASSWORD=hunter2 Key: xyz";
        let sanitized = sanitize_error_message(message);

        assert!(!sanitized.contains("hunter2"));
        assert!(!sanitized.contains("xyz"));
    }

    #[test]
    fn test_sanitize_redacts_paths() {
        let message = "failed to read /home/user/.ssh/id_rsa";
        let sanitized = sanitize_error_message(message);

        assert!(sanitized.contains("/***REDACTED***/"));
        assert!(!sanitized.contains(".ssh/id_rsa"));
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let long_message = "x".repeat(600);
        let sanitized = sanitize_error_message(&long_message);

        assert!(sanitized.len() <= 500);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_sanitize_truncates_multibyte_on_char_boundary() {
        // Cyrillic is two bytes per char, so a naive byte-index slice would
        // panic mid-character here.
        let long_message = format!("x{}", "ф".repeat(300));
        let sanitized = sanitize_error_message(&long_message);

        assert!(sanitized.len() <= 500);
        assert!(sanitized.ends_with("...[truncated]"));
        assert!(sanitized.starts_with("xф"));
    }

    #[test]
    fn test_sanitize_empty_message() {
        assert_eq!(sanitize_error_message(""), "");
    }

    #[test]
    fn test_sanitize_exactly_500_chars() {
        let message = "x".repeat(500);
        let sanitized = sanitize_error_message(&message);
        assert_eq!(sanitized.len(), 500);
        assert!(!sanitized.contains("truncated"));
    }
}
