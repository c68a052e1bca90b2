//! Exchange coordinator
//!
//! Drives one bounded multi-turn exchange per inbound query. The conversation
//! follows a star topology: the entry responder routes, the selected
//! specialist produces exactly one turn, then control returns to the entry
//! responder for a termination check before any further routing. Specialists
//! never hand off to each other directly, which keeps chains bounded.
//!
//! Termination is an enumerated condition, not an incidental loop exit: an
//! exchange stops on [`StopReason::TerminationPhraseSeen`] or
//! [`StopReason::RoundLimitReached`], and the round ceiling is a hard
//! invariant (`turn_count <= max_rounds`, always). Hitting the ceiling is a
//! normal outcome - whatever the last turn produced is still delivered.

use crate::config::ConfigError;
use crate::error::ExchangeError;
use crate::llm::provider::{CompletionClient, Message};
use crate::responders::{ResponderRegistry, GENERAL_RESPONDER};
use crate::routing::{classify, RoutingDecision};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One responder's contribution to an exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub speaker: String,
    pub content: String,
}

/// Why an exchange stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The current responder's termination phrase appeared in its turn
    TerminationPhraseSeen,
    /// The round ceiling was reached without an explicit termination marker
    RoundLimitReached,
}

/// Aggregated result of one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeResult {
    /// Content of the final turn, delivered to the caller as the reply
    pub summary_text: String,
    pub last_speaker: String,
    pub turn_count: u32,
    pub stop_reason: StopReason,
}

/// Coordinates bounded exchanges among responders
///
/// Holds only shared read-only state; one coordinator serves all sessions
/// concurrently without synchronization.
pub struct ExchangeCoordinator {
    registry: Arc<ResponderRegistry>,
    client: Arc<dyn CompletionClient>,
}

impl ExchangeCoordinator {
    pub fn new(registry: Arc<ResponderRegistry>, client: Arc<dyn CompletionClient>) -> Self {
        Self { registry, client }
    }

    /// Run one exchange to completion
    ///
    /// Terminates within `max_rounds` turns unconditionally. Fails on
    /// completion-service failure, on a routing decision naming an
    /// unregistered responder, or on a zero `max_rounds`; reaching the
    /// round ceiling is not an error.
    pub async fn run(&self, query: &str, max_rounds: u32) -> Result<ExchangeResult, ExchangeError> {
        // A zero ceiling can never produce a turn to deliver; reject it up
        // front instead of looping.
        if max_rounds == 0 {
            return Err(ExchangeError::Config(ConfigError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            )));
        }

        let mut history: Vec<Turn> = Vec::new();
        let mut turn_count: u32 = 0;
        // Round 1 routes on the raw query; later rounds route on the latest
        // turn's content, keeping routing deterministic whenever keywords are
        // present.
        let mut routing_text = query.to_string();

        loop {
            let speaker = self.route(&routing_text, query, &history).await?;
            let descriptor = self.registry.lookup(&speaker)?;

            debug!(responder = %speaker, round = turn_count + 1, "responder turn");
            let content = self
                .client
                .complete(&descriptor.role_instructions, &build_history(query, &history))
                .await?;

            let terminated = descriptor.is_terminating_content(&content);
            history.push(Turn {
                speaker: speaker.clone(),
                content: content.clone(),
            });
            turn_count += 1;

            if terminated {
                info!(
                    last_speaker = %speaker,
                    turns = turn_count,
                    "exchange terminated by phrase"
                );
                return Ok(ExchangeResult {
                    summary_text: content,
                    last_speaker: speaker,
                    turn_count,
                    stop_reason: StopReason::TerminationPhraseSeen,
                });
            }

            if turn_count >= max_rounds {
                info!(
                    last_speaker = %speaker,
                    turns = turn_count,
                    "exchange stopped at round ceiling"
                );
                return Ok(ExchangeResult {
                    summary_text: content,
                    last_speaker: speaker,
                    turn_count,
                    stop_reason: StopReason::RoundLimitReached,
                });
            }

            routing_text = content;
        }
    }

    /// Entry responder routing step
    ///
    /// Classifier first; on `Undecided` the pick is delegated to the entry
    /// responder's judgement via the completion service.
    async fn route(
        &self,
        routing_text: &str,
        query: &str,
        history: &[Turn],
    ) -> Result<String, ExchangeError> {
        match classify(routing_text) {
            RoutingDecision::Routed { responder } => {
                debug!(responder = %responder, "classifier routed query");
                Ok(responder)
            }
            RoutingDecision::Undecided { instruction } => {
                debug!("classifier undecided, deferring to entry responder");
                self.delegate_pick(query, history, &instruction).await
            }
        }
    }

    /// Ask the entry responder to pick a target, then resolve its free-form
    /// reply against the registered names
    ///
    /// The completion service proposes, the registry validates. A reply that
    /// resolves to no registered name falls back to the general responder
    /// rather than dropping the exchange.
    async fn delegate_pick(
        &self,
        query: &str,
        history: &[Turn],
        instruction: &str,
    ) -> Result<String, ExchangeError> {
        let entry = self.registry.lookup(crate::responders::ENTRY_RESPONDER)?;

        let mut prompt = format!("{instruction}\n\nAvailable responders:\n");
        for name in self.registry.routable_names() {
            prompt.push_str(&format!("- {name}\n"));
        }
        prompt.push_str(&format!(
            "\nQuery: {query}\n\nReply with the single best responder name."
        ));

        let mut messages = build_history(query, history);
        messages.push(Message::user(prompt));

        let reply = self
            .client
            .complete(&entry.role_instructions, &messages)
            .await?;

        Ok(self.resolve_pick(&reply))
    }

    /// Resolve a free-form pick reply to a registered specialist name (pure)
    fn resolve_pick(&self, reply: &str) -> String {
        let reply_lower = reply.to_lowercase();
        for name in self.registry.routable_names() {
            if reply_lower.contains(name) {
                debug!(responder = %name, "entry responder picked target");
                return name.to_string();
            }
        }

        warn!(
            reply = %reply,
            "entry responder pick resolved to no registered name, using general"
        );
        GENERAL_RESPONDER.to_string()
    }
}

/// Build the completion-service history for an exchange (pure)
///
/// The inbound query is the opening user message; each prior turn appears as
/// an assistant message prefixed with its speaker so responders can tell who
/// said what.
fn build_history(query: &str, turns: &[Turn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(Message::user(query));
    for turn in turns {
        messages.push(Message::assistant(format!(
            "{}: {}",
            turn.speaker, turn.content
        )));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::MessageRole;

    #[test]
    fn test_build_history_order_and_roles() {
        let turns = vec![
            Turn {
                speaker: "report".to_string(),
                content: "draft".to_string(),
            },
            Turn {
                speaker: "report".to_string(),
                content: "final".to_string(),
            },
        ];

        let messages = build_history("summarize this", &turns);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "summarize this");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "report: draft");
        assert_eq!(messages[2].content, "report: final");
    }

    #[test]
    fn test_stop_reason_equality() {
        assert_eq!(
            StopReason::TerminationPhraseSeen,
            StopReason::TerminationPhraseSeen
        );
        assert_ne!(
            StopReason::TerminationPhraseSeen,
            StopReason::RoundLimitReached
        );
    }
}
