//! Responder registry
//!
//! A fixed mapping from responder name to capability descriptor, built once
//! at startup and shared read-only across all sessions. Lookup of an
//! unregistered name is a configuration defect and aborts the exchange.

use crate::error::ExchangeError;
use std::collections::HashMap;

/// Name of the entry responder that performs routing
pub const ENTRY_RESPONDER: &str = "triage";

/// Name of the catch-all responder for queries outside the specialist set
pub const GENERAL_RESPONDER: &str = "general";

/// Static capability descriptor for one responder
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderDescriptor {
    /// Unique responder name
    pub name: String,
    /// Role instructions sent to the completion service as the system prompt
    pub role_instructions: String,
    /// Marker a responder emits when it has finished contributing.
    /// Absent for responders that only stop at the round ceiling.
    pub termination_phrase: Option<String>,
}

impl ResponderDescriptor {
    pub fn new(name: &str, role_instructions: &str, termination_phrase: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            role_instructions: role_instructions.to_string(),
            termination_phrase: termination_phrase.map(str::to_string),
        }
    }

    /// Check whether a turn's content carries this responder's termination marker
    pub fn is_terminating_content(&self, content: &str) -> bool {
        self.termination_phrase
            .as_deref()
            .is_some_and(|phrase| content.contains(phrase))
    }
}

/// Process-wide, immutable registry of responders
#[derive(Debug)]
pub struct ResponderRegistry {
    responders: HashMap<String, ResponderDescriptor>,
}

impl ResponderRegistry {
    /// Build a registry from explicit descriptors
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = ResponderDescriptor>,
    {
        Self {
            responders: descriptors
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    /// Build the registry from the built-in responder definitions
    pub fn builtin() -> Self {
        let definitions = [
            ResponderDescriptor::new(
                ENTRY_RESPONDER,
                "You are a triage responder. Your role is to route the user query to the \
                 correct responder. Do not provide suggestions or answers, only name the \
                 responder that should handle the query.",
                None,
            ),
            ResponderDescriptor::new(
                "report",
                "You are a summarization responder. You create concise reports and summaries \
                 from provided articles or text. Append 'TERMINATE' to your response when \
                 finished.",
                Some("TERMINATE"),
            ),
            ResponderDescriptor::new(
                "translate",
                "You are a translation responder. You translate text to English (or other \
                 requested languages). Append 'TERMINATE' to your response when finished.",
                Some("TERMINATE"),
            ),
            ResponderDescriptor::new(
                "keyword",
                "You are a keyword extraction responder. Extract key terms and phrases from \
                 the provided text. Append 'TERMINATE' to your response when finished.",
                Some("TERMINATE"),
            ),
            ResponderDescriptor::new(
                "annotation",
                "You are an annotation responder. Create a brief annotation of the text. \
                 Append 'TERMINATE' to your response when finished.",
                Some("TERMINATE"),
            ),
            ResponderDescriptor::new(
                GENERAL_RESPONDER,
                "You handle general questions that are not natural language processing tasks.",
                None,
            ),
        ];

        Self::from_descriptors(definitions)
    }

    /// Look up a responder by name
    ///
    /// An unregistered name is a configuration defect, surfaced as
    /// [`ExchangeError::UnknownResponder`] rather than silently rerouted.
    pub fn lookup(&self, name: &str) -> Result<&ResponderDescriptor, ExchangeError> {
        self.responders
            .get(name)
            .ok_or_else(|| ExchangeError::unknown_responder(name))
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.responders.contains_key(name)
    }

    /// All registered responder names, sorted for stable prompt output
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.responders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Specialist names available as routing targets (everything but the entry)
    pub fn routable_names(&self) -> Vec<&str> {
        self.names()
            .into_iter()
            .filter(|n| *n != ENTRY_RESPONDER)
            .collect()
    }
}
