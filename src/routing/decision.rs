//! Routing decision type
//!
//! The two possible outcomes of classifying a query: a concrete target
//! responder, or an instruction telling the entry responder to pick a target
//! itself. Exactly one of the two, never both.

use serde::{Deserialize, Serialize};

/// Outcome of classifying a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// A keyword group matched - route to this responder
    Routed {
        /// Responder name (must exist in the registry)
        responder: String,
    },
    /// No keyword group matched - the entry responder decides
    Undecided {
        /// Instruction handed to the entry responder as context for its pick
        instruction: String,
    },
}

impl RoutingDecision {
    pub fn routed<S: Into<String>>(responder: S) -> Self {
        Self::Routed {
            responder: responder.into(),
        }
    }

    /// Check if this decision names a concrete responder
    pub fn is_routed(&self) -> bool {
        matches!(self, RoutingDecision::Routed { .. })
    }

    /// Check if this decision defers to the entry responder
    pub fn is_undecided(&self) -> bool {
        matches!(self, RoutingDecision::Undecided { .. })
    }

    /// Extract the target responder name if routed
    pub fn responder(&self) -> Option<&str> {
        match self {
            RoutingDecision::Routed { responder } => Some(responder),
            _ => None,
        }
    }
}
