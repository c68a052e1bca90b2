//! Keyword classifier
//!
//! Pure function from query text to a [`RoutingDecision`]. The query is
//! lower-cased and tested against an ordered list of keyword groups;
//! first matching group wins, not best match. Queries in any language are
//! accepted - the tables deliberately mix English and Russian keywords to
//! match the traffic the service sees.
//!
//! The tables are static and never mutated, so `classify` is safe to call
//! concurrently from any number of sessions without synchronization.

use crate::routing::decision::RoutingDecision;
use once_cell::sync::Lazy;

/// Instruction handed to the entry responder when no keyword group matches
pub const UNDECIDED_INSTRUCTION: &str =
    "No specific keywords found. Decide the target responder based on the content.";

/// Ordered keyword groups; first match wins
static KEYWORD_GROUPS: Lazy<Vec<(&'static str, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        ("translate", vec!["переведи", "translate"]),
        (
            "report",
            vec!["реферат", "summary", "сократи", "analyze", "analysis", "data"],
        ),
        ("annotation", vec!["аннотация", "annotation"]),
        ("keyword", vec!["ключевые слова", "keywords"]),
    ]
});

/// Classify a query into a routing decision
///
/// Deterministic and side-effect free. An empty query matches nothing and
/// yields `Undecided` like any other unmatched text.
pub fn classify(query: &str) -> RoutingDecision {
    let query_lower = query.to_lowercase();

    for (responder, keywords) in KEYWORD_GROUPS.iter() {
        if keywords.iter().any(|kw| query_lower.contains(kw)) {
            return RoutingDecision::routed(*responder);
        }
    }

    RoutingDecision::Undecided {
        instruction: UNDECIDED_INSTRUCTION.to_string(),
    }
}
