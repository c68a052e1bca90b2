//! Query routing: decision type and keyword classifier
//!
//! Routing is split in two explicit stages. The [`classifier`] maps raw query
//! text to a [`RoutingDecision`] from fixed keyword tables; when it comes back
//! [`RoutingDecision::Undecided`], the exchange coordinator defers the pick to
//! the entry responder's own judgement. The two states are never conflated so
//! tests can force either path deterministically.

pub mod classifier;
pub mod decision;

pub use classifier::classify;
pub use decision::RoutingDecision;
