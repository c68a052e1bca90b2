//! Completion service abstraction layer
//!
//! The exchange core treats text generation as an opaque collaborator behind
//! the [`provider::CompletionClient`] trait; [`providers`] holds the concrete
//! OpenRouter-backed implementation.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
