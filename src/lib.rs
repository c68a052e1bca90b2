//! textroute - WebSocket triage service for natural-language queries
//!
//! Accepts queries over persistent WebSocket connections, classifies each
//! query's intent, routes it to one of several specialist responders, runs a
//! bounded multi-turn exchange among them, and returns a single aggregated
//! answer per query.
//!
//! # Overview
//!
//! - [`routing`] - keyword classification into an explicit routing decision
//! - [`responders`] - immutable registry of responder capability descriptors
//! - [`exchange`] - the bounded star-topology exchange state machine
//! - [`server`] - warp WebSocket server and per-connection session handling
//! - [`llm`] - completion service client behind a trait seam
//!
//! # Quick Start
//!
//! ```rust
//! use textroute::exchange::ExchangeCoordinator;
//! use textroute::responders::ResponderRegistry;
//! use textroute::testing::mocks::MockCompletionClient;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(ResponderRegistry::builtin());
//! let client = Arc::new(MockCompletionClient::repeating("Bonjour. TERMINATE"));
//! let coordinator = ExchangeCoordinator::new(registry, client);
//!
//! let result = coordinator.run("translate: hello", 10).await.unwrap();
//! assert_eq!(result.last_speaker, "translate");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod llm;
pub mod observability;
pub mod responders;
pub mod routing;
pub mod server;
pub mod testing;

pub use config::ServiceConfig;
pub use error::ExchangeError;
pub use exchange::{ExchangeCoordinator, ExchangeResult, StopReason, Turn};
pub use responders::{ResponderDescriptor, ResponderRegistry};
pub use routing::{classify, RoutingDecision};
