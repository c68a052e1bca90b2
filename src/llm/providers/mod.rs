//! Concrete completion service clients

pub mod openrouter;

pub use openrouter::*;
