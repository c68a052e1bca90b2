//! Testing utilities and mock implementations
//!
//! Mock completion client so exchanges can be driven deterministically
//! without a live completion service.

pub mod mocks;

pub use mocks::*;
