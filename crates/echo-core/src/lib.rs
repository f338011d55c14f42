//! Core domain model for the Echo role-play training simulator.
//!
//! This crate is pure and synchronous: wire types, total validators, the
//! session aggregate, and the deterministic policy/approach heuristics. The
//! completion-service boundary and the turn orchestrator live in the
//! `echo-interaction` and `echo-application` crates.

pub mod approach;
pub mod error;
pub mod policy;
pub mod report;
pub mod scenario;
pub mod session;
pub mod turn;
pub mod validate;

// Re-export common error type
pub use error::{EchoError, Result};
