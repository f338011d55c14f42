//! Application layer for the Echo simulator.
//!
//! Owns session lifecycle and the turn orchestration state machine over the
//! collaborators defined in `echo-core` and `echo-interaction`.

pub mod simulator;

pub use simulator::{SimulatorConfig, SimulatorEngine, TurnOutcome};
