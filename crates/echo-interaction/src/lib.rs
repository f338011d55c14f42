//! Completion-service boundary for the Echo simulator.
//!
//! Defines the `CompletionAgent` seam the orchestrator drives, the Gemini
//! REST implementation, and the prompt renderers for the turn and
//! after-action flows.

pub mod agent;
pub mod gemini_api_agent;
pub mod prompts;

pub use agent::{AgentError, CompletionAgent, CompletionRequest, HistoryEntry};
pub use gemini_api_agent::GeminiApiAgent;
