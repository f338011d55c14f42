//! The completion-service seam.
//!
//! The simulator treats the hosted generative API as an opaque collaborator:
//! one rendered request in, one text completion out. Everything behind this
//! trait is replaceable, including with scripted doubles in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use echo_core::session::Role;

/// Transport-level error from a completion agent.
///
/// Mapped to the domain taxonomy (`CompletionServiceUnavailable`) by the
/// application layer; retry policy is the caller's concern.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    /// The agent could not execute the request at all.
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote service replied with a failure status.
    #[error("Completion process error{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// One entry of prior conversation handed to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// A rendered request for the completion service: optional standing
/// instruction, prior conversation, and the new prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_instruction: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            history: Vec::new(),
            prompt: prompt.into(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }
}

/// An agent that exchanges one request for one text completion.
///
/// At-least-one-completion-per-call; no streaming. The call must be bounded
/// by a timeout in the implementation.
#[async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Short human-readable description of what this agent is good at.
    fn expertise(&self) -> &str;

    /// Executes the request and returns the completion text.
    async fn execute(&self, request: CompletionRequest) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_carries_all_parts() {
        let request = CompletionRequest::new("Respond in character.")
            .with_system_instruction("You are Echo.")
            .with_history(vec![HistoryEntry {
                role: Role::User,
                content: "Good evening.".into(),
            }]);

        assert_eq!(request.system_instruction.as_deref(), Some("You are Echo."));
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.prompt, "Respond in character.");
    }

    #[test]
    fn process_error_display_includes_status() {
        let err = AgentError::ProcessError {
            status_code: Some(503),
            message: "overloaded".into(),
            is_retryable: true,
            retry_after: None,
        };
        assert_eq!(err.to_string(), "Completion process error (503): overloaded");
    }
}
