//! Error types for the Echo simulation core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Echo simulation core.
///
/// Every failure the core can produce is a distinguishable, typed variant so
/// that calling code can choose differentiated handling (retry, correct the
/// request, or start over). Validation failures are never defaulted or
/// swallowed; an invalid payload always surfaces as `SchemaViolation`.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EchoError {
    /// A payload (scenario, turn response, or report) failed structural validation.
    #[error("Schema violation in {payload}: {detail}")]
    SchemaViolation {
        payload: &'static str,
        detail: String,
    },

    /// Requested scenario id does not resolve against the scenario library.
    #[error("Unknown scenario: '{id}'")]
    UnknownScenario { id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A turn was submitted after the session concluded.
    #[error("Session '{id}' is closed; no further turns may be submitted")]
    SessionClosed { id: String },

    /// A turn was submitted while another turn for the same session is outstanding.
    #[error("Session '{id}' already has a turn in flight")]
    TurnInFlight { id: String },

    /// Transport failure or timeout reaching the completion service.
    #[error("Completion service unavailable: {message}")]
    CompletionServiceUnavailable { message: String },

    /// The completion service replied, but the content failed schema validation
    /// even after a single re-request.
    #[error("Invalid completion response: {detail}")]
    InvalidCompletionResponse { detail: String },

    /// An after-action report was requested while the session was still active.
    #[error("Session '{id}' has not concluded; no report can be generated")]
    SessionNotConcluded { id: String },
}

impl EchoError {
    /// Creates a SchemaViolation error for the named payload kind.
    pub fn schema_violation(payload: &'static str, detail: impl Into<String>) -> Self {
        Self::SchemaViolation {
            payload,
            detail: detail.into(),
        }
    }

    /// Creates an UnknownScenario error
    pub fn unknown_scenario(id: impl Into<String>) -> Self {
        Self::UnknownScenario { id: id.into() }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a SessionClosed error
    pub fn session_closed(id: impl Into<String>) -> Self {
        Self::SessionClosed { id: id.into() }
    }

    /// Creates a CompletionServiceUnavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::CompletionServiceUnavailable {
            message: message.into(),
        }
    }

    /// Whether the caller may meaningfully retry the failed operation.
    ///
    /// Transport failures and schema-level glitches are retryable; lifecycle
    /// violations (closed session, unknown scenario, premature report) require
    /// the caller to change the request instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SchemaViolation { .. }
                | Self::CompletionServiceUnavailable { .. }
                | Self::InvalidCompletionResponse { .. }
                | Self::TurnInFlight { .. }
        )
    }

    /// Check if this is a SchemaViolation error
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }
}

/// A type alias for `Result<T, EchoError>`.
pub type Result<T> = std::result::Result<T, EchoError>;
