//! The turn orchestrator.
//!
//! `SimulatorEngine` drives one interaction cycle per call: render a request
//! from the session's scenario and transcript, await the completion service,
//! validate the reply, and only then commit the exchange. Validation happens
//! before any mutation, so a failed turn leaves the session exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use echo_core::approach::{Tone, analyze_officer_approach};
use echo_core::error::{EchoError, Result};
use echo_core::policy::{PolicyConsideration, check_policy};
use echo_core::report::AfterActionReport;
use echo_core::scenario::{ScenarioDefinition, ScenarioLibrary};
use echo_core::session::{Role, Session};
use echo_core::turn::{Feedback, FeedbackType, TurnResponse};
use echo_core::validate;
use echo_interaction::{CompletionAgent, CompletionRequest};
use echo_interaction::prompts;

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// How many times a completion is re-requested when its content fails
    /// schema validation. Transport failures are never retried here; that is
    /// the caller's concern.
    pub invalid_response_retries: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            invalid_response_retries: 1,
        }
    }
}

/// The result of one successfully committed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub response: TurnResponse,
    /// Deterministic legal-policy annotations for this turn. Never empty.
    pub considerations: Vec<PolicyConsideration>,
    /// True when this turn concluded the scenario.
    pub session_concluded: bool,
}

/// Orchestrates role-play sessions against a completion service.
///
/// Sessions are exclusively owned: each lives behind its own mutex, and a
/// second turn submitted while one is outstanding is rejected with
/// `TurnInFlight` rather than queued. Independent sessions run concurrently.
pub struct SimulatorEngine {
    library: Arc<dyn ScenarioLibrary>,
    agent: Arc<dyn CompletionAgent>,
    config: SimulatorConfig,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SimulatorEngine {
    /// Creates an engine over the given scenario library and completion agent.
    pub fn new(library: Arc<dyn ScenarioLibrary>, agent: Arc<dyn CompletionAgent>) -> Self {
        Self::with_config(library, agent, SimulatorConfig::default())
    }

    pub fn with_config(
        library: Arc<dyn ScenarioLibrary>,
        agent: Arc<dyn CompletionAgent>,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            library,
            agent,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a new session for a scenario and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownScenario` if the id does not resolve against the library.
    pub async fn create_session(&self, scenario_id: &str) -> Result<String> {
        let scenario = self
            .library
            .get(scenario_id)
            .ok_or_else(|| EchoError::unknown_scenario(scenario_id))?;

        let session = Session::new(&scenario);
        let session_id = session.id.clone();

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));

        log::info!("Created session {session_id} for scenario {scenario_id}");
        Ok(session_id)
    }

    /// Submits one officer action and returns the evaluated exchange.
    ///
    /// The transition is all-or-nothing: the completion is requested and
    /// validated first, and the transcript is only mutated on success. A
    /// schema-invalid completion is re-requested once before failing with
    /// `InvalidCompletionResponse`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown session id, `TurnInFlight` if a turn is
    /// already outstanding, `SessionClosed` after conclusion,
    /// `CompletionServiceUnavailable` on transport failure.
    pub async fn submit_turn(&self, session_id: &str, user_action: &str) -> Result<TurnOutcome> {
        let session_arc = self.session_arc(session_id).await?;
        let mut session = session_arc
            .try_lock()
            .map_err(|_| EchoError::TurnInFlight {
                id: session_id.to_string(),
            })?;

        if !session.is_active() {
            return Err(EchoError::session_closed(session_id));
        }

        let scenario = self.scenario_for(&session)?;
        let request = prompts::turn_request(&scenario, session.transcript(), user_action);
        let mut response = self.request_turn(request).await?;

        // Local tone feedback, independent of whatever the model returned.
        response.real_time_feedback.push(tone_feedback(user_action));

        let officer_actions = [user_action.to_string()];
        let considerations = check_policy(&officer_actions, session.subject_cues());

        // Validate-then-commit: everything below is infallible.
        session.append_turn(Role::User, user_action);
        session.append_turn(Role::Model, response.ai_dialogue.clone());
        session.add_subject_cue(response.narrator_text.clone());
        session.add_subject_cue(response.ai_dialogue.clone());

        let session_concluded = !response.is_scenario_active;
        if session_concluded {
            session.close();
            log::info!("Session {session_id} concluded");
        }

        Ok(TurnOutcome {
            response,
            considerations,
            session_concluded,
        })
    }

    /// Generates the after-action report for a concluded session.
    ///
    /// Repeatable: a failed generation can simply be requested again without
    /// re-running the scenario.
    ///
    /// # Errors
    ///
    /// `SessionNotConcluded` while the session is still active.
    pub async fn generate_report(&self, session_id: &str) -> Result<AfterActionReport> {
        let session_arc = self.session_arc(session_id).await?;
        let request = {
            let session = session_arc
                .try_lock()
                .map_err(|_| EchoError::TurnInFlight {
                    id: session_id.to_string(),
                })?;

            if session.is_active() {
                return Err(EchoError::SessionNotConcluded {
                    id: session_id.to_string(),
                });
            }

            let scenario = self.scenario_for(&session)?;
            prompts::report_request(&scenario, session.transcript())
        };

        self.request_report(request).await
    }

    /// Discards a session. No side effects beyond dropping the in-memory
    /// state; returns whether the session existed.
    pub async fn abandon_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            log::info!("Abandoned session {session_id}");
        }
        removed
    }

    /// Returns a read-only clone of a session for display purposes.
    pub async fn session_snapshot(&self, session_id: &str) -> Option<Session> {
        let session_arc = {
            let sessions = self.sessions.read().await;
            sessions.get(session_id).cloned()
        }?;
        let session = session_arc.lock().await;
        Some(session.clone())
    }

    async fn session_arc(&self, session_id: &str) -> Result<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| EchoError::not_found("session", session_id))
    }

    fn scenario_for(&self, session: &Session) -> Result<ScenarioDefinition> {
        self.library
            .get(&session.scenario_id)
            .ok_or_else(|| EchoError::unknown_scenario(&session.scenario_id))
    }

    async fn request_turn(&self, request: CompletionRequest) -> Result<TurnResponse> {
        self.request_validated(request, |text| {
            let raw = validate::parse_completion_json("turnResponse", text)?;
            validate::validate_turn_response(&raw)
        })
        .await
    }

    async fn request_report(&self, request: CompletionRequest) -> Result<AfterActionReport> {
        self.request_validated(request, |text| {
            let raw = validate::parse_completion_json("afterActionReport", text)?;
            validate::validate_after_action_report(&raw)
        })
        .await
    }

    /// Executes a completion request and validates its content, re-requesting
    /// on schema mismatch up to the configured budget. A transport failure is
    /// surfaced immediately as `CompletionServiceUnavailable`; an exhausted
    /// budget becomes `InvalidCompletionResponse`.
    async fn request_validated<T>(
        &self,
        request: CompletionRequest,
        validate_text: impl Fn(&str) -> Result<T>,
    ) -> Result<T> {
        let attempts = 1 + self.config.invalid_response_retries;
        let mut last_detail = String::new();

        for attempt in 1..=attempts {
            let text = self
                .agent
                .execute(request.clone())
                .await
                .map_err(|e| EchoError::service_unavailable(e.to_string()))?;

            match validate_text(&text) {
                Ok(value) => return Ok(value),
                Err(EchoError::SchemaViolation { detail, .. }) => {
                    log::warn!(
                        "Completion content failed validation (attempt {attempt}/{attempts}): {detail}"
                    );
                    last_detail = detail;
                }
                Err(other) => return Err(other),
            }
        }

        Err(EchoError::InvalidCompletionResponse {
            detail: last_detail,
        })
    }
}

fn tone_feedback(user_action: &str) -> Feedback {
    let analysis = analyze_officer_approach(user_action);
    let feedback_type = match analysis.tone {
        Tone::Empathetic => FeedbackType::Positive,
        Tone::Aggressive => FeedbackType::Critique,
        Tone::Professional | Tone::Rushed => FeedbackType::Informational,
    };
    let effect = if analysis.tone == Tone::Empathetic {
        "de-escalate"
    } else {
        "escalate"
    };

    let mut message = format!(
        "Your tone was perceived as {}. This is likely to {} the situation.",
        analysis.tone, effect
    );
    if !analysis.techniques.is_empty() {
        let techniques = analysis
            .techniques
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(" Techniques observed: {techniques}."));
    }

    Feedback {
        feedback_id: format!("RTF-{}", Uuid::new_v4()),
        feedback_type,
        message,
    }
}
