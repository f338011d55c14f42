//! Session domain model.
//!
//! A `Session` is one in-progress (or concluded) scenario run: an append-only
//! transcript plus an activity flag. Sessions are in-memory only; the protocol
//! requires no persistence beyond the lifetime of the interaction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scenario::ScenarioDefinition;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// The trainee's action.
    User,
    /// The simulated subject's reply.
    Model,
}

/// One entry in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// One scenario run.
///
/// Invariants, enforced by this type's API:
/// - the transcript is append-only and totally ordered by insertion;
/// - `is_active` is monotonic: once false it never becomes true again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub scenario_id: String,
    transcript: Vec<TranscriptEntry>,
    /// Observed behavioral cues about the simulated subject, seeded from the
    /// persona and extended with each model reply. Input to the policy checker.
    subject_cues: Vec<String>,
    is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Session {
    /// Creates a new active session for the given scenario with an empty
    /// transcript. Subject cues are seeded from the persona so the policy
    /// checker has context from the first turn.
    pub fn new(scenario: &ScenarioDefinition) -> Self {
        let now = Utc::now().to_rfc3339();
        let persona = &scenario.ai_persona;
        Self {
            id: Uuid::new_v4().to_string(),
            scenario_id: scenario.scenario_id.clone(),
            transcript: Vec::new(),
            subject_cues: vec![
                persona.persona_type.clone(),
                persona.description.clone(),
                persona.initial_state.clone(),
            ],
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Appends one entry to the transcript.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role,
            content: content.into(),
        });
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Records an additional behavioral cue about the subject.
    pub fn add_subject_cue(&mut self, cue: impl Into<String>) {
        self.subject_cues.push(cue.into());
    }

    /// Concludes the session. Idempotent: closing an already-closed session
    /// is a no-op, not an error.
    pub fn close(&mut self) {
        self.is_active = false;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn subject_cues(&self) -> &[String] {
        &self.subject_cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StaticScenarioLibrary;
    use crate::scenario::ScenarioLibrary;

    fn scenario() -> ScenarioDefinition {
        StaticScenarioLibrary::builtin()
            .unwrap()
            .get("FP-TS-001")
            .unwrap()
    }

    #[test]
    fn new_session_is_active_with_empty_transcript() {
        let session = Session::new(&scenario());
        assert!(session.is_active());
        assert!(session.transcript().is_empty());
        assert_eq!(session.scenario_id, "FP-TS-001");
        assert!(!session.id.is_empty());
    }

    #[test]
    fn transcript_is_append_only_and_ordered() {
        let mut session = Session::new(&scenario());
        session.append_turn(Role::User, "Good evening, license and registration please.");
        session.append_turn(Role::Model, "Uh... yeah, hold on, it's in here somewhere.");
        session.append_turn(Role::User, "Take your time.");
        session.append_turn(Role::Model, "Here. Why'd you stop me anyway?");

        // Two turns produce four entries in strict submission order.
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[1].role, Role::Model);
        assert_eq!(
            transcript[0].content,
            "Good evening, license and registration please."
        );
        assert_eq!(transcript[3].content, "Here. Why'd you stop me anyway?");
    }

    #[test]
    fn close_is_idempotent_and_monotonic() {
        let mut session = Session::new(&scenario());
        session.close();
        assert!(!session.is_active());

        let snapshot = session.clone();
        session.close();
        assert!(!session.is_active());
        assert_eq!(session, snapshot);
    }

    #[test]
    fn subject_cues_seed_from_persona() {
        let session = Session::new(&scenario());
        assert!(
            session
                .subject_cues()
                .iter()
                .any(|cue| cue.contains("Intoxicated"))
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::Model.to_string(), "model");
    }
}
