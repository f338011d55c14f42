//! Deterministic legal-policy consideration checker.
//!
//! This is a stand-alone heuristic, not a legal determination: rules match
//! case-insensitive substrings of the current turn's inputs against a fixed
//! English vocabulary. It is deliberately kept behind a single function so a
//! richer reasoning engine can replace it without touching the orchestrator.

use serde::{Deserialize, Serialize};

/// Jurisdiction a consideration cites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum Jurisdiction {
    Florida,
    Federal,
}

/// Confidence the heuristic assigns to a consideration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A canned legal-reference annotation attached to a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConsideration {
    pub cite: String,
    pub jurisdiction: Jurisdiction,
    pub rationale: String,
    pub confidence: Confidence,
}

// Rule vocabularies. Matching is substring-based and case-insensitive;
// "step away"/"step out" count as detention because a directed movement
// command restrains the subject's freedom to leave.
const DETENTION_ACTIONS: &[&str] = &["stop", "detain", "step away", "step out"];
const EVASIVE_CUES: &[&str] = &["evasive", "suspicious"];
const CUSTODY_ACTIONS: &[&str] = &["arrest", "custody"];
const QUESTIONING_ACTIONS: &[&str] = &["question", "ask", "tell me", "what happened"];

fn any_match(inputs: &[String], vocabulary: &[&str]) -> bool {
    inputs.iter().any(|input| {
        let lower = input.to_lowercase();
        vocabulary.iter().any(|term| lower.contains(term))
    })
}

/// Evaluates the policy rules against one turn's inputs.
///
/// Rules are evaluated independently; all matching rules fire, in declaration
/// order. The result is never empty: when no rule fires, a single "no
/// considerations triggered" entry is returned.
pub fn check_policy(
    officer_actions: &[String],
    subject_cues: &[String],
) -> Vec<PolicyConsideration> {
    let mut considerations = Vec::new();

    // Terry stop threshold: investigatory detention against evasive behavior.
    if any_match(officer_actions, DETENTION_ACTIONS) && any_match(subject_cues, EVASIVE_CUES) {
        considerations.push(PolicyConsideration {
            cite: "Terry v. Ohio".to_string(),
            jurisdiction: Jurisdiction::Federal,
            rationale: "Reasonable suspicion for an investigatory detention may be justified \
                        based on evasive behavior in a high-crime area."
                .to_string(),
            confidence: Confidence::Medium,
        });
    }

    // Miranda trigger: custody plus questioning in the same turn.
    if any_match(officer_actions, CUSTODY_ACTIONS)
        && any_match(officer_actions, QUESTIONING_ACTIONS)
    {
        considerations.push(PolicyConsideration {
            cite: "Miranda v. Arizona".to_string(),
            jurisdiction: Jurisdiction::Federal,
            rationale: "Miranda warnings are required prior to any questioning once a subject \
                        is in custody."
                .to_string(),
            confidence: Confidence::High,
        });
    }

    if considerations.is_empty() {
        considerations.push(PolicyConsideration {
            cite: "N/A".to_string(),
            jurisdiction: Jurisdiction::Florida,
            rationale: "No specific policy considerations triggered by this turn.".to_string(),
            confidence: Confidence::High,
        });
    }

    considerations
}
