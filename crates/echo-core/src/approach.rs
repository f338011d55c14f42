//! Officer-approach analyzer.
//!
//! A keyword heuristic over the trainee's phrasing that classifies tone and
//! identifies communication techniques. The orchestrator turns the tone into
//! one locally-generated feedback item per turn, independent of whatever the
//! completion service returns.

use serde::{Deserialize, Serialize};

/// Perceived tone of the trainee's action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Professional,
    Aggressive,
    Empathetic,
    Rushed,
}

/// Communication technique detected in the trainee's phrasing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum Technique {
    #[strum(serialize = "empathy")]
    Empathy,
    #[strum(serialize = "open-ended questions")]
    OpenEndedQuestions,
    #[strum(serialize = "assistance")]
    Assistance,
    #[strum(serialize = "active listening")]
    ActiveListening,
    #[strum(serialize = "acknowledgment")]
    Acknowledgment,
    #[strum(serialize = "de-escalation")]
    Deescalation,
}

/// Result of analyzing one trainee action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachAnalysis {
    pub tone: Tone,
    pub techniques: Vec<Technique>,
}

/// Classifies the tone and techniques of a trainee's message.
///
/// Tone rules are checked in order (aggressive, empathetic, rushed) and fall
/// back to professional. Technique detection is independent of tone.
pub fn analyze_officer_approach(message: &str) -> ApproachAnalysis {
    let msg = message.to_lowercase();

    let tone = if msg.contains("need to")
        || msg.contains("need you to")
        || msg.contains("have to")
        || msg.contains('!')
    {
        Tone::Aggressive
    } else if msg.contains("understand") || msg.contains("sorry") || msg.contains("help") {
        Tone::Empathetic
    } else if msg.len() < 20 || msg.split_whitespace().count() < 4 {
        Tone::Rushed
    } else {
        Tone::Professional
    };

    let mut techniques = Vec::new();
    if msg.contains("understand") || msg.contains("feel") {
        techniques.push(Technique::Empathy);
    }
    if msg.contains("can you") || msg.contains("would you") {
        techniques.push(Technique::OpenEndedQuestions);
    }
    if msg.contains("let me") || msg.contains("help") {
        techniques.push(Technique::Assistance);
    }
    if msg.contains("what happened") || msg.contains("tell me") {
        techniques.push(Technique::ActiveListening);
    }
    if msg.contains("okay") || msg.contains("i see") {
        techniques.push(Technique::Acknowledgment);
    }
    if msg.contains("calm") || msg.contains("relax") {
        techniques.push(Technique::Deescalation);
    }

    ApproachAnalysis { tone, techniques }
}
