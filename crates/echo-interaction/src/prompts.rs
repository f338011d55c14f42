//! Prompt rendering for the simulator's two completion flows.
//!
//! Prompts follow the "Echo" trainer voice: a persona block as the standing
//! system instruction, the transcript as conversation history, and per-call
//! task text that spells out the exact JSON contract the validators enforce.

use chrono::Utc;

use echo_core::scenario::ScenarioDefinition;
use echo_core::session::TranscriptEntry;

use crate::agent::{CompletionRequest, HistoryEntry};

const TURN_OUTPUT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{
  "narratorText": string,        // third-person description of the scene or your character's actions
  "aiDialogue": string,          // your direct, in-character spoken response
  "realTimeFeedback": [          // 1-2 feedback points on the officer's last action
    { "feedbackId": string, "type": "Positive" | "Informational" | "Context" | "Critique", "message": string }
  ],
  "hudUpdate": { "key": string, "value": string },  // optional; omit when there is nothing new
  "isScenarioActive": boolean    // false only once the interaction reaches a natural conclusion
}"#;

const REPORT_OUTPUT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{
  "scenarioId": string,
  "finalOutcome": string,        // brief summary of how the interaction ended
  "performanceScore": number,    // overall 0-100
  "performanceGrade": string,    // corresponding letter grade (A+, B-, ...)
  "keyMetrics": {
    "deEscalationScore": number,      // 0-100
    "legalProcedureScore": number,    // 0-100
    "officerSafetyScore": number,     // 0-100
    "contextualAwareness": number     // 0-100
  },
  "keyStrengths": [ { "id": string, "text": string } ],           // 1-2 items
  "areasForImprovement": [ { "id": string, "text": string } ],    // 1-2 items
  "criticalLearningPoints": [ { "id": string, "text": string } ]  // 1-2 items
}"#;

fn persona_instruction(scenario: &ScenarioDefinition) -> String {
    let persona = &scenario.ai_persona;
    format!(
        "You are \"Echo\", an advanced AI training simulator for Florida Law Enforcement Officers.\n\
         Current time (UTC): {now}.\n\
         You are role-playing a character in a simulation.\n\n\
         SCENARIO: {title} ({description})\n\
         DISPATCH: {call_type} at {location}. {notes}\n\
         YOUR PERSONA: {persona_type}. {persona_description}\n\
         YOUR CURRENT STATE: {initial_state}\n\
         YOUR STRESS TRIGGERS: {triggers}\n\
         YOUR DE-ESCALATION KEYS: {keys}",
        now = Utc::now().to_rfc3339(),
        title = scenario.title,
        description = scenario.description,
        call_type = scenario.dispatch_info.call_type,
        location = scenario.dispatch_info.location,
        notes = scenario.dispatch_info.notes,
        persona_type = persona.persona_type,
        persona_description = persona.description,
        initial_state = persona.initial_state,
        triggers = persona.stress_triggers.join(", "),
        keys = persona.deescalation_keys.join(", "),
    )
}

fn to_history(transcript: &[TranscriptEntry]) -> Vec<HistoryEntry> {
    transcript
        .iter()
        .map(|entry| HistoryEntry {
            role: entry.role,
            content: entry.content.clone(),
        })
        .collect()
}

/// Renders one turn of the role-play: persona as system instruction, the full
/// prior transcript as history, and the officer's new action as the prompt.
pub fn turn_request(
    scenario: &ScenarioDefinition,
    transcript: &[TranscriptEntry],
    user_action: &str,
) -> CompletionRequest {
    let prompt = format!(
        "OFFICER'S LATEST ACTION:\n{user_action}\n\n\
         Stay in persona and react to the officer's action.\n{TURN_OUTPUT_CONTRACT}"
    );

    CompletionRequest::new(prompt)
        .with_system_instruction(persona_instruction(scenario))
        .with_history(to_history(transcript))
}

/// Renders the after-action evaluation request over a concluded transcript.
pub fn report_request(
    scenario: &ScenarioDefinition,
    transcript: &[TranscriptEntry],
) -> CompletionRequest {
    let rendered_transcript = transcript
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "You are \"Echo\", an AI Training Analyst. The following simulation has concluded.\n\n\
         SCENARIO: {title} (id: {scenario_id})\n\n\
         FULL CONVERSATION TRANSCRIPT:\n{rendered_transcript}\n\n\
         Analyze the officer's performance throughout the entire transcript and generate \
         the final After-Action Report.\n{REPORT_OUTPUT_CONTRACT}",
        title = scenario.title,
        scenario_id = scenario.scenario_id,
    );

    CompletionRequest::new(prompt)
}
