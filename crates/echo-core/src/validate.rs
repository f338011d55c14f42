//! Wire-contract validation.
//!
//! Every function here is total: it returns either a typed value or a
//! structured `SchemaViolation`, never an unstructured panic. Validation is
//! pure; nothing is mutated and nothing invalid is passed downstream.

use serde_json::Value;

use crate::error::{EchoError, Result};
use crate::report::AfterActionReport;
use crate::scenario::ScenarioDefinition;
use crate::turn::TurnResponse;

const SCENARIO: &str = "scenarioDefinition";
const TURN: &str = "turnResponse";
const REPORT: &str = "afterActionReport";

fn require_non_empty(payload: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EchoError::schema_violation(
            payload,
            format!("'{field}' must be non-empty text"),
        ));
    }
    Ok(())
}

fn require_in_range(payload: &'static str, field: &str, value: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(EchoError::schema_violation(
            payload,
            format!("'{field}' must be within [0, 100], got {value}"),
        ));
    }
    Ok(())
}

/// Semantic checks shared by the JSON validator and the TOML catalog loader.
pub(crate) fn check_scenario_fields(scenario: &ScenarioDefinition) -> Result<()> {
    require_non_empty(SCENARIO, "scenarioId", &scenario.scenario_id)?;
    require_non_empty(SCENARIO, "difficulty", &scenario.difficulty)?;
    require_non_empty(SCENARIO, "dispatchInfo.callType", &scenario.dispatch_info.call_type)?;
    require_non_empty(SCENARIO, "dispatchInfo.location", &scenario.dispatch_info.location)?;
    require_non_empty(SCENARIO, "aiPersona.personaId", &scenario.ai_persona.persona_id)?;
    require_non_empty(SCENARIO, "aiPersona.type", &scenario.ai_persona.persona_type)?;
    Ok(())
}

/// Validates a raw scenario definition.
pub fn validate_scenario(raw: &Value) -> Result<ScenarioDefinition> {
    let scenario: ScenarioDefinition = serde_json::from_value(raw.clone())
        .map_err(|e| EchoError::schema_violation(SCENARIO, e.to_string()))?;
    check_scenario_fields(&scenario)?;
    Ok(scenario)
}

/// Validates a raw turn response.
///
/// Structural mismatches (missing fields, unrecognized feedback types) and
/// empty narrative fields both fail with `SchemaViolation`.
pub fn validate_turn_response(raw: &Value) -> Result<TurnResponse> {
    let response: TurnResponse = serde_json::from_value(raw.clone())
        .map_err(|e| EchoError::schema_violation(TURN, e.to_string()))?;
    require_non_empty(TURN, "narratorText", &response.narrator_text)?;
    require_non_empty(TURN, "aiDialogue", &response.ai_dialogue)?;
    Ok(response)
}

/// Validates a raw after-action report, including the [0, 100] bounds on the
/// overall score and all four key metrics.
pub fn validate_after_action_report(raw: &Value) -> Result<AfterActionReport> {
    let report: AfterActionReport = serde_json::from_value(raw.clone())
        .map_err(|e| EchoError::schema_violation(REPORT, e.to_string()))?;
    require_non_empty(REPORT, "finalOutcome", &report.final_outcome)?;
    require_non_empty(REPORT, "performanceGrade", &report.performance_grade)?;
    require_in_range(REPORT, "performanceScore", report.performance_score)?;
    for (name, value) in report.key_metrics.named() {
        require_in_range(REPORT, name, value)?;
    }
    Ok(report)
}

/// Parses completion-service text into JSON, tolerating a surrounding
/// markdown code fence (```json ... ```), which generative APIs commonly
/// wrap structured output in.
pub fn parse_completion_json(payload: &'static str, text: &str) -> Result<Value> {
    let trimmed = strip_code_fences(text);
    serde_json::from_str(trimmed)
        .map_err(|e| EchoError::schema_violation(payload, format!("not valid JSON: {e}")))
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_turn() -> Value {
        json!({
            "narratorText": "The driver fumbles with the glovebox.",
            "aiDialogue": "I wasn't drinking, officer.",
            "realTimeFeedback": [
                {"feedbackId": "RTF-1", "type": "Informational", "message": "Watch the hands."}
            ],
            "isScenarioActive": true
        })
    }

    #[test]
    fn valid_turn_response_passes() {
        let response = validate_turn_response(&valid_turn()).unwrap();
        assert_eq!(response.ai_dialogue, "I wasn't drinking, officer.");
        assert_eq!(response.real_time_feedback.len(), 1);
    }

    #[test]
    fn empty_dialogue_is_a_schema_violation() {
        let mut raw = valid_turn();
        raw["aiDialogue"] = json!("   ");
        let err = validate_turn_response(&raw).unwrap_err();
        assert!(err.is_schema_violation());
        assert!(err.to_string().contains("aiDialogue"));
    }

    #[test]
    fn unrecognized_feedback_type_is_a_schema_violation() {
        let mut raw = valid_turn();
        raw["realTimeFeedback"][0]["type"] = json!("Encouraging");
        assert!(validate_turn_response(&raw).unwrap_err().is_schema_violation());
    }

    #[test]
    fn missing_activity_flag_is_a_schema_violation() {
        let mut raw = valid_turn();
        raw.as_object_mut().unwrap().remove("isScenarioActive");
        assert!(validate_turn_response(&raw).unwrap_err().is_schema_violation());
    }

    fn valid_report() -> Value {
        json!({
            "scenarioId": "FP-TS-001",
            "finalOutcome": "Arrest made without incident.",
            "performanceScore": 82,
            "performanceGrade": "B",
            "keyMetrics": {
                "deEscalationScore": 80,
                "legalProcedureScore": 78,
                "officerSafetyScore": 90,
                "contextualAwareness": 81
            },
            "keyStrengths": [],
            "areasForImprovement": [],
            "criticalLearningPoints": []
        })
    }

    #[test]
    fn valid_report_passes() {
        let report = validate_after_action_report(&valid_report()).unwrap();
        assert_eq!(report.performance_grade, "B");
    }

    #[test]
    fn out_of_range_metric_is_rejected() {
        let mut raw = valid_report();
        raw["keyMetrics"]["officerSafetyScore"] = json!(104);
        let err = validate_after_action_report(&raw).unwrap_err();
        assert!(err.to_string().contains("officerSafetyScore"));
    }

    #[test]
    fn negative_overall_score_is_rejected() {
        let mut raw = valid_report();
        raw["performanceScore"] = json!(-1);
        assert!(validate_after_action_report(&raw).is_err());
    }

    #[test]
    fn missing_metric_is_rejected() {
        let mut raw = valid_report();
        raw["keyMetrics"].as_object_mut().unwrap().remove("contextualAwareness");
        assert!(validate_after_action_report(&raw).unwrap_err().is_schema_violation());
    }

    #[test]
    fn scenario_with_mistyped_difficulty_is_rejected() {
        let raw = json!({
            "scenarioId": "FP-T-1",
            "category": "Traffic Stop",
            "title": "t",
            "description": "d",
            "difficulty": 3,
            "dispatchInfo": {"callType": "Traffic Stop", "location": "US-1", "notes": ""},
            "aiPersona": {
                "personaId": "P-1", "type": "Calm", "description": "d",
                "initialState": "calm", "stressTriggers": [], "deescalationKeys": []
            }
        });
        assert!(validate_scenario(&raw).unwrap_err().is_schema_violation());
    }

    #[test]
    fn fenced_json_is_parsed() {
        let text = "```json\n{\"isScenarioActive\": true}\n```";
        let value = parse_completion_json(TURN, text).unwrap();
        assert_eq!(value["isScenarioActive"], true);
    }

    #[test]
    fn bare_json_is_parsed() {
        let value = parse_completion_json(TURN, "  {\"a\": 1} ").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn non_json_text_is_a_schema_violation() {
        let err = parse_completion_json(TURN, "I cannot answer that.").unwrap_err();
        assert!(err.is_schema_violation());
    }
}
