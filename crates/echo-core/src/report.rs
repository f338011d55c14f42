//! After-action report wire types.
//!
//! The terminal artifact for a session: produced exactly once, after the
//! scenario concludes, and never mutated.

use serde::{Deserialize, Serialize};

/// The four scored performance areas, each 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub de_escalation_score: f64,
    pub legal_procedure_score: f64,
    pub officer_safety_score: f64,
    pub contextual_awareness: f64,
}

impl KeyMetrics {
    /// Iterates the metrics with their wire names, for bounds checking and display.
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("deEscalationScore", self.de_escalation_score),
            ("legalProcedureScore", self.legal_procedure_score),
            ("officerSafetyScore", self.officer_safety_score),
            ("contextualAwareness", self.contextual_awareness),
        ]
    }
}

/// One identified item in a report list (strength, improvement, learning point).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    pub id: String,
    pub text: String,
}

/// The final performance evaluation for a concluded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterActionReport {
    pub scenario_id: String,
    /// Brief summary of how the interaction ended.
    pub final_outcome: String,
    /// Overall score, 0-100.
    pub performance_score: f64,
    /// Corresponding letter grade (A+, B-, ...).
    pub performance_grade: String,
    pub key_metrics: KeyMetrics,
    pub key_strengths: Vec<ReportItem>,
    pub areas_for_improvement: Vec<ReportItem>,
    pub critical_learning_points: Vec<ReportItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_camel_case() {
        let json = serde_json::json!({
            "scenarioId": "FP-TS-001",
            "finalOutcome": "Subject arrested for DUI without incident.",
            "performanceScore": 88,
            "performanceGrade": "B+",
            "keyMetrics": {
                "deEscalationScore": 90,
                "legalProcedureScore": 85,
                "officerSafetyScore": 92,
                "contextualAwareness": 84
            },
            "keyStrengths": [{"id": "KS-1", "text": "Explained each step clearly."}],
            "areasForImprovement": [{"id": "AI-1", "text": "Positioning during the exit."}],
            "criticalLearningPoints": [{"id": "CLP-1", "text": "Odor alone is not probable cause."}]
        });

        let report: AfterActionReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.performance_score, 88.0);
        assert_eq!(report.key_metrics.de_escalation_score, 90.0);

        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["scenarioId"], "FP-TS-001");
        assert_eq!(back["performanceGrade"], "B+");
        assert_eq!(back["keyMetrics"]["officerSafetyScore"], 92.0);
        assert_eq!(back["criticalLearningPoints"][0]["id"], "CLP-1");
    }
}
