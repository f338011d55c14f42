//! Turn exchange wire types.
//!
//! `TurnResponse` is what the completion service must return for every user
//! action. Field names are camelCase on the wire to match the JSON contract
//! the service is prompted to produce.

use serde::{Deserialize, Serialize};

/// Classification of a real-time feedback item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum FeedbackType {
    Positive,
    Informational,
    Context,
    Critique,
}

/// One real-time feedback point on the trainee's last action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback_id: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub message: String,
}

/// A key/value update for the trainee's heads-up display, e.g. a plate check
/// result coming back mid-scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudUpdate {
    pub key: String,
    pub value: String,
}

/// One evaluated exchange: scene description, in-character dialogue, feedback,
/// and whether the scenario continues. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Third-person description of the scene or the character's actions.
    pub narrator_text: String,
    /// The character's spoken response.
    pub ai_dialogue: String,
    /// Feedback points based on the user's last action.
    pub real_time_feedback: Vec<Feedback>,
    /// New information for the heads-up display, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hud_update: Option<HudUpdate>,
    /// False once the interaction has reached a natural conclusion.
    pub is_scenario_active: bool,
}
