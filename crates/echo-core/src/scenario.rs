//! Scenario definitions and the read-only scenario library.
//!
//! Scenarios are immutable once loaded. The library is an explicitly injected
//! collaborator rather than a module-level global so that hosts can supply
//! their own catalog and tests can supply doubles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EchoError, Result};

/// The dispatch information a trainee sees before the first turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchInfo {
    pub call_type: String,
    pub location: String,
    pub notes: String,
}

/// The simulated subject the trainee interacts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPersona {
    pub persona_id: String,
    /// Short persona classification, e.g. "Intoxicated Subject".
    #[serde(rename = "type")]
    pub persona_type: String,
    pub description: String,
    /// Emotional state the persona starts the scenario in.
    pub initial_state: String,
    /// Phrasings or actions that escalate the persona.
    pub stress_triggers: Vec<String>,
    /// Approaches that calm the persona down.
    pub deescalation_keys: Vec<String>,
}

/// One training scenario: identity, classification, narrative setup, and the
/// persona the completion service role-plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub scenario_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub dispatch_info: DispatchInfo,
    pub ai_persona: AiPersona,
}

/// Read-only lookup from scenario id to definition.
///
/// Shared reference data; implementations require no locking.
pub trait ScenarioLibrary: Send + Sync {
    /// Resolves a scenario id, or `None` if the library does not carry it.
    fn get(&self, scenario_id: &str) -> Option<ScenarioDefinition>;

    /// Returns every scenario the library carries, in load order.
    fn all(&self) -> Vec<ScenarioDefinition>;
}

/// TOML document shape for a scenario catalog.
#[derive(Debug, Deserialize)]
struct ScenarioCatalog {
    #[serde(rename = "scenario")]
    scenarios: Vec<ScenarioDefinition>,
}

/// An in-memory `ScenarioLibrary` loaded from static TOML configuration.
#[derive(Debug)]
pub struct StaticScenarioLibrary {
    by_id: HashMap<String, ScenarioDefinition>,
    order: Vec<String>,
}

const BUILTIN_SCENARIOS: &str = include_str!("../scenarios/builtin.toml");

impl StaticScenarioLibrary {
    /// Parses a scenario catalog from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` if the document does not parse or a scenario
    /// fails the structural checks (empty id, empty difficulty).
    pub fn from_toml_str(doc: &str) -> Result<Self> {
        let catalog: ScenarioCatalog = toml::from_str(doc)
            .map_err(|e| EchoError::schema_violation("scenarioLibrary", e.to_string()))?;

        let mut by_id = HashMap::new();
        let mut order = Vec::new();
        for scenario in catalog.scenarios {
            crate::validate::check_scenario_fields(&scenario)?;
            order.push(scenario.scenario_id.clone());
            by_id.insert(scenario.scenario_id.clone(), scenario);
        }

        Ok(Self { by_id, order })
    }

    /// Loads the scenario catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SCENARIOS)
    }
}

impl ScenarioLibrary for StaticScenarioLibrary {
    fn get(&self, scenario_id: &str) -> Option<ScenarioDefinition> {
        self.by_id.get(scenario_id).cloned()
    }

    fn all(&self) -> Vec<ScenarioDefinition> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }
}
