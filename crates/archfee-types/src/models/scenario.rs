//! Rate-comparison scenarios

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::discipline::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    InternalDiscounted,
    InternalFull,
    MarketFull,
    MarketDiscounted,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::InternalDiscounted,
        ScenarioKind::InternalFull,
        ScenarioKind::MarketFull,
        ScenarioKind::MarketDiscounted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::InternalDiscounted => "Internal (discounted)",
            Self::InternalFull => "Internal (full)",
            Self::MarketFull => "Market (full)",
            Self::MarketDiscounted => "Market (discounted)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub name: String,
    /// Hourly rate applied to each role
    pub by_role: BTreeMap<Role, f64>,
    pub total: f64,
    pub pct_of_project_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub reference_project_budget: f64,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn get(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }
}
