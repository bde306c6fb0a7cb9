//! Project input and user overrides

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::discipline::{Discipline, EngineeringOverrides, Role};
use super::fees::HoursModel;

/// Finish level of a building type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    Low,
    #[default]
    Mid,
    High,
}

impl Tier {
    /// Map a design level (1-3) to a tier; anything else lands on Mid
    pub fn from_design_level(level: u8) -> Self {
        match level {
            1 => Self::Low,
            3 => Self::High,
            _ => Self::Mid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
        }
    }

    /// Parse a tier label ("low", "Mid", "HIGH", "2")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "1" => Some(Self::Low),
            "mid" | "medium" | "2" => Some(Self::Mid),
            "high" | "3" => Some(Self::High),
            _ => None,
        }
    }
}

/// Scan-to-BIM services requested for the project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    /// Scan the existing building
    pub building: bool,
    /// Scan the site
    pub site: bool,
}

/// Everything a caller can force instead of the resolved defaults
///
/// All fractions are decimals in [0, 1]. Unset fields fall back to data,
/// then to configuration defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    pub shell_share: Option<f64>,
    pub interior_share: Option<f64>,
    pub landscape_share: Option<f64>,

    /// New construction target cost ($/ft²)
    pub new_cost_target: Option<f64>,
    /// Remodel target cost ($/ft²)
    pub remodel_cost_target: Option<f64>,

    pub engineering: EngineeringOverrides,
    pub architecture_floor: Option<f64>,

    /// Global fee adjustment multiplier
    pub fee_adjustment: Option<f64>,
    /// Per-discipline fee adjustment multipliers (win over the global one)
    pub discipline_fee_adjustments: BTreeMap<Discipline, f64>,
    pub coordination_fee_pct: Option<f64>,

    pub labor_rate: Option<f64>,
    pub overhead_rate: Option<f64>,
    pub markup_factor: Option<f64>,
    pub discount: Option<f64>,

    /// Hours per ft² for the non-linear hours model
    pub hours_factor: Option<f64>,

    /// Budget the scenarios are compared against (defaults to total budget)
    pub reference_project_budget: Option<f64>,

    pub internal_rates: BTreeMap<Role, f64>,
    pub market_rates: BTreeMap<Role, f64>,
}

/// Building parameters for one calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default)]
    pub building_use: String,
    pub building_type: String,
    /// Explicit tier (wins over `design_level`)
    #[serde(default)]
    pub building_tier: Option<Tier>,
    #[serde(default = "default_design_level")]
    pub design_level: u8,
    /// Complexity category 1-5
    #[serde(default = "default_category")]
    pub category: u8,

    #[serde(default)]
    pub new_area_ft2: f64,
    #[serde(default)]
    pub existing_area_ft2: f64,
    #[serde(default)]
    pub site_area_ft2: f64,

    /// 1.0 for regular buildings, 1.2 for historic
    #[serde(default = "default_historic_multiplier")]
    pub historic_multiplier: f64,
    /// Remodel cost as a fraction of new construction cost
    #[serde(default)]
    pub remodel_multiplier: Option<f64>,

    #[serde(default)]
    pub hours_model: HoursModel,
    /// Disciplines done in-house; `None` means design disciplines only
    #[serde(default)]
    pub in_house: Option<Vec<Discipline>>,
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub duration_months: Option<f64>,

    #[serde(default)]
    pub overrides: Overrides,
}

fn default_design_level() -> u8 {
    2
}

fn default_category() -> u8 {
    3
}

fn default_historic_multiplier() -> f64 {
    1.0
}

impl ProjectInput {
    /// Minimal input for a building type and new-construction area
    pub fn new(building_type: impl Into<String>, new_area_ft2: f64) -> Self {
        Self {
            building_use: String::new(),
            building_type: building_type.into(),
            building_tier: None,
            design_level: default_design_level(),
            category: default_category(),
            new_area_ft2,
            existing_area_ft2: 0.0,
            site_area_ft2: 0.0,
            historic_multiplier: default_historic_multiplier(),
            remodel_multiplier: None,
            hours_model: HoursModel::default(),
            in_house: None,
            scan: ScanOptions::default(),
            duration_months: None,
            overrides: Overrides::default(),
        }
    }

    pub fn tier(&self) -> Tier {
        self.building_tier
            .unwrap_or_else(|| Tier::from_design_level(self.design_level))
    }

    pub fn total_area_ft2(&self) -> f64 {
        self.new_area_ft2 + self.existing_area_ft2
    }

    pub fn is_in_house(&self, discipline: Discipline) -> bool {
        match &self.in_house {
            Some(list) => list.contains(&discipline),
            None => discipline.in_house_by_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_design_level() {
        assert_eq!(Tier::from_design_level(1), Tier::Low);
        assert_eq!(Tier::from_design_level(2), Tier::Mid);
        assert_eq!(Tier::from_design_level(3), Tier::High);
        assert_eq!(Tier::from_design_level(9), Tier::Mid);
    }

    #[test]
    fn test_explicit_tier_wins() {
        let mut input = ProjectInput::new("Custom Houses", 5000.0);
        input.design_level = 1;
        assert_eq!(input.tier(), Tier::Low);
        input.building_tier = Some(Tier::High);
        assert_eq!(input.tier(), Tier::High);
    }

    #[test]
    fn test_deserialize_minimal_input() {
        let json = r#"{"buildingType": "Custom Houses", "newAreaFt2": 5000}"#;
        let input: ProjectInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.category, 3);
        assert_eq!(input.historic_multiplier, 1.0);
        assert_eq!(input.tier(), Tier::Mid);
        assert!(input.overrides.shell_share.is_none());
        assert!(input.is_in_house(Discipline::Architecture));
        assert!(!input.is_in_house(Discipline::Structural));
    }

    #[test]
    fn test_in_house_list_replaces_defaults() {
        let mut input = ProjectInput::new("Office", 10_000.0);
        input.in_house = Some(vec![Discipline::Architecture, Discipline::Structural]);
        assert!(input.is_in_house(Discipline::Structural));
        assert!(!input.is_in_house(Discipline::Interior));
    }
}
