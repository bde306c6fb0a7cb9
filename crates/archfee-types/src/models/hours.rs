//! Hours distribution across phases and roles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::discipline::Role;

/// Fixed design phases, in delivery order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Discovery,
    CreativeConceptual,
    CreativeSchematic,
    CreativePreliminary,
    TechnicalSchematic,
    TechnicalPreliminary,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Discovery,
        Phase::CreativeConceptual,
        Phase::CreativeSchematic,
        Phase::CreativePreliminary,
        Phase::TechnicalSchematic,
        Phase::TechnicalPreliminary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::CreativeConceptual => "Creative - Conceptual",
            Self::CreativeSchematic => "Creative - Schematic",
            Self::CreativePreliminary => "Creative - Preliminary",
            Self::TechnicalSchematic => "Technical - Schematic",
            Self::TechnicalPreliminary => "Technical - Preliminary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursPhase {
    pub phase: Phase,
    pub months: Option<f64>,
    pub percent_of_total: f64,
    pub hours: f64,
}

/// Hours of every role within one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRoleHours {
    pub phase: Phase,
    pub hours: BTreeMap<Role, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTotal {
    pub role: Role,
    /// Exact sum across phases
    pub planned_hours: f64,
    /// After the role's rounding policy
    pub rounded_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleHours {
    pub by_phase: Vec<PhaseRoleHours>,
    pub totals: Vec<RoleTotal>,
    pub planned_total: f64,
    pub rounded_total: f64,
    /// rounded_total - planned_total
    pub difference: f64,
}

impl RoleHours {
    pub fn rounded(&self, role: Role) -> f64 {
        self.totals
            .iter()
            .find(|t| t.role == role)
            .map(|t| t.rounded_hours)
            .unwrap_or(0.0)
    }

    /// Rounded hours keyed by role
    pub fn rounded_by_role(&self) -> BTreeMap<Role, f64> {
        self.totals
            .iter()
            .map(|t| (t.role, t.rounded_hours))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursDistribution {
    pub total_hours_planned: f64,
    pub phases: Vec<HoursPhase>,
    pub roles: RoleHours,
}
