//! Full calculation result, diagnostics and advisory notes

use serde::{Deserialize, Serialize};

use super::budget::{BudgetBreakdown, DisciplineBudget};
use super::cost::CostDataOrigin;
use super::discipline::Discipline;
use super::fees::{BottomUpResult, TopDownFees};
use super::hours::HoursDistribution;
use super::scenario::ScenarioSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSeverity {
    Info,
    Warning,
}

/// Human-readable advisory produced during a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcNote {
    /// Pipeline stage that produced the note
    pub source: String,
    pub message: String,
    pub severity: NoteSeverity,
}

impl CalcNote {
    pub fn info(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: NoteSeverity::Info,
        }
    }

    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: NoteSeverity::Warning,
        }
    }
}

/// Top-down vs bottom-up fee variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceLevel {
    /// < 25%
    Normal,
    /// 25-50%
    Moderate,
    /// > 50%
    High,
}

/// Hours per ft² band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursDensity {
    UnusuallyLow,
    Low,
    Normal,
    High,
    UnusuallyHigh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceReport {
    /// Top-down fee of the in-house lines, the scope the planned hours cover
    pub in_house_top_down_fee: f64,
    /// Top-down market fee across every line, consultants included
    pub top_down_market_fee: f64,
    pub bottom_up_fee: f64,
    /// |bottom_up - in_house_top_down| / in_house_top_down
    pub variance: f64,
    /// |bottom_up - market| / market; 0 without a market fee
    pub market_variance: f64,
    pub level: VarianceLevel,
    pub hours_per_ft2: f64,
    pub hours_density: HoursDensity,
    pub missing_overrides: Vec<Discipline>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub cost_origin: CostDataOrigin,
    pub cost_label: String,
    pub category_multiplier: f64,
    pub budget: BudgetBreakdown,
    pub disciplines: DisciplineBudget,
    pub top_down: TopDownFees,
    pub bottom_up: BottomUpResult,
    pub hours: HoursDistribution,
    pub scenarios: ScenarioSet,
    pub variance: VarianceReport,
    pub notes: Vec<CalcNote>,
}
