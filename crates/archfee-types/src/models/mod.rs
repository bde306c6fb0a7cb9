//! Data models for archfee

pub mod budget;
pub mod cost;
pub mod discipline;
pub mod fees;
pub mod hours;
pub mod input;
pub mod result;
pub mod scenario;

pub use budget::{BudgetBreakdown, BudgetSplit, DisciplineAllocation, DisciplineBudget, UnitCost};
pub use cost::{CategoryShares, CostBand, CostDataOrigin, CostRange, RateDefaults, RemodelBands};
pub use discipline::{Discipline, EngineeringOverrides, EngineeringShares, FeeScope, Role};
pub use fees::{BottomUpResult, FeeLine, FeeTotals, HoursEstimate, HoursModel, RateInputs, TopDownFees};
pub use hours::{HoursDistribution, HoursPhase, Phase, PhaseRoleHours, RoleHours, RoleTotal};
pub use input::{Overrides, ProjectInput, ScanOptions, Tier};
pub use result::{
    CalcNote, CalculationResult, HoursDensity, NoteSeverity, VarianceLevel, VarianceReport,
};
pub use scenario::{Scenario, ScenarioKind, ScenarioSet};
