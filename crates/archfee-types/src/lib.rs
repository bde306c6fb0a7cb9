//! archfee-types - Shared data types for archfee
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types.
//!
//! Used by:
//! - archfee-core (calculation pipeline)
//! - archfee (CLI)
//! - API layers that persist inputs and render results

pub mod models;

pub use models::{
    BottomUpResult, BudgetBreakdown, BudgetSplit, CalcNote, CalculationResult, CategoryShares,
    CostBand, CostDataOrigin, CostRange, Discipline, DisciplineAllocation, DisciplineBudget,
    EngineeringOverrides, EngineeringShares, FeeLine, FeeScope, FeeTotals, HoursDensity,
    HoursDistribution, HoursEstimate, HoursModel, HoursPhase, NoteSeverity, Overrides, Phase,
    PhaseRoleHours, ProjectInput, RateDefaults, RateInputs, RemodelBands, Role, RoleHours,
    RoleTotal, ScanOptions, Scenario, ScenarioKind, ScenarioSet, Tier, TopDownFees, UnitCost,
    VarianceLevel, VarianceReport,
};
