//! Calculation pipeline
//!
//! `budget -> disciplines -> top-down -> bottom-up -> hours -> scenarios -> variance`
//!
//! Everything after [`resolve_data`] is synchronous and pure: the same
//! input and resolved data always give the same result.

use crate::budget::BudgetAllocator;
use crate::config::FeeConfig;
use crate::cost_data::{CostDataResolver, ResolvedData};
use crate::disciplines::{allocate_disciplines, resolve_engineering_shares};
use crate::error::CalcNotes;
use crate::fees::{resolve_rates, BottomUpFeeEngine, TopDownFeeEngine};
use crate::hours::compute_hours_distribution;
use crate::resolve::resolve_layered;
use crate::scenarios::{RateTables, ScenarioEngine};
use crate::source::CostDataSource;
use crate::variance::VarianceChecker;
use archfee_types::{
    BottomUpResult, BudgetBreakdown, CalculationResult, DisciplineBudget, HoursDistribution,
    HoursModel, ProjectInput, RateInputs, Role, ScenarioSet, TopDownFees,
};
use std::collections::BTreeMap;

/// Resolve cost data for an input through a data source
///
/// The only await point of a calculation.
pub async fn resolve_data(source: &dyn CostDataSource, input: &ProjectInput) -> ResolvedData {
    CostDataResolver::new(source).resolve(input).await
}

/// Budget plus its discipline split
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStage {
    pub budget: BudgetBreakdown,
    pub disciplines: DisciplineBudget,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: FeeConfig,
}

impl Calculator {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    /// Rates after input overrides and data defaults
    pub fn rates(&self, input: &ProjectInput, data: &ResolvedData) -> RateInputs {
        resolve_rates(&input.overrides, &data.rate_defaults, &self.config.rates)
    }

    /// Remodel multiplier used for the design-discipline fee boost
    fn remodel_multiplier(&self, input: &ProjectInput) -> f64 {
        match input.remodel_multiplier {
            Some(m) if m > 0.0 && m <= 1.0 => m,
            _ => self.config.allocation.default_remodel_multiplier,
        }
    }

    pub fn compute_budget(
        &self,
        input: &ProjectInput,
        data: &ResolvedData,
        notes: &mut CalcNotes,
    ) -> BudgetStage {
        let budget = BudgetAllocator::new(&self.config.allocation).allocate(input, &data.range, notes);

        let engineering = resolve_engineering_shares(
            &input.overrides.engineering,
            data.engineering.as_ref(),
            data.tier,
        );
        let floor = resolve_layered(
            input.overrides.architecture_floor,
            None,
            self.config.allocation.architecture_floor,
        )
        .value;
        let disciplines =
            allocate_disciplines(budget.shell.new, budget.shell.remodel, engineering, floor, notes);

        BudgetStage {
            budget,
            disciplines,
        }
    }

    pub fn compute_top_down_fees(
        &self,
        input: &ProjectInput,
        data: &ResolvedData,
        stage: &BudgetStage,
        notes: &mut CalcNotes,
    ) -> TopDownFees {
        let rates = self.rates(input, data);
        TopDownFeeEngine::new(&self.config.top_down).compute(
            input,
            &stage.budget,
            &stage.disciplines,
            data.category_multiplier,
            self.remodel_multiplier(input),
            rates.average_pricing_per_hour(),
            notes,
        )
    }

    pub fn compute_bottom_up_fees(
        &self,
        input: &ProjectInput,
        data: &ResolvedData,
        stage: &BudgetStage,
        top_down: &TopDownFees,
        notes: &mut CalcNotes,
    ) -> BottomUpResult {
        let engine = BottomUpFeeEngine::new();
        let hours = match input.hours_model {
            HoursModel::Linear => engine.linear_hours(top_down, stage.budget.new_fraction()),
            HoursModel::NonLinear => engine.non_linear_hours(input, data.category_multiplier, notes),
        };
        engine.compute(self.rates(input, data), hours)
    }

    pub fn compute_hours_distribution(
        &self,
        total_hours_planned: f64,
        duration_months: Option<f64>,
    ) -> HoursDistribution {
        compute_hours_distribution(total_hours_planned, duration_months)
    }

    /// Scenarios over role hours; the reference budget defaults to `total_budget`
    pub fn compute_scenarios(
        &self,
        input: &ProjectInput,
        data: &ResolvedData,
        role_hours: &BTreeMap<Role, f64>,
        total_budget: f64,
    ) -> ScenarioSet {
        let rates = self.rates(input, data);
        let tables = RateTables::resolve(
            &rates,
            &data.rate_defaults,
            &input.overrides.internal_rates,
            &input.overrides.market_rates,
        );
        let reference = input
            .overrides
            .reference_project_budget
            .unwrap_or(total_budget);

        ScenarioEngine::new(&self.config.scenarios).compute(role_hours, &tables, reference)
    }

    /// Run the full chain on resolved data
    pub fn calculate(&self, input: &ProjectInput, data: &ResolvedData) -> CalculationResult {
        let mut notes = CalcNotes {
            notes: data.notes.clone(),
        };

        let stage = self.compute_budget(input, data, &mut notes);
        let top_down = self.compute_top_down_fees(input, data, &stage, &mut notes);
        let bottom_up = self.compute_bottom_up_fees(input, data, &stage, &top_down, &mut notes);
        let hours =
            self.compute_hours_distribution(bottom_up.hours.total_hours_planned, input.duration_months);
        let scenarios = self.compute_scenarios(
            input,
            data,
            &hours.roles.rounded_by_role(),
            stage.budget.total_budget,
        );

        let variance = VarianceChecker::new(&self.config.variance).check(
            top_down.totals.in_house_fee,
            top_down.totals.market_fee,
            bottom_up.bottom_up_fee,
            bottom_up.hours.total_hours_planned,
            input.total_area_ft2(),
            &input.overrides.engineering,
        );
        for message in &variance.messages {
            notes.info("variance", message.clone());
        }

        tracing::info!(
            building_type = %data.building_type,
            total_budget = stage.budget.total_budget,
            market_fee = top_down.totals.market_fee,
            bottom_up_fee = bottom_up.bottom_up_fee,
            warnings = notes.warnings().count(),
            "Calculation complete"
        );

        CalculationResult {
            cost_origin: data.origin,
            cost_label: data.range.label.clone(),
            category_multiplier: data.category_multiplier,
            budget: stage.budget,
            disciplines: stage.disciplines,
            top_down,
            bottom_up,
            hours,
            scenarios,
            variance,
            notes: notes.into_vec(),
        }
    }

    /// Resolve through a source, then calculate
    pub async fn calculate_with_source(
        &self,
        source: &dyn CostDataSource,
        input: &ProjectInput,
    ) -> CalculationResult {
        let data = resolve_data(source, input).await;
        self.calculate(input, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EmbeddedSource;
    use archfee_types::{Discipline, FeeScope};

    fn input() -> ProjectInput {
        let mut input = ProjectInput::new("Custom Houses", 5000.0);
        input.existing_area_ft2 = 1000.0;
        input
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let calculator = Calculator::default();
        let input = input();
        let data = ResolvedData::embedded(&input);

        let a = serde_json::to_string(&calculator.calculate(&input, &data)).unwrap();
        let b = serde_json::to_string(&calculator.calculate(&input, &data)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_linear_hours_match_in_house_lines() {
        let calculator = Calculator::default();
        let mut input = input();
        input.hours_model = HoursModel::Linear;
        let data = ResolvedData::embedded(&input);

        let result = calculator.calculate(&input, &data);
        let line_hours: f64 = result.top_down.lines.iter().map(|l| l.hours).sum();
        assert!((result.bottom_up.hours.total_hours - line_hours).abs() < 1e-9);
    }

    #[test]
    fn test_architecture_floor_override() {
        let calculator = Calculator::default();
        let mut input = input();
        input.overrides.architecture_floor = Some(0.5);
        input.overrides.engineering.structural = Some(0.6);
        let data = ResolvedData::embedded(&input);

        let result = calculator.calculate(&input, &data);
        assert!(result.disciplines.architecture_percentage >= 0.5 - 1e-12);
        assert!(result.disciplines.scale_factor < 1.0);
    }

    #[test]
    fn test_scenarios_use_reference_override() {
        let calculator = Calculator::default();
        let mut input = input();
        input.overrides.reference_project_budget = Some(1_000_000.0);
        let data = ResolvedData::embedded(&input);

        let result = calculator.calculate(&input, &data);
        assert_eq!(result.scenarios.reference_project_budget, 1_000_000.0);
    }

    #[test]
    fn test_engineering_lines_outsourced_by_default() {
        let calculator = Calculator::default();
        let input = input();
        let data = ResolvedData::embedded(&input);

        let result = calculator.calculate(&input, &data);
        let civil = result
            .top_down
            .lines
            .iter()
            .find(|l| l.scope == FeeScope::Discipline(Discipline::Civil))
            .unwrap();
        assert!(!civil.is_in_house);
        assert!(civil.consultant_fee > 0.0);
    }

    #[test]
    fn test_variance_reports_both_top_down_scopes() {
        let calculator = Calculator::default();
        let input = input();
        let data = ResolvedData::embedded(&input);

        let result = calculator.calculate(&input, &data);
        let v = &result.variance;
        assert_eq!(v.in_house_top_down_fee, result.top_down.totals.in_house_fee);
        assert_eq!(v.top_down_market_fee, result.top_down.totals.market_fee);
        assert!(v.top_down_market_fee > v.in_house_top_down_fee);

        let expected = (v.bottom_up_fee - v.top_down_market_fee).abs() / v.top_down_market_fee;
        assert!((v.market_variance - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_calculate_with_source() {
        let calculator = Calculator::default();
        let input = input();
        let from_source = calculator.calculate_with_source(&EmbeddedSource, &input).await;
        let direct = calculator.calculate(&input, &ResolvedData::embedded(&input));
        assert_eq!(from_source, direct);
    }
}
