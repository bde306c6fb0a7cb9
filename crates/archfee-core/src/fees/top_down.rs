//! Top-down (market curve) fees
//!
//! Fee percentage curve, budget in millions:
//!
//! ```text
//! pct = A + B × budget_millions ^ C      (A = 0.07498, B = 0.007824, C = -0.7495)
//! ```
//!
//! Smaller budgets get a higher percentage. Per discipline the curve is
//! weighted by the new (×0.95) and remodel (×1.05) components and the
//! category multiplier. Design disciplines (architecture, interior,
//! landscape) always get an extra `1 + (1 - remodel_multiplier)` boost.

use crate::config::TopDownConfig;
use crate::error::CalcNotes;
use crate::resolve::{resolve_layered, safe_div};
use archfee_types::{
    BudgetBreakdown, BudgetSplit, Discipline, DisciplineBudget, FeeLine, FeeScope, FeeTotals,
    ProjectInput, TopDownFees,
};

const SOURCE: &str = "top_down";

/// Fee percentage from the market curve; 0 for empty budgets
pub fn fee_curve_pct(config: &TopDownConfig, budget: f64) -> f64 {
    if budget <= 0.0 || !budget.is_finite() {
        return 0.0;
    }
    let millions = budget / 1_000_000.0;
    config.curve_a + config.curve_b * millions.powf(config.curve_c)
}

pub struct TopDownFeeEngine<'a> {
    config: &'a TopDownConfig,
}

impl<'a> TopDownFeeEngine<'a> {
    pub fn new(config: &'a TopDownConfig) -> Self {
        Self { config }
    }

    /// Weighted fee percentage for one discipline budget
    ///
    /// `remodel_boost` is the effective remodel multiplier for design
    /// disciplines, `None` for engineering.
    pub fn fee_percentage(
        &self,
        split: &BudgetSplit,
        category_multiplier: f64,
        remodel_boost: Option<f64>,
    ) -> f64 {
        if split.total <= 0.0 {
            return 0.0;
        }

        let pct = fee_curve_pct(self.config, split.total);
        let new_weighted = pct * category_multiplier * split.new * self.config.new_weight;
        let remodel_weighted =
            pct * category_multiplier * split.remodel * self.config.remodel_weight;
        let mut fee_pct = safe_div(new_weighted + remodel_weighted, split.total);

        if let Some(remodel_multiplier) = remodel_boost {
            fee_pct *= 1.0 + (1.0 - remodel_multiplier);
        }

        fee_pct
    }

    /// Fee lines for scans and every discipline, plus totals
    ///
    /// `average_pricing_per_hour` converts in-house fees into hours.
    #[allow(clippy::too_many_arguments)]
    pub fn compute(
        &self,
        input: &ProjectInput,
        budget: &BudgetBreakdown,
        disciplines: &DisciplineBudget,
        category_multiplier: f64,
        remodel_multiplier: f64,
        average_pricing_per_hour: f64,
        notes: &mut CalcNotes,
    ) -> TopDownFees {
        let total_area = input.total_area_ft2();
        let coordination_pct = resolve_layered(
            input.overrides.coordination_fee_pct,
            None,
            self.config.coordination_fee_pct,
        )
        .value;

        if average_pricing_per_hour <= 0.0 {
            notes.warn(SOURCE, "Average pricing per hour is zero; in-house hours set to 0");
        }

        let mut lines = self.scan_lines(input, budget, average_pricing_per_hour, notes);

        for discipline in Discipline::ALL {
            let split = match discipline {
                Discipline::Interior => budget.interior,
                Discipline::Landscape => budget.landscape,
                d => disciplines
                    .get(d)
                    .map(|a| a.budget)
                    .unwrap_or_default(),
            };

            let boost = discipline
                .receives_complexity_boost()
                .then_some(remodel_multiplier);
            let fee_pct = self.fee_percentage(&split, category_multiplier, boost);

            let adjustment = input
                .overrides
                .discipline_fee_adjustments
                .get(&discipline)
                .copied()
                .or(input.overrides.fee_adjustment)
                .unwrap_or(1.0);

            let market_fee = if split.total > 0.0 {
                fee_pct * split.total * adjustment
            } else {
                0.0
            };

            lines.push(self.route(
                FeeScope::Discipline(discipline),
                input.is_in_house(discipline),
                fee_pct,
                market_fee,
                total_area,
                coordination_pct,
                average_pricing_per_hour,
            ));
        }

        let totals = FeeTotals::from_lines(&lines);
        tracing::debug!(
            market_fee = totals.market_fee,
            in_house_fee = totals.in_house_fee,
            consultant_fee = totals.consultant_fee,
            "Computed top-down fees"
        );

        TopDownFees { lines, totals }
    }

    /// Building and site scan-to-BIM lines, always in-house
    fn scan_lines(
        &self,
        input: &ProjectInput,
        budget: &BudgetBreakdown,
        average_pricing_per_hour: f64,
        notes: &mut CalcNotes,
    ) -> Vec<FeeLine> {
        let mut lines = Vec::new();
        let requested = [
            (
                input.scan.building,
                FeeScope::BuildingScan,
                input.existing_area_ft2,
                &self.config.building_scan,
            ),
            (
                input.scan.site,
                FeeScope::SiteScan,
                input.site_area_ft2,
                &self.config.site_scan,
            ),
        ];

        for (enabled, scope, area, curve) in requested {
            if !enabled {
                continue;
            }
            if area <= 0.0 {
                notes.warn(
                    SOURCE,
                    format!("{} requested without a scannable area", scope.label()),
                );
            }

            let rate = curve.rate(area);
            let fee = rate * area.max(0.0);
            let pct = safe_div(fee, budget.total_budget);

            lines.push(FeeLine {
                scope,
                percent_of_cost: self.clamp_percent(pct),
                rate_per_sq_ft: rate,
                market_fee: fee,
                in_house_fee: fee,
                consultant_fee: 0.0,
                coordination_fee: 0.0,
                hours: safe_div(fee, average_pricing_per_hour),
                is_in_house: true,
            });
        }

        lines
    }

    #[allow(clippy::too_many_arguments)]
    fn route(
        &self,
        scope: FeeScope,
        in_house: bool,
        fee_pct: f64,
        market_fee: f64,
        total_area: f64,
        coordination_pct: f64,
        average_pricing_per_hour: f64,
    ) -> FeeLine {
        let (in_house_fee, consultant_fee, coordination_fee, hours) = if in_house {
            (
                market_fee,
                0.0,
                0.0,
                safe_div(market_fee, average_pricing_per_hour),
            )
        } else {
            (0.0, market_fee, market_fee * coordination_pct, 0.0)
        };

        FeeLine {
            scope,
            percent_of_cost: self.clamp_percent(fee_pct),
            rate_per_sq_ft: safe_div(market_fee, total_area),
            market_fee,
            in_house_fee,
            consultant_fee,
            coordination_fee,
            hours,
            is_in_house: in_house,
        }
    }

    fn clamp_percent(&self, pct: f64) -> f64 {
        let limit = self.config.percent_of_cost_limit;
        if pct.is_nan() {
            0.0
        } else {
            pct.clamp(-limit, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AllocationConfig, TopDownConfig};
    use crate::{budget::BudgetAllocator, disciplines::allocate_disciplines};
    use archfee_types::{CategoryShares, CostBand, CostRange, EngineeringShares, Tier};

    fn range() -> CostRange {
        CostRange {
            label: "test".to_string(),
            tier: Tier::Mid,
            shell: CostBand::new(250.0, 300.0, 350.0),
            interior: CostBand::new(90.0, 115.0, 140.0),
            landscape: CostBand::new(25.0, 32.0, 40.0),
            remodel: None,
            shares: Some(CategoryShares {
                shell: 0.7,
                interior: 0.2,
                landscape: 0.1,
            }),
        }
    }

    fn run(input: &ProjectInput) -> (TopDownFees, CalcNotes) {
        let alloc = AllocationConfig::default();
        let config = TopDownConfig::default();
        let mut notes = CalcNotes::new();
        let budget = BudgetAllocator::new(&alloc).allocate(input, &range(), &mut notes);
        let eng = EngineeringShares {
            structural: 0.12,
            civil: 0.05,
            mechanical: 0.09,
            electrical: 0.07,
            plumbing: 0.05,
            telecom: 0.02,
        };
        let disciplines =
            allocate_disciplines(budget.shell.new, budget.shell.remodel, eng, 0.1, &mut notes);
        let fees = TopDownFeeEngine::new(&config).compute(
            input,
            &budget,
            &disciplines,
            1.1,
            0.6,
            168.0,
            &mut notes,
        );
        (fees, notes)
    }

    #[test]
    fn test_curve_diminishes_with_budget() {
        let config = TopDownConfig::default();
        let small = fee_curve_pct(&config, 100_000.0);
        let large = fee_curve_pct(&config, 10_000_000.0);
        assert!(small > large);
        // At $1M the curve is A + B
        assert!((fee_curve_pct(&config, 1_000_000.0) - (0.07498 + 0.007824)).abs() < 1e-12);
    }

    #[test]
    fn test_curve_zero_budget() {
        let config = TopDownConfig::default();
        assert_eq!(fee_curve_pct(&config, 0.0), 0.0);
        assert_eq!(fee_curve_pct(&config, -5.0), 0.0);
    }

    #[test]
    fn test_new_only_fee_percentage() {
        let config = TopDownConfig::default();
        let engine = TopDownFeeEngine::new(&config);
        let split = BudgetSplit::new(1_000_000.0, 0.0);
        let base = (0.07498 + 0.007824) * 1.1 * 0.95;

        // Design disciplines are boosted even without remodel work
        let design = engine.fee_percentage(&split, 1.1, Some(0.6));
        assert!((design - base * 1.4).abs() < 1e-12);

        let engineering = engine.fee_percentage(&split, 1.1, None);
        assert!((engineering - base).abs() < 1e-12);
    }

    #[test]
    fn test_remodel_boost_only_for_design_disciplines() {
        let config = TopDownConfig::default();
        let engine = TopDownFeeEngine::new(&config);
        let split = BudgetSplit::new(0.0, 1_000_000.0);
        let base = (0.07498 + 0.007824) * 1.0 * 1.05;

        let engineering = engine.fee_percentage(&split, 1.0, None);
        assert!((engineering - base).abs() < 1e-12);

        let design = engine.fee_percentage(&split, 1.0, Some(0.6));
        assert!((design - base * 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_routing_invariants() {
        let input = ProjectInput::new("Custom Houses", 5000.0);
        let (fees, _) = run(&input);

        assert_eq!(fees.lines.len(), Discipline::ALL.len());
        for line in &fees.lines {
            if line.is_in_house {
                assert_eq!(line.in_house_fee, line.market_fee);
                assert_eq!(line.consultant_fee, 0.0);
                assert_eq!(line.coordination_fee, 0.0);
                assert!(line.hours > 0.0);
            } else {
                assert_eq!(line.in_house_fee, 0.0);
                assert_eq!(line.consultant_fee, line.market_fee);
                assert!((line.coordination_fee - line.market_fee * 0.15).abs() < 1e-9);
                assert_eq!(line.hours, 0.0);
            }
        }
    }

    #[test]
    fn test_coordination_override() {
        let mut input = ProjectInput::new("Custom Houses", 5000.0);
        input.overrides.coordination_fee_pct = Some(0.10);
        let (fees, _) = run(&input);
        let structural = fees
            .lines
            .iter()
            .find(|l| l.scope == FeeScope::Discipline(Discipline::Structural))
            .unwrap();
        assert!((structural.coordination_fee - structural.market_fee * 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_fee_adjustment_precedence() {
        let base_input = ProjectInput::new("Custom Houses", 5000.0);
        let (base, _) = run(&base_input);

        let mut input = base_input.clone();
        input.overrides.fee_adjustment = Some(2.0);
        input
            .overrides
            .discipline_fee_adjustments
            .insert(Discipline::Architecture, 0.5);
        let (adjusted, _) = run(&input);

        let fee = |fees: &TopDownFees, d: Discipline| {
            fees.lines
                .iter()
                .find(|l| l.scope == FeeScope::Discipline(d))
                .unwrap()
                .market_fee
        };
        let arch_ratio = fee(&adjusted, Discipline::Architecture) / fee(&base, Discipline::Architecture);
        let civil_ratio = fee(&adjusted, Discipline::Civil) / fee(&base, Discipline::Civil);
        assert!((arch_ratio - 0.5).abs() < 1e-9);
        assert!((civil_ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_budget_produces_zero_fees() {
        let input = ProjectInput::new("Custom Houses", 0.0);
        let (fees, _) = run(&input);
        for line in &fees.lines {
            assert_eq!(line.market_fee, 0.0);
            assert_eq!(line.percent_of_cost, 0.0);
            assert!(!line.market_fee.is_nan());
        }
    }

    #[test]
    fn test_scan_lines_come_first_and_are_in_house() {
        let mut input = ProjectInput::new("Custom Houses", 0.0);
        input.existing_area_ft2 = 4000.0;
        input.site_area_ft2 = 20_000.0;
        input.scan.building = true;
        input.scan.site = true;
        let (fees, _) = run(&input);

        assert_eq!(fees.lines[0].scope, FeeScope::BuildingScan);
        assert_eq!(fees.lines[1].scope, FeeScope::SiteScan);
        assert!(fees.lines[..2].iter().all(|l| l.is_in_house && l.market_fee > 0.0));
    }

    #[test]
    fn test_scan_without_area_warns() {
        let mut input = ProjectInput::new("Custom Houses", 1000.0);
        input.scan.site = true;
        let (fees, notes) = run(&input);
        assert_eq!(fees.lines[0].market_fee, 0.0);
        assert!(notes.has_warnings());
    }

    #[test]
    fn test_percent_of_cost_clamped() {
        let config = TopDownConfig::default();
        let engine = TopDownFeeEngine::new(&config);
        assert_eq!(engine.clamp_percent(25.0), 9.9999);
        assert_eq!(engine.clamp_percent(-25.0), -9.9999);
        assert_eq!(engine.clamp_percent(f64::NAN), 0.0);
    }
}
