//! Budget allocation
//!
//! Converts areas and per-ft² costs into new / remodel / total budgets, then
//! splits them into shell, interior and landscape.
//!
//! Shares resolve as override, then cost-data default, each clamped to [0, 1].
//! The applied triple always sums to 1.0: drift beyond the tolerance is
//! normalized with a warning, smaller drift is normalized silently.

use crate::config::AllocationConfig;
use crate::error::CalcNotes;
use crate::resolve::{clamp_fraction, resolve_layered};
use archfee_types::{
    BudgetBreakdown, BudgetSplit, CategoryShares, CostBand, CostRange, ProjectInput, UnitCost,
};

const SOURCE: &str = "budget";

pub struct BudgetAllocator<'a> {
    config: &'a AllocationConfig,
}

impl<'a> BudgetAllocator<'a> {
    pub fn new(config: &'a AllocationConfig) -> Self {
        Self { config }
    }

    pub fn allocate(
        &self,
        input: &ProjectInput,
        range: &CostRange,
        notes: &mut CalcNotes,
    ) -> BudgetBreakdown {
        let historic = if input.historic_multiplier.is_finite() && input.historic_multiplier > 0.0 {
            input.historic_multiplier
        } else {
            notes.warn(
                SOURCE,
                format!(
                    "Invalid historic multiplier {}; using 1.0",
                    input.historic_multiplier
                ),
            );
            1.0
        };

        let new_cost = unit_cost(
            [range.shell, range.interior, range.landscape],
            historic,
            input.overrides.new_cost_target,
        );
        let remodel_cost = self.remodel_cost(input, range, historic, &new_cost, notes);

        let new_area = non_negative(input.new_area_ft2, "new area", notes);
        let existing_area = non_negative(input.existing_area_ft2, "existing area", notes);

        let new_budget = new_area * new_cost.target;
        let remodel_budget = existing_area * remodel_cost.target;
        let total_budget = new_budget + remodel_budget;

        let shares = self.resolve_shares(input, range, notes);

        tracing::debug!(
            new_budget,
            remodel_budget,
            total_budget,
            shell = shares.shell,
            interior = shares.interior,
            landscape = shares.landscape,
            "Allocated budget"
        );

        BudgetBreakdown {
            new_cost,
            remodel_cost,
            new_budget,
            remodel_budget,
            total_budget,
            shares,
            shell: BudgetSplit::share_of(new_budget, remodel_budget, shares.shell),
            interior: BudgetSplit::share_of(new_budget, remodel_budget, shares.interior),
            landscape: BudgetSplit::share_of(new_budget, remodel_budget, shares.landscape),
        }
    }

    /// Remodel range from data when present, otherwise new cost × remodel multiplier
    fn remodel_cost(
        &self,
        input: &ProjectInput,
        range: &CostRange,
        historic: f64,
        new_cost: &UnitCost,
        notes: &mut CalcNotes,
    ) -> UnitCost {
        if let Some(remodel) = &range.remodel {
            return unit_cost(
                [remodel.shell, remodel.interior, remodel.landscape],
                historic,
                input.overrides.remodel_cost_target,
            );
        }

        let multiplier = resolve_layered(
            input.remodel_multiplier,
            None,
            self.config.default_remodel_multiplier,
        )
        .value;
        let multiplier = if multiplier > 0.0 && multiplier <= 1.0 {
            multiplier
        } else {
            notes.warn(
                SOURCE,
                format!(
                    "Remodel multiplier {} outside (0, 1]; using {}",
                    multiplier, self.config.default_remodel_multiplier
                ),
            );
            self.config.default_remodel_multiplier
        };

        UnitCost {
            min: new_cost.min * multiplier,
            target: input
                .overrides
                .remodel_cost_target
                .unwrap_or(new_cost.target * multiplier),
            max: new_cost.max * multiplier,
        }
    }

    /// Resolve and normalize shell / interior / landscape shares
    pub fn resolve_shares(
        &self,
        input: &ProjectInput,
        range: &CostRange,
        notes: &mut CalcNotes,
    ) -> CategoryShares {
        let defaults = range.default_shares();
        let o = &input.overrides;

        let raw = CategoryShares {
            shell: clamp_fraction(resolve_layered(o.shell_share, Some(defaults.shell), 0.0).value),
            interior: clamp_fraction(
                resolve_layered(o.interior_share, Some(defaults.interior), 0.0).value,
            ),
            landscape: clamp_fraction(
                resolve_layered(o.landscape_share, Some(defaults.landscape), 0.0).value,
            ),
        };

        normalize_shares(raw, defaults, self.config.share_tolerance, notes)
    }
}

/// Sum the category bands, apply the historic multiplier, pick the target
fn unit_cost(bands: [CostBand; 3], historic: f64, target_override: Option<f64>) -> UnitCost {
    let min: f64 = bands.iter().map(|b| b.min).sum::<f64>() * historic;
    let max: f64 = bands.iter().map(|b| b.max).sum::<f64>() * historic;
    let midpoint = (min + max) / 2.0;

    UnitCost {
        min,
        target: resolve_layered(target_override, None, midpoint).value,
        max,
    }
}

fn non_negative(value: f64, what: &str, notes: &mut CalcNotes) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        notes.warn(SOURCE, format!("Invalid {} {}; using 0", what, value));
        0.0
    }
}

/// Rescale a share triple so it sums to exactly 1.0
pub fn normalize_shares(
    raw: CategoryShares,
    defaults: CategoryShares,
    tolerance: f64,
    notes: &mut CalcNotes,
) -> CategoryShares {
    let sum = raw.sum();

    if sum <= 0.0 {
        notes.warn(
            SOURCE,
            "Shell, interior and landscape shares are all zero; using cost-data defaults",
        );
        let default_sum = defaults.sum();
        if default_sum <= 0.0 {
            return CategoryShares {
                shell: 1.0,
                interior: 0.0,
                landscape: 0.0,
            };
        }
        return scale(defaults, default_sum);
    }

    if (sum - 1.0).abs() > tolerance {
        notes.warn(
            SOURCE,
            format!(
                "Shares sum to {:.4} (shell {:.4}, interior {:.4}, landscape {:.4}); normalized proportionally",
                sum, raw.shell, raw.interior, raw.landscape
            ),
        );
    }

    if sum == 1.0 {
        raw
    } else {
        scale(raw, sum)
    }
}

fn scale(shares: CategoryShares, sum: f64) -> CategoryShares {
    CategoryShares {
        shell: shares.shell / sum,
        interior: shares.interior / sum,
        landscape: shares.landscape / sum,
    }
}
