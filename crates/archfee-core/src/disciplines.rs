//! Discipline allocation
//!
//! Splits the shell budget into architecture and the six engineering
//! disciplines. Architecture always keeps at least the floor: engineering
//! shares summing past `1 - floor` are scaled down proportionally.

use crate::cost_data::embedded::tier_engineering_defaults;
use crate::error::CalcNotes;
use crate::resolve::{clamp_fraction, resolve_layered, Layer};
use archfee_types::{
    BudgetSplit, Discipline, DisciplineAllocation, DisciplineBudget, EngineeringOverrides,
    EngineeringShares, Tier,
};

const SOURCE: &str = "disciplines";

/// Resolve each engineering share as override, data, tier default
pub fn resolve_engineering_shares(
    overrides: &EngineeringOverrides,
    data: Option<&EngineeringShares>,
    tier: Tier,
) -> EngineeringShares {
    let defaults = tier_engineering_defaults(tier);
    let mut shares = EngineeringShares::default();

    for discipline in Discipline::ENGINEERING {
        let resolved = resolve_layered(
            overrides.get(discipline),
            data.and_then(|d| d.get(discipline)),
            defaults.get(discipline).unwrap_or(0.0),
        );
        if resolved.layer != Layer::Override {
            tracing::trace!(?discipline, layer = ?resolved.layer, value = resolved.value);
        }
        shares.set(discipline, clamp_fraction(resolved.value));
    }

    shares
}

/// Split the shell budget into architecture + engineering
///
/// The remodel component is taken as-is; the remodel multiplier was already
/// applied when the shell remodel budget was computed.
pub fn allocate_disciplines(
    shell_new: f64,
    shell_remodel: f64,
    engineering: EngineeringShares,
    architecture_floor: f64,
    notes: &mut CalcNotes,
) -> DisciplineBudget {
    let floor = clamp_fraction(architecture_floor);
    let ceiling = 1.0 - floor;
    let sum = engineering.sum();

    let (engineering, scale_factor) = if sum > ceiling && sum > 0.0 {
        let factor = ceiling / sum;
        notes.warn(
            SOURCE,
            format!(
                "Engineering shares sum to {:.4}, above {:.4}; scaled by {:.4} to keep the {:.0}% architecture floor",
                sum,
                ceiling,
                factor,
                floor * 100.0
            ),
        );
        (engineering.scaled(factor), factor)
    } else {
        (engineering, 1.0)
    };

    let architecture_percentage = floor.max(1.0 - engineering.sum());

    let mut allocations = Vec::with_capacity(7);
    allocations.push(DisciplineAllocation {
        discipline: Discipline::Architecture,
        percentage: architecture_percentage,
        budget: BudgetSplit::share_of(shell_new, shell_remodel, architecture_percentage),
    });
    allocations.extend(engineering.iter().map(|(discipline, share)| DisciplineAllocation {
        discipline,
        percentage: share,
        budget: BudgetSplit::share_of(shell_new, shell_remodel, share),
    }));

    DisciplineBudget {
        architecture_percentage,
        engineering,
        scale_factor,
        allocations,
    }
}
