//! Hours distribution
//!
//! Spreads planned hours over the six design phases, then each phase over
//! staff roles with a leverage table. Staff weights of a phase sum to 1;
//! Admin time is carried on top of them.
//!
//! Role totals are rounded per role: Admin to the nearest hour, every other
//! role up. The gap between the rounded and exact totals is reported as
//! `difference`.

use archfee_types::{HoursDistribution, HoursPhase, Phase, PhaseRoleHours, Role, RoleHours, RoleTotal};
use std::collections::BTreeMap;

/// Share of planned hours per phase; sums to 1
pub const PHASE_PERCENTAGES: [(Phase, f64); 6] = [
    (Phase::Discovery, 0.08),
    (Phase::CreativeConceptual, 0.08),
    (Phase::CreativeSchematic, 0.34),
    (Phase::CreativePreliminary, 0.08),
    (Phase::TechnicalSchematic, 0.34),
    (Phase::TechnicalPreliminary, 0.08),
];

/// Float noise tolerated before rounding a role total up
const CEIL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    Nearest,
    Up,
}

pub fn rounding_policy(role: Role) -> RoundingPolicy {
    match role {
        Role::Admin => RoundingPolicy::Nearest,
        _ => RoundingPolicy::Up,
    }
}

impl RoundingPolicy {
    pub fn apply(self, hours: f64) -> f64 {
        match self {
            RoundingPolicy::Nearest => hours.round(),
            RoundingPolicy::Up => (hours - CEIL_TOLERANCE).ceil().max(0.0),
        }
    }
}

/// Role weights within a phase
///
/// Order: Designer 1, Designer 2, Architect, Engineer, Principal, Admin.
pub fn leverage(phase: Phase) -> [(Role, f64); 6] {
    let weights = match phase {
        Phase::Discovery => [0.10, 0.10, 0.35, 0.05, 0.40, 0.10],
        Phase::CreativeConceptual => [0.25, 0.20, 0.30, 0.05, 0.20, 0.05],
        Phase::CreativeSchematic => [0.30, 0.25, 0.25, 0.10, 0.10, 0.05],
        Phase::CreativePreliminary => [0.25, 0.25, 0.25, 0.15, 0.10, 0.05],
        Phase::TechnicalSchematic => [0.20, 0.25, 0.25, 0.20, 0.10, 0.05],
        Phase::TechnicalPreliminary => [0.20, 0.20, 0.30, 0.20, 0.10, 0.05],
    };
    let mut out = [(Role::Designer1, 0.0); 6];
    for (slot, (role, weight)) in out.iter_mut().zip(Role::ALL.into_iter().zip(weights)) {
        *slot = (role, weight);
    }
    out
}

/// Split planned hours across phases
///
/// Phases are rounded to the nearest whole hour and the last phase absorbs the
/// remainder, so the phase hours always sum to `total_hours_planned`.
pub fn distribute_phases(total_hours_planned: f64, duration_months: Option<f64>) -> Vec<HoursPhase> {
    let total = total_hours_planned.max(0.0);
    let last = PHASE_PERCENTAGES.len() - 1;

    let mut hours: Vec<f64> = PHASE_PERCENTAGES
        .iter()
        .take(last)
        .map(|(_, pct)| (total * pct).round())
        .collect();
    let remainder = total - hours.iter().sum::<f64>();

    if remainder < 0.0 {
        // Too few hours to round per phase; keep exact shares instead
        hours = PHASE_PERCENTAGES.iter().map(|(_, pct)| total * pct).collect();
        let assigned: f64 = hours.iter().take(last).sum();
        hours[last] = total - assigned;
    } else {
        hours.push(remainder);
    }

    PHASE_PERCENTAGES
        .iter()
        .zip(hours)
        .map(|(&(phase, pct), hours)| HoursPhase {
            phase,
            months: duration_months.map(|m| m * pct),
            percent_of_total: pct,
            hours,
        })
        .collect()
}

/// Split phase hours across roles and round the role totals
pub fn distribute_roles(phases: &[HoursPhase]) -> RoleHours {
    let by_phase: Vec<PhaseRoleHours> = phases
        .iter()
        .map(|p| PhaseRoleHours {
            phase: p.phase,
            hours: leverage(p.phase)
                .into_iter()
                .map(|(role, weight)| (role, p.hours * weight))
                .collect(),
        })
        .collect();

    let mut exact: BTreeMap<Role, f64> = Role::ALL.into_iter().map(|r| (r, 0.0)).collect();
    for phase in &by_phase {
        for (role, hours) in &phase.hours {
            *exact.entry(*role).or_default() += hours;
        }
    }

    let totals: Vec<RoleTotal> = Role::ALL
        .into_iter()
        .map(|role| {
            let planned_hours = exact.get(&role).copied().unwrap_or(0.0);
            RoleTotal {
                role,
                planned_hours,
                rounded_hours: rounding_policy(role).apply(planned_hours),
            }
        })
        .collect();

    let planned_total: f64 = totals.iter().map(|t| t.planned_hours).sum();
    let rounded_total: f64 = totals.iter().map(|t| t.rounded_hours).sum();

    RoleHours {
        by_phase,
        totals,
        planned_total,
        rounded_total,
        difference: rounded_total - planned_total,
    }
}

pub fn compute_hours_distribution(
    total_hours_planned: f64,
    duration_months: Option<f64>,
) -> HoursDistribution {
    let phases = distribute_phases(total_hours_planned, duration_months);
    let roles = distribute_roles(&phases);
    tracing::debug!(
        total_hours_planned,
        rounded_total = roles.rounded_total,
        difference = roles.difference,
        "Distributed hours"
    );

    HoursDistribution {
        total_hours_planned: total_hours_planned.max(0.0),
        phases,
        roles,
    }
}
