//! Budget breakdown models

use serde::{Deserialize, Serialize};

use super::cost::CategoryShares;
use super::discipline::{Discipline, EngineeringShares};

/// Min / target / max cost per ft² after multipliers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    pub min: f64,
    pub target: f64,
    pub max: f64,
}

/// A budget amount tracked as new construction and remodel components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub new: f64,
    pub remodel: f64,
    pub total: f64,
}

impl BudgetSplit {
    pub fn new(new: f64, remodel: f64) -> Self {
        Self {
            new,
            remodel,
            total: new + remodel,
        }
    }

    /// Apply the same share to both components
    pub fn share_of(new_budget: f64, remodel_budget: f64, share: f64) -> Self {
        Self::new(new_budget * share, remodel_budget * share)
    }
}

/// Construction budget split across shell, interior and landscape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    pub new_cost: UnitCost,
    pub remodel_cost: UnitCost,
    pub new_budget: f64,
    pub remodel_budget: f64,
    pub total_budget: f64,
    /// Shares actually applied (after normalization)
    pub shares: CategoryShares,
    pub shell: BudgetSplit,
    pub interior: BudgetSplit,
    pub landscape: BudgetSplit,
}

impl BudgetBreakdown {
    /// New-construction fraction of the total budget (0 when empty)
    pub fn new_fraction(&self) -> f64 {
        if self.total_budget > 0.0 {
            self.new_budget / self.total_budget
        } else {
            0.0
        }
    }
}

/// Budget of a single discipline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisciplineAllocation {
    pub discipline: Discipline,
    /// Fraction of the parent category budget
    pub percentage: f64,
    pub budget: BudgetSplit,
}

/// Shell budget split into architecture and the six engineering disciplines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineBudget {
    pub architecture_percentage: f64,
    /// Engineering shares after floor scaling
    pub engineering: EngineeringShares,
    /// 1.0 when no scaling was needed
    pub scale_factor: f64,
    pub allocations: Vec<DisciplineAllocation>,
}

impl DisciplineBudget {
    pub fn get(&self, discipline: Discipline) -> Option<&DisciplineAllocation> {
        self.allocations.iter().find(|a| a.discipline == discipline)
    }

    pub fn total(&self) -> f64 {
        self.allocations.iter().map(|a| a.budget.total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_split_total() {
        let split = BudgetSplit::share_of(1_000_000.0, 200_000.0, 0.5);
        assert_eq!(split.new, 500_000.0);
        assert_eq!(split.remodel, 100_000.0);
        assert_eq!(split.total, 600_000.0);
    }
}
