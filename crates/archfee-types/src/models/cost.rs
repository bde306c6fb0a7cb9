//! Construction cost ranges resolved from building data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::discipline::Role;
use super::input::Tier;

/// Cost per ft² for one budget category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBand {
    pub min: f64,
    /// Target as recorded in the source data
    pub target: f64,
    pub max: f64,
}

impl CostBand {
    pub const fn new(min: f64, target: f64, max: f64) -> Self {
        Self { min, target, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Shell / interior / landscape split of a budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryShares {
    pub shell: f64,
    pub interior: f64,
    pub landscape: f64,
}

impl CategoryShares {
    pub fn sum(&self) -> f64 {
        self.shell + self.interior + self.landscape
    }
}

/// Remodel-specific cost bands, when the data carries them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemodelBands {
    pub shell: CostBand,
    pub interior: CostBand,
    pub landscape: CostBand,
}

/// Per-ft² cost ranges for one building type and tier
///
/// Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRange {
    /// Human readable record name ("Custom Houses / Mid")
    pub label: String,
    pub tier: Tier,
    pub shell: CostBand,
    pub interior: CostBand,
    pub landscape: CostBand,
    #[serde(default)]
    pub remodel: Option<RemodelBands>,
    /// Baseline shares; derived from category targets when absent
    #[serde(default)]
    pub shares: Option<CategoryShares>,
}

impl CostRange {
    /// Baseline shares from data, or the ratio of each category's target cost
    pub fn default_shares(&self) -> CategoryShares {
        if let Some(shares) = self.shares {
            return shares;
        }

        let total = self.shell.target + self.interior.target + self.landscape.target;
        if total <= 0.0 {
            return CategoryShares {
                shell: 1.0,
                interior: 0.0,
                landscape: 0.0,
            };
        }

        CategoryShares {
            shell: self.shell.target / total,
            interior: self.interior.target / total,
            landscape: self.landscape.target / total,
        }
    }
}

/// Where the cost data for a calculation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDataOrigin {
    /// External data store row
    Source,
    /// Built-in table, exact type and tier match
    Embedded,
    /// Built-in default for the building category
    CategoryDefault,
    /// Last resort "Mid-Range Standard Residential"
    #[default]
    Fallback,
}

/// Rate defaults supplied by the data store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateDefaults {
    /// Labor + overhead cost per hour, by role
    pub labor_overhead_by_role: BTreeMap<Role, f64>,
    /// Market billing rates per hour, by role
    pub hourly_rates_by_role: BTreeMap<Role, f64>,
    pub labor_rate: Option<f64>,
    pub overhead_rate: Option<f64>,
    pub markup_factor: Option<f64>,
    pub discount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(shares: Option<CategoryShares>) -> CostRange {
        CostRange {
            label: "test".to_string(),
            tier: Tier::Mid,
            shell: CostBand::new(200.0, 250.0, 300.0),
            interior: CostBand::new(100.0, 150.0, 200.0),
            landscape: CostBand::new(50.0, 100.0, 150.0),
            remodel: None,
            shares,
        }
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(CostBand::new(100.0, 0.0, 200.0).midpoint(), 150.0);
    }

    #[test]
    fn test_default_shares_derived_from_targets() {
        let shares = range(None).default_shares();
        assert!((shares.shell - 0.5).abs() < 1e-12);
        assert!((shares.interior - 0.3).abs() < 1e-12);
        assert!((shares.landscape - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_shares_win() {
        let explicit = CategoryShares {
            shell: 0.7,
            interior: 0.2,
            landscape: 0.1,
        };
        assert_eq!(range(Some(explicit)).default_shares(), explicit);
    }
}
