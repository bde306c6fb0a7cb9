//! Rate-comparison scenarios (fee matrix)
//!
//! Prices the same role hours four ways:
//!
//! | scenario            | rate per role                       |
//! |---------------------|-------------------------------------|
//! | internal discounted | internal × (1 - internal discount)  |
//! | internal full       | internal                            |
//! | market full         | market                              |
//! | market discounted   | market × (1 - market discount)      |
//!
//! Roles missing from a rate table fall back to the internal computed rate.

use crate::config::ScenarioConfig;
use crate::resolve::safe_div;
use archfee_types::{RateDefaults, RateInputs, Role, Scenario, ScenarioKind, ScenarioSet};
use std::collections::BTreeMap;

/// Rate tables feeding the scenarios
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTables {
    /// Used for any role a table lacks
    pub internal_computed_rate: f64,
    pub internal: BTreeMap<Role, f64>,
    pub market: BTreeMap<Role, f64>,
}

impl RateTables {
    /// Build tables from input overrides, then data defaults
    ///
    /// Data internal rates are labor + overhead per role × markup; data
    /// market rates are used as billed.
    pub fn resolve(
        rates: &RateInputs,
        data: &RateDefaults,
        internal_overrides: &BTreeMap<Role, f64>,
        market_overrides: &BTreeMap<Role, f64>,
    ) -> Self {
        let mut internal: BTreeMap<Role, f64> = data
            .labor_overhead_by_role
            .iter()
            .map(|(role, cost)| (*role, cost * rates.markup_factor))
            .collect();
        internal.extend(internal_overrides.iter().map(|(r, v)| (*r, *v)));

        let mut market = data.hourly_rates_by_role.clone();
        market.extend(market_overrides.iter().map(|(r, v)| (*r, *v)));

        Self {
            internal_computed_rate: rates.blended_rate(),
            internal,
            market,
        }
    }

    pub fn internal_rate(&self, role: Role) -> f64 {
        self.internal
            .get(&role)
            .copied()
            .unwrap_or(self.internal_computed_rate)
    }

    pub fn market_rate(&self, role: Role) -> f64 {
        self.market
            .get(&role)
            .copied()
            .unwrap_or(self.internal_computed_rate)
    }
}

pub struct ScenarioEngine<'a> {
    config: &'a ScenarioConfig,
}

impl<'a> ScenarioEngine<'a> {
    pub fn new(config: &'a ScenarioConfig) -> Self {
        Self { config }
    }

    fn rate(&self, kind: ScenarioKind, tables: &RateTables, role: Role) -> f64 {
        match kind {
            ScenarioKind::InternalDiscounted => {
                tables.internal_rate(role) * (1.0 - self.config.internal_discount)
            }
            ScenarioKind::InternalFull => tables.internal_rate(role),
            ScenarioKind::MarketFull => tables.market_rate(role),
            ScenarioKind::MarketDiscounted => {
                tables.market_rate(role) * (1.0 - self.config.market_discount)
            }
        }
    }

    pub fn compute(
        &self,
        role_hours: &BTreeMap<Role, f64>,
        tables: &RateTables,
        reference_project_budget: f64,
    ) -> ScenarioSet {
        let scenarios = ScenarioKind::ALL
            .into_iter()
            .map(|kind| {
                let by_role: BTreeMap<Role, f64> = Role::ALL
                    .into_iter()
                    .map(|role| (role, self.rate(kind, tables, role)))
                    .collect();

                let total: f64 = role_hours
                    .iter()
                    .map(|(role, hours)| hours * by_role.get(role).copied().unwrap_or(0.0))
                    .sum();

                let pct_of_project_budget = if reference_project_budget > 0.0 {
                    safe_div(total, reference_project_budget)
                } else {
                    0.0
                };

                Scenario {
                    kind,
                    name: kind.label().to_string(),
                    by_role,
                    total,
                    pct_of_project_budget,
                }
            })
            .collect();

        ScenarioSet {
            reference_project_budget,
            scenarios,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours() -> BTreeMap<Role, f64> {
        [
            (Role::Designer1, 100.0),
            (Role::Designer2, 80.0),
            (Role::Architect, 60.0),
            (Role::Engineer, 20.0),
            (Role::Principal, 30.0),
            (Role::Admin, 10.0),
        ]
        .into_iter()
        .collect()
    }

    fn flat_tables(rate: f64) -> RateTables {
        RateTables {
            internal_computed_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_four_scenarios_in_order() {
        let config = ScenarioConfig::default();
        let set = ScenarioEngine::new(&config).compute(&hours(), &flat_tables(100.0), 1_000_000.0);
        let kinds: Vec<ScenarioKind> = set.scenarios.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ScenarioKind::ALL.to_vec());
    }

    #[test]
    fn test_fallback_to_internal_rate() {
        let config = ScenarioConfig::default();
        let set = ScenarioEngine::new(&config).compute(&hours(), &flat_tables(100.0), 0.0);

        let full = set.get(ScenarioKind::InternalFull).unwrap();
        assert!((full.total - 30_000.0).abs() < 1e-9);
        let market = set.get(ScenarioKind::MarketFull).unwrap();
        assert!((market.total - 30_000.0).abs() < 1e-9);

        let discounted = set.get(ScenarioKind::InternalDiscounted).unwrap();
        assert!((discounted.total - 25_500.0).abs() < 1e-9);
        let market_discounted = set.get(ScenarioKind::MarketDiscounted).unwrap();
        assert!((market_discounted.total - 24_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_of_project_budget() {
        let config = ScenarioConfig::default();
        let engine = ScenarioEngine::new(&config);

        let set = engine.compute(&hours(), &flat_tables(100.0), 300_000.0);
        let full = set.get(ScenarioKind::InternalFull).unwrap();
        assert!((full.pct_of_project_budget - 0.1).abs() < 1e-12);

        let set = engine.compute(&hours(), &flat_tables(100.0), 0.0);
        assert!(set.scenarios.iter().all(|s| s.pct_of_project_budget == 0.0));

        let set = engine.compute(&hours(), &flat_tables(100.0), -5.0);
        assert!(set.scenarios.iter().all(|s| s.pct_of_project_budget == 0.0));
    }

    #[test]
    fn test_resolve_tables() {
        let rates = RateInputs {
            labor_rate: 40.0,
            overhead_rate: 50.0,
            markup_factor: 2.0,
            discount: 0.15,
        };
        let data = RateDefaults {
            labor_overhead_by_role: [(Role::Principal, 120.0), (Role::Admin, 40.0)]
                .into_iter()
                .collect(),
            hourly_rates_by_role: [(Role::Principal, 300.0)].into_iter().collect(),
            ..Default::default()
        };
        let internal_overrides = [(Role::Admin, 70.0)].into_iter().collect();

        let tables = RateTables::resolve(&rates, &data, &internal_overrides, &BTreeMap::new());

        assert_eq!(tables.internal_computed_rate, 180.0);
        assert_eq!(tables.internal_rate(Role::Principal), 240.0);
        assert_eq!(tables.internal_rate(Role::Admin), 70.0);
        assert_eq!(tables.internal_rate(Role::Architect), 180.0);
        assert_eq!(tables.market_rate(Role::Principal), 300.0);
        assert_eq!(tables.market_rate(Role::Designer1), 180.0);
    }
}
