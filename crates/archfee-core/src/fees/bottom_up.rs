//! Bottom-up (hours × rate) fees
//!
//! ```text
//! rate = (labor + overhead) × markup × (1 - discount)
//! fee  = planned hours × rate
//! ```
//!
//! Hours come from one of two models:
//! - **Linear**: the in-house hours of the top-down fee lines
//! - **Non-linear**: a power-law hours/ft² factor that falls with area
//!
//! ```text
//! factor = (0.21767 + 11.21274 × area ^ -0.53816 - 0.08) × category_multiplier
//! new hours     = factor × 0.9 × new area
//! remodel hours = factor × 0.77 × existing area × 1.15
//! ```

use crate::config::RateConfig;
use crate::error::CalcNotes;
use crate::resolve::resolve_layered;
use archfee_types::{
    BottomUpResult, HoursEstimate, HoursModel, Overrides, ProjectInput, RateDefaults, RateInputs,
    TopDownFees,
};

const SOURCE: &str = "bottom_up";

const FACTOR_BASE: f64 = 0.21767;
const FACTOR_COEFFICIENT: f64 = 11.21274;
const FACTOR_EXPONENT: f64 = -0.53816;
const FACTOR_OFFSET: f64 = 0.08;
const NEW_CONSTRUCTION_WEIGHT: f64 = 0.9;
const REMODEL_WEIGHT: f64 = 0.77;
const REMODEL_UPLIFT: f64 = 1.15;

/// Hours rounded to whole hours for an area and hours/ft² factor
pub fn planned_hours(area_ft2: f64, hours_factor: f64) -> f64 {
    let hours = area_ft2 * hours_factor;
    if hours.is_finite() {
        hours.round()
    } else {
        0.0
    }
}

/// Each rate resolves as input override, data default, configuration
pub fn resolve_rates(overrides: &Overrides, data: &RateDefaults, config: &RateConfig) -> RateInputs {
    let base = config.rates();
    RateInputs {
        labor_rate: resolve_layered(overrides.labor_rate, data.labor_rate, base.labor_rate).value,
        overhead_rate: resolve_layered(overrides.overhead_rate, data.overhead_rate, base.overhead_rate)
            .value,
        markup_factor: resolve_layered(overrides.markup_factor, data.markup_factor, base.markup_factor)
            .value,
        discount: resolve_layered(overrides.discount, data.discount, base.discount).value,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BottomUpFeeEngine;

impl BottomUpFeeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Power-law hours/ft² factor for a total area; 0 for empty projects
    pub fn hours_factor(&self, total_area_ft2: f64, category_multiplier: f64) -> f64 {
        if total_area_ft2 <= 0.0 || !total_area_ft2.is_finite() {
            return 0.0;
        }
        let factor = (FACTOR_BASE + FACTOR_COEFFICIENT * total_area_ft2.powf(FACTOR_EXPONENT)
            - FACTOR_OFFSET)
            * category_multiplier;
        factor.max(0.0)
    }

    /// Hours from the power-law model, or from an explicit hours/ft² factor
    pub fn non_linear_hours(
        &self,
        input: &ProjectInput,
        category_multiplier: f64,
        notes: &mut CalcNotes,
    ) -> HoursEstimate {
        let new_area = input.new_area_ft2.max(0.0);
        let existing_area = input.existing_area_ft2.max(0.0);
        let total_area = new_area + existing_area;

        if let Some(factor) = input.overrides.hours_factor {
            tracing::debug!(factor, "Using hours factor override");
            return HoursEstimate {
                model: HoursModel::NonLinear,
                hours_factor: Some(factor),
                new_construction_hours: new_area * factor,
                existing_remodel_hours: existing_area * factor,
                total_hours: total_area * factor,
                total_hours_planned: planned_hours(total_area, factor),
            };
        }

        if total_area <= 0.0 {
            notes.warn(SOURCE, "Total area is zero; no design hours estimated");
        }

        let factor = self.hours_factor(total_area, category_multiplier);
        let new_construction_hours = factor * NEW_CONSTRUCTION_WEIGHT * new_area;
        let existing_remodel_hours = factor * REMODEL_WEIGHT * existing_area * REMODEL_UPLIFT;
        let total_hours = new_construction_hours + existing_remodel_hours;

        HoursEstimate {
            model: HoursModel::NonLinear,
            hours_factor: Some(factor),
            new_construction_hours,
            existing_remodel_hours,
            total_hours,
            total_hours_planned: total_hours.round(),
        }
    }

    /// Hours as the sum of in-house fee-line hours
    ///
    /// The split between new and remodel follows the budget's new fraction.
    pub fn linear_hours(&self, top_down: &TopDownFees, new_fraction: f64) -> HoursEstimate {
        let total_hours = top_down.totals.in_house_hours;
        HoursEstimate {
            model: HoursModel::Linear,
            hours_factor: None,
            new_construction_hours: total_hours * new_fraction,
            existing_remodel_hours: total_hours * (1.0 - new_fraction),
            total_hours,
            total_hours_planned: total_hours.round(),
        }
    }

    /// Bottom-up fee for resolved rates and an hours estimate
    pub fn compute(&self, rates: RateInputs, hours: HoursEstimate) -> BottomUpResult {
        let bottom_up_fee = hours.total_hours_planned * rates.discounted_rate();
        tracing::debug!(
            hours = hours.total_hours_planned,
            rate = rates.discounted_rate(),
            bottom_up_fee,
            "Computed bottom-up fee"
        );

        BottomUpResult {
            rates,
            average_pricing_per_hour: rates.average_pricing_per_hour(),
            hours,
            bottom_up_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateProfile;
    use archfee_types::FeeTotals;

    fn canonical() -> RateInputs {
        RateConfig::default().rates()
    }

    fn hours(planned: f64) -> HoursEstimate {
        HoursEstimate {
            model: HoursModel::NonLinear,
            hours_factor: None,
            new_construction_hours: planned,
            existing_remodel_hours: 0.0,
            total_hours: planned,
            total_hours_planned: planned,
        }
    }

    #[test]
    fn test_thousand_hours_at_canonical_rates() {
        let result = BottomUpFeeEngine::new().compute(canonical(), hours(1000.0));
        assert!((result.bottom_up_fee - 168_300.0).abs() < 1e-6);
        assert_eq!(result.average_pricing_per_hour, 168.0);
    }

    #[test]
    fn test_planned_hours() {
        assert_eq!(planned_hours(5000.0, 0.220), 1100.0);
        assert_eq!(planned_hours(0.0, 0.5), 0.0);
        assert_eq!(planned_hours(f64::INFINITY, 0.5), 0.0);
    }

    #[test]
    fn test_rate_resolution_precedence() {
        let overrides = Overrides {
            labor_rate: Some(45.0),
            ..Default::default()
        };
        let data = RateDefaults {
            labor_rate: Some(42.0),
            overhead_rate: Some(55.0),
            ..Default::default()
        };
        let config = RateConfig {
            profile: RateProfile::Canonical,
            ..Default::default()
        };

        let rates = resolve_rates(&overrides, &data, &config);
        assert_eq!(rates.labor_rate, 45.0);
        assert_eq!(rates.overhead_rate, 55.0);
        assert_eq!(rates.markup_factor, 2.2);
        assert_eq!(rates.discount, 0.15);
    }

    #[test]
    fn test_hours_factor_falls_with_area() {
        let engine = BottomUpFeeEngine::new();
        let small = engine.hours_factor(1_000.0, 1.0);
        let large = engine.hours_factor(50_000.0, 1.0);
        assert!(small > large);
        assert!(large > 0.0);
        assert_eq!(engine.hours_factor(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_non_linear_split() {
        let engine = BottomUpFeeEngine::new();
        let mut input = ProjectInput::new("Custom Houses", 3000.0);
        input.existing_area_ft2 = 1000.0;
        let mut notes = CalcNotes::new();

        let estimate = engine.non_linear_hours(&input, 1.1, &mut notes);
        let factor = engine.hours_factor(4000.0, 1.1);

        assert!((estimate.new_construction_hours - factor * 0.9 * 3000.0).abs() < 1e-9);
        assert!((estimate.existing_remodel_hours - factor * 0.77 * 1000.0 * 1.15).abs() < 1e-9);
        assert_eq!(estimate.total_hours_planned, estimate.total_hours.round());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_hours_factor_override() {
        let engine = BottomUpFeeEngine::new();
        let mut input = ProjectInput::new("Custom Houses", 5000.0);
        input.overrides.hours_factor = Some(0.220);
        let mut notes = CalcNotes::new();

        let estimate = engine.non_linear_hours(&input, 1.1, &mut notes);
        assert_eq!(estimate.total_hours_planned, 1100.0);
        assert_eq!(estimate.hours_factor, Some(0.220));
    }

    #[test]
    fn test_zero_area_warns() {
        let engine = BottomUpFeeEngine::new();
        let input = ProjectInput::new("Custom Houses", 0.0);
        let mut notes = CalcNotes::new();

        let estimate = engine.non_linear_hours(&input, 1.1, &mut notes);
        assert_eq!(estimate.total_hours_planned, 0.0);
        assert!(notes.has_warnings());
    }

    #[test]
    fn test_linear_hours() {
        let top_down = TopDownFees {
            lines: Vec::new(),
            totals: FeeTotals {
                in_house_hours: 812.6,
                ..Default::default()
            },
        };
        let estimate = BottomUpFeeEngine::new().linear_hours(&top_down, 0.75);
        assert_eq!(estimate.model, HoursModel::Linear);
        assert_eq!(estimate.total_hours_planned, 813.0);
        assert!((estimate.new_construction_hours - 609.45).abs() < 1e-9);
    }
}
