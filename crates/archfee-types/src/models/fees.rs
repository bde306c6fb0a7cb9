//! Top-down and bottom-up fee models

use serde::{Deserialize, Serialize};

use super::discipline::FeeScope;

/// One row per service scope
///
/// Exactly one of `in_house_fee` / `consultant_fee` carries the market fee;
/// `coordination_fee` is nonzero only for outsourced scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeLine {
    pub scope: FeeScope,
    /// Fee as a fraction of the scope's construction budget, clamped for storage
    pub percent_of_cost: f64,
    pub rate_per_sq_ft: f64,
    pub market_fee: f64,
    /// The firm's own fee
    #[serde(rename = "louisAmyFee")]
    pub in_house_fee: f64,
    pub consultant_fee: f64,
    pub coordination_fee: f64,
    pub hours: f64,
    pub is_in_house: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTotals {
    pub market_fee: f64,
    #[serde(rename = "louisAmyFee")]
    pub in_house_fee: f64,
    pub consultant_fee: f64,
    pub coordination_fee: f64,
    /// in-house + consultant + coordination
    pub total_fee: f64,
    pub in_house_hours: f64,
}

impl FeeTotals {
    pub fn from_lines(lines: &[FeeLine]) -> Self {
        let mut totals = lines.iter().fold(Self::default(), |mut acc, line| {
            acc.market_fee += line.market_fee;
            acc.in_house_fee += line.in_house_fee;
            acc.consultant_fee += line.consultant_fee;
            acc.coordination_fee += line.coordination_fee;
            acc.in_house_hours += line.hours;
            acc
        });
        totals.total_fee = totals.in_house_fee + totals.consultant_fee + totals.coordination_fee;
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDownFees {
    pub lines: Vec<FeeLine>,
    pub totals: FeeTotals,
}

/// Rates feeding the bottom-up fee
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInputs {
    pub labor_rate: f64,
    pub overhead_rate: f64,
    pub markup_factor: f64,
    pub discount: f64,
}

impl RateInputs {
    /// (labor + overhead) × markup
    pub fn blended_rate(&self) -> f64 {
        (self.labor_rate + self.overhead_rate) * self.markup_factor
    }

    /// Blended rate after discount
    pub fn discounted_rate(&self) -> f64 {
        self.blended_rate() * (1.0 - self.discount)
    }

    /// Discounted rate rounded to whole dollars
    pub fn average_pricing_per_hour(&self) -> f64 {
        self.discounted_rate().round()
    }
}

/// Which hours model drives the bottom-up fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursModel {
    /// Sum of in-house discipline hours from the top-down fees
    Linear,
    /// Power-law hours-per-area factor
    #[default]
    NonLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursEstimate {
    pub model: HoursModel,
    /// Hours per ft² (non-linear model only)
    pub hours_factor: Option<f64>,
    pub new_construction_hours: f64,
    pub existing_remodel_hours: f64,
    /// Unrounded
    pub total_hours: f64,
    /// Rounded to whole hours
    pub total_hours_planned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomUpResult {
    pub rates: RateInputs,
    pub average_pricing_per_hour: f64,
    pub hours: HoursEstimate,
    pub bottom_up_fee: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discipline::Discipline;

    #[test]
    fn test_rate_inputs() {
        let rates = RateInputs {
            labor_rate: 40.0,
            overhead_rate: 50.0,
            markup_factor: 2.2,
            discount: 0.15,
        };
        assert!((rates.blended_rate() - 198.0).abs() < 1e-9);
        assert!((rates.discounted_rate() - 168.3).abs() < 1e-9);
        assert_eq!(rates.average_pricing_per_hour(), 168.0);
    }

    #[test]
    fn test_fee_totals() {
        let line = |in_house: f64, consultant: f64| FeeLine {
            scope: FeeScope::Discipline(Discipline::Architecture),
            percent_of_cost: 0.1,
            rate_per_sq_ft: 0.0,
            market_fee: in_house + consultant,
            in_house_fee: in_house,
            consultant_fee: consultant,
            coordination_fee: consultant * 0.15,
            hours: in_house / 100.0,
            is_in_house: in_house > 0.0,
        };
        let totals = FeeTotals::from_lines(&[line(1000.0, 0.0), line(0.0, 2000.0)]);
        assert_eq!(totals.market_fee, 3000.0);
        assert_eq!(totals.coordination_fee, 300.0);
        assert_eq!(totals.total_fee, 3300.0);
        assert_eq!(totals.in_house_hours, 10.0);
    }

    #[test]
    fn test_fee_line_wire_name() {
        let json = serde_json::to_value(FeeTotals::default()).unwrap();
        assert!(json.get("louisAmyFee").is_some());
    }
}
