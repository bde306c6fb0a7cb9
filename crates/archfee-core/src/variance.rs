//! Variance checks between the two fee methods
//!
//! Advisory only: the report is attached to the result and never changes
//! any computed figure.

use crate::config::VarianceConfig;
use crate::resolve::safe_div;
use archfee_types::{EngineeringOverrides, HoursDensity, VarianceLevel, VarianceReport};

pub struct VarianceChecker<'a> {
    config: &'a VarianceConfig,
}

impl<'a> VarianceChecker<'a> {
    pub fn new(config: &'a VarianceConfig) -> Self {
        Self { config }
    }

    /// Classify |bottom_up - top_down| / top_down
    pub fn classify_variance(&self, variance: f64) -> VarianceLevel {
        if variance > self.config.high_threshold {
            VarianceLevel::High
        } else if variance >= self.config.moderate_threshold {
            VarianceLevel::Moderate
        } else {
            VarianceLevel::Normal
        }
    }

    /// Place an hours/ft² figure in its band
    pub fn classify_density(&self, hours_per_ft2: f64) -> HoursDensity {
        let c = self.config;
        if hours_per_ft2 < c.unusual_low {
            HoursDensity::UnusuallyLow
        } else if hours_per_ft2 < c.low {
            HoursDensity::Low
        } else if hours_per_ft2 <= c.high {
            HoursDensity::Normal
        } else if hours_per_ft2 <= c.unusual_high {
            HoursDensity::High
        } else {
            HoursDensity::UnusuallyHigh
        }
    }

    /// Compare fees, check hours density and list unset engineering overrides
    ///
    /// The level is graded against `in_house_fee`, the scope the bottom-up
    /// hours cover. The variance against `market_fee` is reported alongside.
    pub fn check(
        &self,
        in_house_fee: f64,
        market_fee: f64,
        bottom_up_fee: f64,
        total_hours: f64,
        total_area_ft2: f64,
        overrides: &EngineeringOverrides,
    ) -> VarianceReport {
        let mut messages = Vec::new();

        let variance = if in_house_fee > 0.0 {
            safe_div((bottom_up_fee - in_house_fee).abs(), in_house_fee)
        } else if bottom_up_fee > 0.0 {
            messages.push("No top-down fee to compare the bottom-up fee against".to_string());
            1.0
        } else {
            0.0
        };

        let market_variance = if market_fee > 0.0 {
            safe_div((bottom_up_fee - market_fee).abs(), market_fee)
        } else {
            0.0
        };

        let level = if in_house_fee <= 0.0 && bottom_up_fee > 0.0 {
            VarianceLevel::High
        } else {
            self.classify_variance(variance)
        };

        match level {
            VarianceLevel::Normal => {}
            VarianceLevel::Moderate => messages.push(format!(
                "Moderate variance ({:.1}%) between in-house top-down ${:.0} and bottom-up ${:.0}",
                variance * 100.0,
                in_house_fee,
                bottom_up_fee
            )),
            VarianceLevel::High => messages.push(format!(
                "High variance ({:.1}%) between in-house top-down ${:.0} and bottom-up ${:.0}; review hours and rates",
                variance * 100.0,
                in_house_fee,
                bottom_up_fee
            )),
        }

        let hours_per_ft2 = safe_div(total_hours, total_area_ft2);
        let hours_density = self.classify_density(hours_per_ft2);
        if total_area_ft2 > 0.0 {
            let band = match hours_density {
                HoursDensity::UnusuallyLow => Some("unusually low"),
                HoursDensity::Low => Some("low"),
                HoursDensity::Normal => None,
                HoursDensity::High => Some("high"),
                HoursDensity::UnusuallyHigh => Some("unusually high"),
            };
            if let Some(band) = band {
                messages.push(format!("{:.3} hours/ft² is {}", hours_per_ft2, band));
            }
        }

        let missing_overrides = overrides.unset();
        if !missing_overrides.is_empty() {
            let names: Vec<&str> = missing_overrides.iter().map(|d| d.label()).collect();
            messages.push(format!(
                "No share override for: {} (using data or tier defaults)",
                names.join(", ")
            ));
        }

        tracing::debug!(
            variance,
            market_variance,
            ?level,
            hours_per_ft2,
            ?hours_density,
            "Variance check"
        );

        VarianceReport {
            in_house_top_down_fee: in_house_fee,
            top_down_market_fee: market_fee,
            bottom_up_fee,
            variance,
            market_variance,
            level,
            hours_per_ft2,
            hours_density,
            missing_overrides,
            messages,
        }
    }
}
