//! Calculation configuration
//!
//! One canonical set of defaults for every constant the pipeline uses.
//! Loaded from `~/.config/archfee/config.toml`; every section and field is
//! optional and falls back to the values below.

use crate::error::CoreError;
use archfee_types::RateInputs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which default rate set applies when neither input nor data supply one
///
/// Two rate sets exist in the field. `Canonical` (40 / 50 / 2.2) is the
/// default; `LegacyService` (35.73 / 46.10 / 2.0) reproduces the older
/// estimating service until the domain owner settles on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateProfile {
    #[default]
    Canonical,
    LegacyService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub profile: RateProfile,
    /// Explicit values win over the profile
    pub labor_rate: Option<f64>,
    pub overhead_rate: Option<f64>,
    pub markup_factor: Option<f64>,
    pub discount: Option<f64>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            profile: RateProfile::Canonical,
            labor_rate: None,
            overhead_rate: None,
            markup_factor: None,
            discount: None,
        }
    }
}

impl RateConfig {
    /// Resolved configuration-level rates
    pub fn rates(&self) -> RateInputs {
        let base = match self.profile {
            RateProfile::Canonical => RateInputs {
                labor_rate: 40.0,
                overhead_rate: 50.0,
                markup_factor: 2.2,
                discount: 0.15,
            },
            RateProfile::LegacyService => RateInputs {
                labor_rate: 35.73,
                overhead_rate: 46.10,
                markup_factor: 2.0,
                discount: 0.15,
            },
        };

        RateInputs {
            labor_rate: self.labor_rate.unwrap_or(base.labor_rate),
            overhead_rate: self.overhead_rate.unwrap_or(base.overhead_rate),
            markup_factor: self.markup_factor.unwrap_or(base.markup_factor),
            discount: self.discount.unwrap_or(base.discount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Minimum share of the shell budget kept by architecture
    pub architecture_floor: f64,
    /// Allowed drift of shell + interior + landscape from 1.0
    pub share_tolerance: f64,
    /// Remodel cost as a fraction of new cost when data has no remodel range
    pub default_remodel_multiplier: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            architecture_floor: 0.10,
            share_tolerance: 0.01,
            default_remodel_multiplier: 0.6,
        }
    }
}

/// `rate = coefficient × area ^ exponent` ($/ft²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanCurve {
    pub coefficient: f64,
    pub exponent: f64,
}

impl ScanCurve {
    pub fn rate(&self, area_ft2: f64) -> f64 {
        if area_ft2 <= 0.0 {
            return 0.0;
        }
        self.coefficient * area_ft2.powf(self.exponent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopDownConfig {
    /// pct = a + b × budget_millions ^ c
    pub curve_a: f64,
    pub curve_b: f64,
    pub curve_c: f64,
    pub new_weight: f64,
    pub remodel_weight: f64,
    pub coordination_fee_pct: f64,
    pub building_scan: ScanCurve,
    pub site_scan: ScanCurve,
    /// Storage precision limit for percent-of-cost
    pub percent_of_cost_limit: f64,
}

impl Default for TopDownConfig {
    fn default() -> Self {
        Self {
            curve_a: 0.07498,
            curve_b: 0.007824,
            curve_c: -0.7495,
            new_weight: 0.95,
            remodel_weight: 1.05,
            coordination_fee_pct: 0.15,
            building_scan: ScanCurve {
                coefficient: 4.6,
                exponent: -0.24,
            },
            site_scan: ScanCurve {
                coefficient: 1.2,
                exponent: -0.22,
            },
            percent_of_cost_limit: 9.9999,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub internal_discount: f64,
    pub market_discount: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            internal_discount: 0.15,
            market_discount: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceConfig {
    pub moderate_threshold: f64,
    pub high_threshold: f64,
    /// Below this hours/ft² is unusual
    pub unusual_low: f64,
    /// Below this hours/ft² is low
    pub low: f64,
    /// Above this hours/ft² is high
    pub high: f64,
    /// Above this hours/ft² is unusual
    pub unusual_high: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            moderate_threshold: 0.25,
            high_threshold: 0.50,
            unusual_low: 0.2,
            low: 0.3,
            high: 1.5,
            unusual_high: 2.0,
        }
    }
}

/// Complete calculation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub rates: RateConfig,
    pub allocation: AllocationConfig,
    pub top_down: TopDownConfig,
    pub scenarios: ScenarioConfig,
    pub variance: VarianceConfig,
}

impl FeeConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("archfee").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| CoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: FeeConfig = toml::from_str(&content).map_err(|source| CoreError::TomlParse {
            path: path.to_path_buf(),
            message: source.message().to_string(),
            source,
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded fee configuration");
        Ok(config)
    }

    /// Load configuration, degrading to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(CoreError::FileNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let floor = self.allocation.architecture_floor;
        if !(0.0..1.0).contains(&floor) {
            return Err(CoreError::InvalidConfig {
                message: format!("architecture_floor must be in [0, 1), got {}", floor),
            });
        }

        if self.variance.moderate_threshold > self.variance.high_threshold {
            return Err(CoreError::InvalidConfig {
                message: "variance moderate_threshold exceeds high_threshold".to_string(),
            });
        }

        let v = &self.variance;
        if !(v.unusual_low <= v.low && v.low <= v.high && v.high <= v.unusual_high) {
            return Err(CoreError::InvalidConfig {
                message: "hours/ft² bands must be ascending".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rates_are_canonical() {
        let rates = FeeConfig::default().rates.rates();
        assert_eq!(rates.labor_rate, 40.0);
        assert_eq!(rates.overhead_rate, 50.0);
        assert_eq!(rates.markup_factor, 2.2);
        assert_eq!(rates.discount, 0.15);
    }

    #[test]
    fn test_legacy_profile() {
        let config = RateConfig {
            profile: RateProfile::LegacyService,
            ..Default::default()
        };
        let rates = config.rates();
        assert_eq!(rates.labor_rate, 35.73);
        assert_eq!(rates.overhead_rate, 46.10);
        assert_eq!(rates.markup_factor, 2.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FeeConfig = toml::from_str(
            r#"
            [rates]
            labor_rate = 42.5

            [top_down]
            coordination_fee_pct = 0.12
            "#,
        )
        .unwrap();

        assert_eq!(config.rates.rates().labor_rate, 42.5);
        assert_eq!(config.rates.rates().overhead_rate, 50.0);
        assert_eq!(config.top_down.coordination_fee_pct, 0.12);
        assert_eq!(config.top_down.curve_a, 0.07498);
        assert_eq!(config.allocation.architecture_floor, 0.10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rates]\nprofile = \"legacy_service\"").unwrap();

        let config = FeeConfig::load(file.path()).unwrap();
        assert_eq!(config.rates.profile, RateProfile::LegacyService);
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rates\nbroken").unwrap();

        let err = FeeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::TomlParse { .. }));
    }

    #[test]
    fn test_load_rejects_bad_floor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[allocation]\narchitecture_floor = 1.5").unwrap();

        let err = FeeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FeeConfig::load_or_default(Some(&dir.path().join("nope.toml")));
        assert_eq!(config, FeeConfig::default());
    }

    #[test]
    fn test_scan_curve_zero_area() {
        assert_eq!(TopDownConfig::default().building_scan.rate(0.0), 0.0);
        assert!(TopDownConfig::default().building_scan.rate(5000.0) > 0.0);
    }
}
