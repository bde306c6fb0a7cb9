//! JSON dataset source
//!
//! Loads building cost records exported from the data store into memory.
//! Loading can fail; lookups on a loaded dataset cannot.

use super::CostDataSource;
use crate::cost_data::canonical_building_type;
use crate::error::CoreError;
use archfee_types::{CostRange, EngineeringShares, RateDefaults, Tier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Datasets older than this are still used, with a warning
const STALE_AFTER_DAYS: i64 = 180;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    pub building_type: String,
    #[serde(flatten)]
    pub range: CostRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringRecord {
    pub building_type: String,
    pub tier: Tier,
    pub shares: EngineeringShares,
}

/// On-disk dataset layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostDataset {
    pub last_updated: Option<DateTime<Utc>>,
    pub cost_ranges: Vec<CostRecord>,
    pub engineering_shares: Vec<EngineeringRecord>,
    pub category_multipliers: BTreeMap<u8, f64>,
    pub rate_defaults: Option<RateDefaults>,
}

/// In-memory index over a [`CostDataset`]
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    ranges: HashMap<(String, Tier), CostRange>,
    shares: HashMap<(String, Tier), EngineeringShares>,
    multipliers: BTreeMap<u8, f64>,
    rates: Option<RateDefaults>,
}

impl JsonFileSource {
    /// Load and index a dataset file
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CoreError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let dataset: CostDataset =
            serde_json::from_str(&content).map_err(|source| CoreError::JsonParse {
                path: path.to_path_buf(),
                message: source.to_string(),
                source,
            })?;

        if let Some(updated) = dataset.last_updated {
            let age = Utc::now().signed_duration_since(updated);
            if age.num_days() > STALE_AFTER_DAYS {
                tracing::warn!(
                    "Cost dataset {} is {} days old (refresh after {} days)",
                    path.display(),
                    age.num_days(),
                    STALE_AFTER_DAYS
                );
            }
        }

        let source = Self::from_dataset(dataset);
        tracing::info!(
            "Loaded {} cost records and {} engineering share rows from {}",
            source.ranges.len(),
            source.shares.len(),
            path.display()
        );
        Ok(source)
    }

    /// Index a dataset already in memory
    pub fn from_dataset(dataset: CostDataset) -> Self {
        let ranges = dataset
            .cost_ranges
            .into_iter()
            .map(|r| ((canonical_building_type(&r.building_type), r.range.tier), r.range))
            .collect();

        let shares = dataset
            .engineering_shares
            .into_iter()
            .map(|r| ((canonical_building_type(&r.building_type), r.tier), r.shares))
            .collect();

        Self {
            ranges,
            shares,
            multipliers: dataset.category_multipliers,
            rates: dataset.rate_defaults,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[async_trait]
impl CostDataSource for JsonFileSource {
    async fn cost_range(&self, building_type: &str, tier: Tier) -> Option<CostRange> {
        self.ranges
            .get(&(canonical_building_type(building_type), tier))
            .cloned()
    }

    async fn engineering_shares(
        &self,
        building_type: &str,
        tier: Tier,
    ) -> Option<EngineeringShares> {
        self.shares
            .get(&(canonical_building_type(building_type), tier))
            .copied()
    }

    async fn category_multiplier(&self, category: u8) -> Option<f64> {
        self.multipliers.get(&category).copied()
    }

    async fn rate_defaults(&self) -> Option<RateDefaults> {
        self.rates.clone()
    }
}
