//! Data-access seam for cost, share, multiplier and rate lookups
//!
//! Lookups return `None` on a miss; the resolver then falls back through the
//! embedded tables. Sources never make a calculation fail.

pub mod file;

pub use file::{CostDataset, JsonFileSource};

use archfee_types::{CostRange, EngineeringShares, RateDefaults, Tier};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

/// External data store consulted before the embedded tables
#[async_trait]
pub trait CostDataSource: Send + Sync {
    /// Cost range for a canonical building type and tier
    async fn cost_range(&self, building_type: &str, tier: Tier) -> Option<CostRange>;

    /// Data-driven engineering shares for a building type and tier
    async fn engineering_shares(&self, building_type: &str, tier: Tier)
        -> Option<EngineeringShares>;

    /// Complexity multiplier for a category (1-5)
    async fn category_multiplier(&self, category: u8) -> Option<f64>;

    async fn rate_defaults(&self) -> Option<RateDefaults>;
}

/// Source with no rows of its own; everything resolves from embedded tables
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl CostDataSource for EmbeddedSource {
    async fn cost_range(&self, _building_type: &str, _tier: Tier) -> Option<CostRange> {
        None
    }

    async fn engineering_shares(
        &self,
        _building_type: &str,
        _tier: Tier,
    ) -> Option<EngineeringShares> {
        None
    }

    async fn category_multiplier(&self, _category: u8) -> Option<f64> {
        None
    }

    async fn rate_defaults(&self) -> Option<RateDefaults> {
        None
    }
}

/// Memoizing decorator for slow sources
///
/// Read-only: cached values are whatever the inner source returned,
/// misses included.
pub struct CachedSource<S> {
    inner: Arc<S>,
    ranges: Cache<(String, Tier), Option<CostRange>>,
    shares: Cache<(String, Tier), Option<EngineeringShares>>,
    multipliers: Cache<u8, Option<f64>>,
    rates: Cache<(), Option<RateDefaults>>,
}

impl<S: CostDataSource + 'static> CachedSource<S> {
    pub fn new(inner: S, max_entries: u64) -> Self {
        Self {
            inner: Arc::new(inner),
            ranges: Cache::new(max_entries),
            shares: Cache::new(max_entries),
            multipliers: Cache::new(8),
            rates: Cache::new(1),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CostDataSource + 'static> CostDataSource for CachedSource<S> {
    async fn cost_range(&self, building_type: &str, tier: Tier) -> Option<CostRange> {
        let inner = Arc::clone(&self.inner);
        let key = (building_type.to_string(), tier);
        let building_type = building_type.to_string();
        self.ranges
            .get_with(key, async move { inner.cost_range(&building_type, tier).await })
            .await
    }

    async fn engineering_shares(
        &self,
        building_type: &str,
        tier: Tier,
    ) -> Option<EngineeringShares> {
        let inner = Arc::clone(&self.inner);
        let key = (building_type.to_string(), tier);
        let building_type = building_type.to_string();
        self.shares
            .get_with(key, async move {
                inner.engineering_shares(&building_type, tier).await
            })
            .await
    }

    async fn category_multiplier(&self, category: u8) -> Option<f64> {
        let inner = Arc::clone(&self.inner);
        self.multipliers
            .get_with(category, async move { inner.category_multiplier(category).await })
            .await
    }

    async fn rate_defaults(&self) -> Option<RateDefaults> {
        let inner = Arc::clone(&self.inner);
        self.rates
            .get_with((), async move { inner.rate_defaults().await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CostDataSource for CountingSource {
        async fn cost_range(&self, _building_type: &str, _tier: Tier) -> Option<CostRange> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            None
        }

        async fn engineering_shares(
            &self,
            _building_type: &str,
            _tier: Tier,
        ) -> Option<EngineeringShares> {
            None
        }

        async fn category_multiplier(&self, category: u8) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(1.0 + category as f64)
        }

        async fn rate_defaults(&self) -> Option<RateDefaults> {
            None
        }
    }

    #[tokio::test]
    async fn test_embedded_source_always_misses() {
        let source = EmbeddedSource;
        assert!(source.cost_range("Custom Houses", Tier::Mid).await.is_none());
        assert!(source.category_multiplier(3).await.is_none());
        assert!(source.rate_defaults().await.is_none());
    }

    #[tokio::test]
    async fn test_cached_source_memoizes_misses_and_hits() {
        let cached = CachedSource::new(CountingSource::default(), 64);

        assert!(cached.cost_range("Office", Tier::Mid).await.is_none());
        assert!(cached.cost_range("Office", Tier::Mid).await.is_none());
        assert_eq!(cached.category_multiplier(2).await, Some(3.0));
        assert_eq!(cached.category_multiplier(2).await, Some(3.0));

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }
}
