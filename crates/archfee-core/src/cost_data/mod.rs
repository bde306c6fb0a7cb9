//! Cost data resolution
//!
//! Turns a building use / type / tier into a usable [`CostRange`], share
//! defaults, engineering shares, a category multiplier and rate defaults.
//! The data store is asked first, then the embedded tables. Resolution never
//! fails: every miss degrades to the next layer and leaves a note.

pub mod embedded;

use crate::error::CalcNotes;
use crate::source::CostDataSource;
use archfee_types::{
    CalcNote, CostDataOrigin, CostRange, EngineeringShares, ProjectInput, RateDefaults, Tier,
};

/// Legacy type names still found in stored projects
const LEGACY_TYPE_NAMES: &[(&str, &str)] = &[
    ("single family residence", "Custom Houses"),
    ("single-family home", "Custom Houses"),
    ("custom home", "Custom Houses"),
    ("residential", "Custom Houses"),
    ("apartments", "Multi-Family"),
    ("apartment building", "Multi-Family"),
    ("multifamily", "Multi-Family"),
    ("office building", "Office"),
    ("commercial office", "Office"),
    ("retail store", "Retail"),
    ("hotel/motel", "Hotel"),
    ("k-12 school", "School"),
];

/// Map legacy building type names to their current name
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// Unknown names pass through trimmed.
pub fn canonical_building_type(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    LEGACY_TYPE_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Broad building category used for default cost tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingCategory {
    Residential,
    Commercial,
    Hospitality,
    Institutional,
    Industrial,
}

impl BuildingCategory {
    pub const ALL: [BuildingCategory; 5] = [
        BuildingCategory::Residential,
        BuildingCategory::Commercial,
        BuildingCategory::Hospitality,
        BuildingCategory::Institutional,
        BuildingCategory::Industrial,
    ];

    /// Parse a building-use label ("Residential", "commercial", ...)
    pub fn from_use(building_use: &str) -> Option<Self> {
        match building_use.trim().to_lowercase().as_str() {
            "residential" => Some(Self::Residential),
            "commercial" | "office" | "retail" => Some(Self::Commercial),
            "hospitality" => Some(Self::Hospitality),
            "institutional" | "education" | "civic" | "healthcare" => Some(Self::Institutional),
            "industrial" | "warehouse" => Some(Self::Industrial),
            _ => None,
        }
    }

    /// Category of a canonical building type
    pub fn from_type(building_type: &str) -> Option<Self> {
        match building_type {
            "Custom Houses" | "Multi-Family" | "Townhouses" | "ADU" => Some(Self::Residential),
            "Office" | "Retail" | "Restaurant" | "Mixed-Use" => Some(Self::Commercial),
            "Hotel" | "Resort" => Some(Self::Hospitality),
            "School" | "Library" | "Healthcare Clinic" | "Museum" => Some(Self::Institutional),
            "Warehouse" | "Manufacturing" => Some(Self::Industrial),
            _ => None,
        }
    }
}

/// Default multiplier: 0.8 + 0.1 × category (category clamped to 1-5)
pub fn default_category_multiplier(category: u8) -> f64 {
    0.8 + 0.1 * f64::from(category.clamp(1, 5))
}

/// Everything the pure calculation needs from the data layer
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedData {
    /// Canonical building type
    pub building_type: String,
    pub tier: Tier,
    pub range: CostRange,
    pub origin: CostDataOrigin,
    /// Data-driven engineering shares, if any layer had them
    pub engineering: Option<EngineeringShares>,
    pub category_multiplier: f64,
    pub rate_defaults: RateDefaults,
    /// Fallback notes produced during resolution
    pub notes: Vec<CalcNote>,
}

impl ResolvedData {
    /// Resolve from the embedded tables only (no data store)
    pub fn embedded(input: &ProjectInput) -> Self {
        let building_type = canonical_building_type(&input.building_type);
        let tier = input.tier();
        let mut notes = CalcNotes::new();
        let (range, origin, engineering) =
            resolve_embedded(&building_type, &input.building_use, tier, &mut notes);

        Self {
            building_type,
            tier,
            range,
            origin,
            engineering,
            category_multiplier: default_category_multiplier(input.category),
            rate_defaults: RateDefaults::default(),
            notes: notes.into_vec(),
        }
    }
}

/// Embedded lookup chain: exact record, category default, hardcoded fallback
fn resolve_embedded(
    building_type: &str,
    building_use: &str,
    tier: Tier,
    notes: &mut CalcNotes,
) -> (CostRange, CostDataOrigin, Option<EngineeringShares>) {
    if let Some(record) = embedded::exact_record(building_type, tier) {
        tracing::debug!(building_type, tier = tier.label(), "Using embedded cost record");
        return (
            record.range.clone(),
            CostDataOrigin::Embedded,
            record.engineering,
        );
    }

    let category =
        BuildingCategory::from_use(building_use).or_else(|| BuildingCategory::from_type(building_type));

    if let Some(range) = category.and_then(embedded::category_default) {
        notes.warn(
            "cost_data",
            format!(
                "No cost record for {} / {}; using {}",
                building_type,
                tier.label(),
                range.label
            ),
        );
        return (range.clone(), CostDataOrigin::CategoryDefault, None);
    }

    let range = embedded::fallback_range();
    notes.warn(
        "cost_data",
        format!(
            "Unknown building type '{}'; using {}",
            building_type, range.label
        ),
    );
    (range, CostDataOrigin::Fallback, None)
}

/// Resolves cost data through the data store, then the embedded tables
pub struct CostDataResolver<'a> {
    source: &'a dyn CostDataSource,
}

impl<'a> CostDataResolver<'a> {
    pub fn new(source: &'a dyn CostDataSource) -> Self {
        Self { source }
    }

    /// The single async step before the pure pipeline
    pub async fn resolve(&self, input: &ProjectInput) -> ResolvedData {
        let building_type = canonical_building_type(&input.building_type);
        if building_type != input.building_type.trim() {
            tracing::debug!(
                from = %input.building_type,
                to = %building_type,
                "Remapped legacy building type"
            );
        }
        let tier = input.tier();
        let mut notes = CalcNotes::new();

        let (range, origin, embedded_engineering) =
            match self.source.cost_range(&building_type, tier).await {
                Some(range) => (range, CostDataOrigin::Source, None),
                None => resolve_embedded(&building_type, &input.building_use, tier, &mut notes),
            };

        let engineering = match self.source.engineering_shares(&building_type, tier).await {
            Some(shares) => Some(shares),
            None => embedded_engineering,
        };

        let category_multiplier = match self.source.category_multiplier(input.category).await {
            Some(m) if m.is_finite() && m > 0.0 => m,
            Some(m) => {
                notes.warn(
                    "cost_data",
                    format!("Ignoring invalid category multiplier {} from data store", m),
                );
                default_category_multiplier(input.category)
            }
            None => default_category_multiplier(input.category),
        };

        let rate_defaults = self.source.rate_defaults().await.unwrap_or_default();

        ResolvedData {
            building_type,
            tier,
            range,
            origin,
            engineering,
            category_multiplier,
            rate_defaults,
            notes: notes.into_vec(),
        }
    }
}
