//! Built-in construction cost tables
//!
//! Used whenever the data store has no row for a building type and tier.
//! All values are $/ft² (min / target / max) before the historic multiplier.
//!
//! Lookup order:
//! 1. Exact record for (building type, tier)
//! 2. Category default for the building's category
//! 3. "Mid-Range Standard Residential"

use super::BuildingCategory;
use archfee_types::{CategoryShares, CostBand, CostRange, EngineeringShares, RemodelBands, Tier};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Exact-match record
#[derive(Debug, Clone)]
pub struct EmbeddedRecord {
    pub range: CostRange,
    pub engineering: Option<EngineeringShares>,
}

type Band = (f64, f64, f64);

fn band((min, target, max): Band) -> CostBand {
    CostBand::new(min, target, max)
}

fn range(label: &str, tier: Tier, shell: Band, interior: Band, landscape: Band) -> CostRange {
    CostRange {
        label: label.to_string(),
        tier,
        shell: band(shell),
        interior: band(interior),
        landscape: band(landscape),
        remodel: None,
        shares: None,
    }
}

fn engineering(values: [f64; 6]) -> EngineeringShares {
    let [structural, civil, mechanical, electrical, plumbing, telecom] = values;
    EngineeringShares {
        structural,
        civil,
        mechanical,
        electrical,
        plumbing,
        telecom,
    }
}

static EXACT: Lazy<HashMap<(&'static str, Tier), EmbeddedRecord>> = Lazy::new(|| {
    let mut m = HashMap::new();
    let mut insert = |key: &'static str, tier: Tier, range: CostRange, eng: Option<[f64; 6]>| {
        m.insert(
            (key, tier),
            EmbeddedRecord {
                range,
                engineering: eng.map(engineering),
            },
        );
    };

    // Custom houses - remodel bands tracked separately for the mid tier
    insert(
        "Custom Houses",
        Tier::Low,
        range(
            "Custom Houses / Low",
            Tier::Low,
            (180.0, 210.0, 240.0),
            (60.0, 75.0, 90.0),
            (15.0, 20.0, 25.0),
        ),
        None,
    );
    let mut custom_mid = range(
        "Custom Houses / Mid",
        Tier::Mid,
        (250.0, 300.0, 350.0),
        (90.0, 115.0, 140.0),
        (25.0, 32.0, 40.0),
    );
    custom_mid.remodel = Some(RemodelBands {
        shell: band((200.0, 240.0, 280.0)),
        interior: band((80.0, 100.0, 120.0)),
        landscape: band((15.0, 20.0, 25.0)),
    });
    insert("Custom Houses", Tier::Mid, custom_mid, None);
    insert(
        "Custom Houses",
        Tier::High,
        range(
            "Custom Houses / High",
            Tier::High,
            (380.0, 450.0, 520.0),
            (150.0, 190.0, 230.0),
            (40.0, 55.0, 70.0),
        ),
        Some([0.16, 0.06, 0.11, 0.09, 0.06, 0.03]),
    );

    // Multi-family
    insert(
        "Multi-Family",
        Tier::Low,
        range(
            "Multi-Family / Low",
            Tier::Low,
            (150.0, 170.0, 190.0),
            (40.0, 50.0, 60.0),
            (8.0, 10.0, 12.0),
        ),
        None,
    );
    insert(
        "Multi-Family",
        Tier::Mid,
        range(
            "Multi-Family / Mid",
            Tier::Mid,
            (190.0, 220.0, 250.0),
            (55.0, 68.0, 80.0),
            (10.0, 14.0, 18.0),
        ),
        Some([0.14, 0.05, 0.10, 0.08, 0.07, 0.02]),
    );
    insert(
        "Multi-Family",
        Tier::High,
        range(
            "Multi-Family / High",
            Tier::High,
            (240.0, 280.0, 320.0),
            (75.0, 90.0, 105.0),
            (14.0, 19.0, 24.0),
        ),
        None,
    );

    // Commercial and institutional
    insert(
        "Office",
        Tier::Mid,
        range(
            "Office / Mid",
            Tier::Mid,
            (210.0, 245.0, 280.0),
            (70.0, 90.0, 110.0),
            (10.0, 14.0, 18.0),
        ),
        Some([0.14, 0.06, 0.12, 0.10, 0.05, 0.03]),
    );
    insert(
        "Retail",
        Tier::Mid,
        range(
            "Retail / Mid",
            Tier::Mid,
            (170.0, 200.0, 230.0),
            (60.0, 75.0, 90.0),
            (8.0, 11.0, 14.0),
        ),
        None,
    );
    insert(
        "Hotel",
        Tier::Mid,
        range(
            "Hotel / Mid",
            Tier::Mid,
            (260.0, 300.0, 340.0),
            (110.0, 135.0, 160.0),
            (20.0, 26.0, 32.0),
        ),
        Some([0.13, 0.05, 0.13, 0.10, 0.08, 0.03]),
    );
    insert(
        "School",
        Tier::Mid,
        range(
            "School / Mid",
            Tier::Mid,
            (240.0, 275.0, 310.0),
            (60.0, 75.0, 90.0),
            (18.0, 24.0, 30.0),
        ),
        None,
    );

    m
});

static CATEGORY_DEFAULTS: Lazy<HashMap<BuildingCategory, CostRange>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        BuildingCategory::Residential,
        range(
            "Residential Default",
            Tier::Mid,
            (220.0, 260.0, 300.0),
            (75.0, 95.0, 115.0),
            (18.0, 24.0, 30.0),
        ),
    );
    m.insert(
        BuildingCategory::Commercial,
        range(
            "Commercial Default",
            Tier::Mid,
            (190.0, 225.0, 260.0),
            (65.0, 82.0, 100.0),
            (9.0, 12.0, 15.0),
        ),
    );
    m.insert(
        BuildingCategory::Hospitality,
        range(
            "Hospitality Default",
            Tier::Mid,
            (250.0, 290.0, 330.0),
            (100.0, 125.0, 150.0),
            (18.0, 24.0, 30.0),
        ),
    );
    m.insert(
        BuildingCategory::Institutional,
        range(
            "Institutional Default",
            Tier::Mid,
            (230.0, 265.0, 300.0),
            (60.0, 75.0, 90.0),
            (16.0, 22.0, 28.0),
        ),
    );
    m.insert(
        BuildingCategory::Industrial,
        range(
            "Industrial Default",
            Tier::Mid,
            (120.0, 145.0, 170.0),
            (25.0, 35.0, 45.0),
            (6.0, 9.0, 12.0),
        ),
    );
    m
});

/// Exact record for a canonical building type and tier
pub fn exact_record(building_type: &str, tier: Tier) -> Option<&'static EmbeddedRecord> {
    EXACT
        .iter()
        .find(|((key, t), _)| *t == tier && key.eq_ignore_ascii_case(building_type))
        .map(|(_, record)| record)
}

pub fn category_default(category: BuildingCategory) -> Option<&'static CostRange> {
    CATEGORY_DEFAULTS.get(&category)
}

/// Last-resort range: "Mid-Range Standard Residential", tier 2
pub fn fallback_range() -> CostRange {
    CostRange {
        label: "Mid-Range Standard Residential".to_string(),
        tier: Tier::Mid,
        shell: band((200.0, 240.0, 280.0)),
        interior: band((70.0, 90.0, 110.0)),
        landscape: band((15.0, 20.0, 25.0)),
        remodel: None,
        shares: Some(CategoryShares {
            shell: 0.70,
            interior: 0.22,
            landscape: 0.08,
        }),
    }
}

/// Hardcoded engineering shares by tier (last step of the share chain)
pub fn tier_engineering_defaults(tier: Tier) -> EngineeringShares {
    match tier {
        Tier::Low => engineering([0.10, 0.04, 0.07, 0.06, 0.04, 0.01]),
        Tier::Mid => engineering([0.12, 0.05, 0.09, 0.07, 0.05, 0.02]),
        Tier::High => engineering([0.15, 0.06, 0.11, 0.09, 0.06, 0.03]),
    }
}
