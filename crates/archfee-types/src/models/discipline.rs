//! Disciplines, fee scopes and staff roles

use serde::{Deserialize, Serialize};

/// One professional service line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Architecture,
    Interior,
    Landscape,
    Structural,
    Civil,
    Mechanical,
    Electrical,
    Plumbing,
    Telecom,
}

impl Discipline {
    /// The six engineering disciplines carved out of the shell budget
    pub const ENGINEERING: [Discipline; 6] = [
        Discipline::Structural,
        Discipline::Civil,
        Discipline::Mechanical,
        Discipline::Electrical,
        Discipline::Plumbing,
        Discipline::Telecom,
    ];

    /// Every discipline in reporting order
    pub const ALL: [Discipline; 9] = [
        Discipline::Architecture,
        Discipline::Interior,
        Discipline::Landscape,
        Discipline::Structural,
        Discipline::Civil,
        Discipline::Mechanical,
        Discipline::Electrical,
        Discipline::Plumbing,
        Discipline::Telecom,
    ];

    pub fn is_engineering(self) -> bool {
        !matches!(
            self,
            Discipline::Architecture | Discipline::Interior | Discipline::Landscape
        )
    }

    /// Design disciplines get the remodel complexity boost on their fee percentage
    pub fn receives_complexity_boost(self) -> bool {
        !self.is_engineering()
    }

    /// Disciplines performed by the firm unless the input says otherwise
    pub fn in_house_by_default(self) -> bool {
        !self.is_engineering()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Architecture => "Architecture",
            Self::Interior => "Interior Design",
            Self::Landscape => "Landscape",
            Self::Structural => "Structural",
            Self::Civil => "Civil",
            Self::Mechanical => "Mechanical",
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Telecom => "Telecom",
        }
    }
}

/// Percentages of the shell budget assigned to each engineering discipline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineeringShares {
    pub structural: f64,
    pub civil: f64,
    pub mechanical: f64,
    pub electrical: f64,
    pub plumbing: f64,
    pub telecom: f64,
}

impl EngineeringShares {
    pub fn get(&self, discipline: Discipline) -> Option<f64> {
        match discipline {
            Discipline::Structural => Some(self.structural),
            Discipline::Civil => Some(self.civil),
            Discipline::Mechanical => Some(self.mechanical),
            Discipline::Electrical => Some(self.electrical),
            Discipline::Plumbing => Some(self.plumbing),
            Discipline::Telecom => Some(self.telecom),
            _ => None,
        }
    }

    pub fn set(&mut self, discipline: Discipline, value: f64) {
        match discipline {
            Discipline::Structural => self.structural = value,
            Discipline::Civil => self.civil = value,
            Discipline::Mechanical => self.mechanical = value,
            Discipline::Electrical => self.electrical = value,
            Discipline::Plumbing => self.plumbing = value,
            Discipline::Telecom => self.telecom = value,
            _ => {}
        }
    }

    pub fn sum(&self) -> f64 {
        self.structural + self.civil + self.mechanical + self.electrical + self.plumbing + self.telecom
    }

    /// Multiply every share by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            structural: self.structural * factor,
            civil: self.civil * factor,
            mechanical: self.mechanical * factor,
            electrical: self.electrical * factor,
            plumbing: self.plumbing * factor,
            telecom: self.telecom * factor,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Discipline, f64)> + '_ {
        Discipline::ENGINEERING
            .iter()
            .filter_map(move |&d| self.get(d).map(|v| (d, v)))
    }
}

/// User overrides for engineering shares (unset fields fall back to data)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineeringOverrides {
    pub structural: Option<f64>,
    pub civil: Option<f64>,
    pub mechanical: Option<f64>,
    pub electrical: Option<f64>,
    pub plumbing: Option<f64>,
    pub telecom: Option<f64>,
}

impl EngineeringOverrides {
    pub fn get(&self, discipline: Discipline) -> Option<f64> {
        match discipline {
            Discipline::Structural => self.structural,
            Discipline::Civil => self.civil,
            Discipline::Mechanical => self.mechanical,
            Discipline::Electrical => self.electrical,
            Discipline::Plumbing => self.plumbing,
            Discipline::Telecom => self.telecom,
            _ => None,
        }
    }

    /// Engineering disciplines without an override, in reporting order
    pub fn unset(&self) -> Vec<Discipline> {
        Discipline::ENGINEERING
            .iter()
            .copied()
            .filter(|&d| self.get(d).is_none())
            .collect()
    }
}

/// One row of the top-down fee table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeScope {
    /// Scan-to-BIM of the existing building
    BuildingScan,
    /// Scan-to-BIM of the site
    SiteScan,
    Discipline(Discipline),
}

impl FeeScope {
    pub fn label(self) -> &'static str {
        match self {
            Self::BuildingScan => "Building Scan",
            Self::SiteScan => "Site Scan",
            Self::Discipline(d) => d.label(),
        }
    }

    pub fn discipline(self) -> Option<Discipline> {
        match self {
            Self::Discipline(d) => Some(d),
            _ => None,
        }
    }
}

/// Staff roles used by the leverage tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Designer1,
    Designer2,
    Architect,
    Engineer,
    Principal,
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Designer1,
        Role::Designer2,
        Role::Architect,
        Role::Engineer,
        Role::Principal,
        Role::Admin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Designer1 => "Designer 1",
            Self::Designer2 => "Designer 2",
            Self::Architect => "Architect",
            Self::Engineer => "Engineer",
            Self::Principal => "Principal",
            Self::Admin => "Admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engineering_split() {
        assert!(!Discipline::Architecture.is_engineering());
        assert!(Discipline::Telecom.is_engineering());
        assert_eq!(
            Discipline::ALL.iter().filter(|d| d.is_engineering()).count(),
            Discipline::ENGINEERING.len()
        );
    }

    #[test]
    fn test_shares_sum_and_scale() {
        let shares = EngineeringShares {
            structural: 0.4,
            civil: 0.1,
            mechanical: 0.2,
            electrical: 0.1,
            plumbing: 0.1,
            telecom: 0.1,
        };
        assert!((shares.sum() - 1.0).abs() < 1e-12);
        assert!((shares.scaled(0.5).sum() - 0.5).abs() < 1e-12);
        assert_eq!(shares.get(Discipline::Architecture), None);
    }

    #[test]
    fn test_unset_overrides() {
        let overrides = EngineeringOverrides {
            structural: Some(0.3),
            telecom: Some(0.02),
            ..Default::default()
        };
        assert_eq!(
            overrides.unset(),
            vec![
                Discipline::Civil,
                Discipline::Mechanical,
                Discipline::Electrical,
                Discipline::Plumbing
            ]
        );
    }

    #[test]
    fn test_role_keys_serialize_as_strings() {
        let mut rates = std::collections::BTreeMap::new();
        rates.insert(Role::Principal, 250.0);
        let json = serde_json::to_string(&rates).unwrap();
        assert_eq!(json, r#"{"principal":250.0}"#);
    }
}
