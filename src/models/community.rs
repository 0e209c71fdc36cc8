//! Community configuration: the owner table and pool eligibility
//!
//! The owner table assigns each owner a participation percentage. The garage
//! and building pools only charge the owners listed in their eligibility
//! sets; the general pool always charges everyone.

use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ids::OwnerId;
use crate::error::{CuotasError, CuotasResult};

/// Maximum distance between the sum of all percentages and 100
pub const SHARE_SUM_TOLERANCE: Decimal = dec!(0.5);

/// A property owner and their participation percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Owner label ("Bajo", "1A", ...)
    pub id: OwnerId,
    /// Participation percentage (0-100)
    pub share_percent: Decimal,
    /// Optional human readable note (e.g. "garage unit")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Owner {
    /// Create a new owner
    pub fn new(id: impl Into<OwnerId>, share_percent: Decimal) -> Self {
        Self {
            id: id.into(),
            share_percent,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Owner table plus per-pool eligibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Display name of the community
    #[serde(default = "default_name")]
    pub name: String,

    /// Owners in display order
    pub owners: Vec<Owner>,

    /// Owners that share the garage pool in equal parts
    pub garage_eligible: BTreeSet<OwnerId>,

    /// Owners that share the building pool by renormalized percentage
    pub building_eligible: BTreeSet<OwnerId>,
}

fn default_name() -> String {
    "Comunidad de propietarios".to_string()
}

impl Default for CommunityConfig {
    /// The nine-owner table of the community: one garage unit, the ground
    /// floor and seven flats with a garage space each.
    fn default() -> Self {
        let owners = vec![
            Owner::new("Garaje", dec!(20.67)).with_description("garage unit"),
            Owner::new("Bajo", dec!(20.67)).with_description("ground floor"),
            Owner::new("1A", dec!(8.61)),
            Owner::new("1B", dec!(6.13)),
            Owner::new("1C", dec!(5.59)),
            Owner::new("2A", dec!(10.21)),
            Owner::new("2B", dec!(9.91)),
            Owner::new("3A", dec!(9.32)),
            Owner::new("3B", dec!(8.89)),
        ];

        let flats = ["1A", "1B", "1C", "2A", "2B", "3A", "3B"];
        let garage_eligible = flats.iter().map(|id| OwnerId::from(*id)).collect();
        let building_eligible = owners
            .iter()
            .filter(|o| o.id.as_str() != "Garaje")
            .map(|o| o.id.clone())
            .collect();

        Self {
            name: default_name(),
            owners,
            garage_eligible,
            building_eligible,
        }
    }
}

impl CommunityConfig {
    /// Check the table is usable by the allocation engine
    ///
    /// Fails with `Configuration` on: no owners, empty or repeated ids,
    /// negative percentages, percentages not summing to 100 within
    /// `SHARE_SUM_TOLERANCE`, empty eligibility sets, eligibility entries
    /// naming unknown owners, or a zero building base.
    pub fn validate(&self) -> CuotasResult<()> {
        if self.owners.is_empty() {
            return Err(CuotasError::Configuration(
                "the owner table is empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for owner in &self.owners {
            if owner.id.as_str().trim().is_empty() {
                return Err(CuotasError::Configuration(
                    "owner ids cannot be empty".into(),
                ));
            }
            if !seen.insert(&owner.id) {
                return Err(CuotasError::Configuration(format!(
                    "owner '{}' appears more than once",
                    owner.id
                )));
            }
            if owner.share_percent.is_sign_negative() && !owner.share_percent.is_zero() {
                return Err(CuotasError::Configuration(format!(
                    "owner '{}' has a negative share: {}",
                    owner.id, owner.share_percent
                )));
            }
        }

        let total = self.total_percent();
        if (total - Decimal::ONE_HUNDRED).abs() > SHARE_SUM_TOLERANCE {
            return Err(CuotasError::Configuration(format!(
                "owner percentages sum to {}, expected 100 (±{})",
                total, SHARE_SUM_TOLERANCE
            )));
        }

        for (pool, set) in [
            ("garage", &self.garage_eligible),
            ("building", &self.building_eligible),
        ] {
            if set.is_empty() {
                return Err(CuotasError::Configuration(format!(
                    "no owner is eligible for the {} pool",
                    pool
                )));
            }
            if let Some(unknown) = set.iter().find(|id| !seen.contains(id)) {
                return Err(CuotasError::Configuration(format!(
                    "{} pool lists unknown owner '{}'",
                    pool, unknown
                )));
            }
        }

        if self.building_base().is_zero() {
            return Err(CuotasError::Configuration(
                "owners eligible for the building pool hold a 0% share".into(),
            ));
        }

        Ok(())
    }

    /// Look up an owner by id
    pub fn owner(&self, id: &OwnerId) -> Option<&Owner> {
        self.owners.iter().find(|o| &o.id == id)
    }

    /// Find an owner by id, ignoring case
    pub fn find_owner(&self, label: &str) -> Option<&Owner> {
        self.owners
            .iter()
            .find(|o| o.id.as_str().eq_ignore_ascii_case(label.trim()))
    }

    /// Sum of every owner's percentage
    pub fn total_percent(&self) -> Decimal {
        self.owners.iter().map(|o| o.share_percent).sum()
    }

    /// Whether the owner shares the garage pool
    pub fn is_garage_eligible(&self, id: &OwnerId) -> bool {
        self.garage_eligible.contains(id)
    }

    /// Whether the owner shares the building pool
    pub fn is_building_eligible(&self, id: &OwnerId) -> bool {
        self.building_eligible.contains(id)
    }

    /// Sum of the percentages of building-eligible owners
    ///
    /// With the default table this is 100 - 20.67 = 79.33.
    pub fn building_base(&self) -> Decimal {
        self.owners
            .iter()
            .filter(|o| self.is_building_eligible(&o.id))
            .map(|o| o.share_percent)
            .sum()
    }

    /// An owner's percentage of the building pool, or `None` if not eligible
    pub fn adjusted_building_percent(&self, id: &OwnerId) -> Option<Decimal> {
        let owner = self.owner(id)?;
        if !self.is_building_eligible(id) {
            return None;
        }
        let base = self.building_base();
        if base.is_zero() {
            return None;
        }
        Some(owner.share_percent * Decimal::ONE_HUNDRED / base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> CommunityConfig {
        CommunityConfig {
            name: "Test".into(),
            owners: vec![
                Owner::new("P", dec!(50)),
                Owner::new("A", dec!(30)),
                Owner::new("B", dec!(20)),
            ],
            garage_eligible: [OwnerId::from("A"), OwnerId::from("B")].into_iter().collect(),
            building_eligible: [OwnerId::from("A"), OwnerId::from("B")].into_iter().collect(),
        }
    }

    #[test]
    fn test_default_table_is_valid() {
        let config = CommunityConfig::default();
        config.validate().unwrap();
        assert_eq!(config.owners.len(), 9);
        assert_eq!(config.total_percent(), dec!(100.00));
        assert_eq!(config.garage_eligible.len(), 7);
        assert_eq!(config.building_eligible.len(), 8);
        assert_eq!(config.building_base(), dec!(79.33));
    }

    #[test]
    fn test_default_eligibility() {
        let config = CommunityConfig::default();
        let bajo = OwnerId::from("Bajo");
        let garaje = OwnerId::from("Garaje");
        assert!(!config.is_garage_eligible(&bajo));
        assert!(config.is_building_eligible(&bajo));
        assert!(!config.is_garage_eligible(&garaje));
        assert!(!config.is_building_eligible(&garaje));
        assert!(config.is_garage_eligible(&OwnerId::from("3B")));
    }

    #[test]
    fn test_adjusted_building_percent() {
        let config = small_config();
        assert_eq!(config.adjusted_building_percent(&"A".into()), Some(dec!(60)));
        assert_eq!(config.adjusted_building_percent(&"B".into()), Some(dec!(40)));
        assert_eq!(config.adjusted_building_percent(&"P".into()), None);
        assert_eq!(config.adjusted_building_percent(&"Z".into()), None);
    }

    #[test]
    fn test_percentages_must_sum_to_100() {
        let mut config = small_config();
        config.owners[0].share_percent = dec!(49.6);
        config.validate().unwrap();

        config.owners[0].share_percent = dec!(49);
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("sum to 99"));
    }

    #[test]
    fn test_duplicate_owner_rejected() {
        let mut config = small_config();
        config.owners.push(Owner::new("A", dec!(0)));
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_negative_share_rejected() {
        let mut config = small_config();
        config.owners[1].share_percent = dec!(-30);
        config.owners[0].share_percent = dec!(110);
        assert!(config.validate().unwrap_err().to_string().contains("negative"));
    }

    #[test]
    fn test_unknown_eligible_owner_rejected() {
        let mut config = small_config();
        config.garage_eligible.insert(OwnerId::from("Z"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown owner 'Z'"));
    }

    #[test]
    fn test_empty_eligibility_rejected() {
        let mut config = small_config();
        config.building_eligible.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_building_base_rejected() {
        let mut config = small_config();
        config.owners = vec![
            Owner::new("P", dec!(100)),
            Owner::new("A", dec!(0)),
            Owner::new("B", dec!(0)),
        ];
        assert!(config.validate().unwrap_err().to_string().contains("0%"));
    }

    #[test]
    fn test_find_owner_ignores_case() {
        let config = CommunityConfig::default();
        assert_eq!(config.find_owner("bajo").unwrap().id.as_str(), "Bajo");
        assert!(config.find_owner("4C").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CommunityConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: CommunityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
