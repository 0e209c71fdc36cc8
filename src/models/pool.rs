//! Cost pools and the line-item classifier
//!
//! Every expense concept lands in exactly one pool. The pool decides which
//! allocation rule distributes its cost among owners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword that routes a concept to the garage pool
pub const GARAGE_KEYWORD: &str = "garaje";

/// Keyword that routes a concept to the building pool
pub const BUILDING_KEYWORD: &str = "edificio";

/// One of the three cost pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    /// Everything else: paid by every owner according to their share
    General,
    /// Garage costs: split in equal parts among owners with a garage space
    Garage,
    /// Building-only costs: paid by residential owners, shares renormalized
    Building,
}

impl Pool {
    /// All pools in display order
    pub const ALL: [Pool; 3] = [Pool::General, Pool::Garage, Pool::Building];

    /// Classify a concept by case-insensitive keyword match
    ///
    /// "garaje" is checked before "edificio", so a concept that mentions both
    /// is a garage cost.
    pub fn classify(concept: &str) -> Self {
        let lower = concept.to_lowercase();
        if lower.contains(GARAGE_KEYWORD) {
            Pool::Garage
        } else if lower.contains(BUILDING_KEYWORD) {
            Pool::Building
        } else {
            Pool::General
        }
    }

    /// Short description of the rule applied to this pool
    pub fn rule_description(&self) -> &'static str {
        match self {
            Pool::General => "all owners, by share",
            Pool::Garage => "garage owners, equal parts",
            Pool::Building => "residential owners, renormalized share",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::General => write!(f, "General"),
            Pool::Garage => write!(f, "Garage"),
            Pool::Building => write!(f, "Building"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(Pool::classify("Energía eléctrica garajes"), Pool::Garage);
        assert_eq!(Pool::classify("Limpieza edificio"), Pool::Building);
        assert_eq!(Pool::classify("Administrador"), Pool::General);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(Pool::classify("TASAS MUNICIPALES GARAJE"), Pool::Garage);
        assert_eq!(Pool::classify("Energía Eléctrica EDIFICIO"), Pool::Building);
    }

    #[test]
    fn test_garage_wins_over_building() {
        assert_eq!(Pool::classify("Limpieza edificio y garaje"), Pool::Garage);
        assert_eq!(Pool::classify("garaje del edificio"), Pool::Garage);
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        for concept in ["", " ", "Agua", "Primas seguros", "Garajes", "edificios"] {
            assert_eq!(Pool::classify(concept), Pool::classify(concept));
        }
        assert_eq!(Pool::classify(""), Pool::General);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Pool::Building).unwrap(), "\"building\"");
    }
}
