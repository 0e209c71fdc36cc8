//! Property-based tests for the allocation engine.
//!
//! - Conservation: owners are charged exactly what was spent.
//! - Exclusion: ineligible owners pay nothing from a pool.
//! - Equal split: garage owners all pay the same.
//! - Range: amounts near the decimal limits allocate or fail with
//!   `InvalidInput`, never panic.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::allocation::AllocationEngine;
use crate::error::CuotasError;
use crate::models::{Amount, CommunityConfig, ExpenseItem, OwnerId, Pool};

/// Strategy to generate amounts from 0.00 to 100,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate amounts anywhere in the decimal range, mostly huge.
fn huge_amount() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=4)
        .prop_map(|(lo, mid, hi, scale)| Decimal::from_parts(lo, mid, hi, false, scale))
}

/// Strategy to generate concepts that land in any of the three pools.
fn concept() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["Agua", "Ascensor", "Limpieza", "Luz", "Seguro"]),
        prop::sample::select(vec!["", " garaje", " edificio", " GARAJE edificio"]),
    )
        .prop_map(|(base, suffix)| format!("{}{}", base, suffix))
}

fn items() -> impl Strategy<Value = Vec<ExpenseItem>> {
    prop::collection::vec(
        (concept(), amount()).prop_map(|(c, a)| ExpenseItem::new(c, Amount::new(a))),
        1..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The sum of annual totals equals the sum of all amounts.
    #[test]
    fn prop_allocation_conserves_total(items in items()) {
        let engine = AllocationEngine::new(CommunityConfig::default()).unwrap();
        let report = engine.allocate(&items).unwrap();

        let spent: Decimal = items.iter().map(|i| i.amount.value()).sum();
        let charged: Decimal = report.allocations.iter().map(|a| a.annual_total.value()).sum();
        let tolerance = dec!(0.000001) * spent.max(Decimal::ONE);

        prop_assert!((spent - charged).abs() <= tolerance, "spent {} charged {}", spent, charged);
        prop_assert!(report.reconciliation.is_balanced());
    }

    /// The garage unit pays nothing from the garage and building pools, the
    /// ground floor nothing from the garage pool.
    #[test]
    fn prop_excluded_owners_pay_zero(items in items()) {
        let engine = AllocationEngine::new(CommunityConfig::default()).unwrap();
        let report = engine.allocate(&items).unwrap();

        let garaje = report.allocation_for(&OwnerId::from("Garaje")).unwrap();
        prop_assert!(garaje.garage_share.is_zero());
        prop_assert!(garaje.building_share.is_zero());
        prop_assert!(garaje.breakdown.building.is_empty());

        let bajo = report.allocation_for(&OwnerId::from("Bajo")).unwrap();
        prop_assert!(bajo.garage_share.is_zero());
        prop_assert!(bajo.breakdown.garage.is_empty());
    }

    /// Every garage owner pays the same seventh of the garage pool.
    #[test]
    fn prop_garage_owners_pay_equal_parts(items in items()) {
        let engine = AllocationEngine::new(CommunityConfig::default()).unwrap();
        let report = engine.allocate(&items).unwrap();

        let pool_total = report.pools.get(Pool::Garage).total.value();
        for id in &engine.config().garage_eligible {
            let share = report.allocation_for(id).unwrap().garage_share.value();
            prop_assert!((share - pool_total / dec!(7)).abs() < dec!(0.0000000001));
        }
    }

    /// Amounts near the decimal limits are rejected as invalid input when a
    /// share or a total cannot be represented.
    #[test]
    fn prop_huge_amounts_never_panic(
        items in prop::collection::vec(
            (concept(), huge_amount()).prop_map(|(c, a)| ExpenseItem::new(c, Amount::new(a))),
            1..6,
        )
    ) {
        let engine = AllocationEngine::new(CommunityConfig::default()).unwrap();
        match engine.allocate(&items) {
            Ok(report) => {
                prop_assert_eq!(report.totals.annual, report.reconciliation.allocated);
                prop_assert!(!report.grand_total().is_negative());
            }
            Err(err) => {
                prop_assert!(matches!(err, CuotasError::InvalidInput(_)), "unexpected error: {}", err);
            }
        }
    }

    /// Formatting an amount and reading it back gives the rounded amount.
    #[test]
    fn prop_locale_round_trip(value in amount()) {
        let original = Amount::new(value / dec!(3));
        let reparsed = Amount::parse_locale(&original.format_locale()).unwrap();
        prop_assert_eq!(reparsed, original.round_cents());
    }
}
