//! Allocation engine
//!
//! Distributes a list of expense items among the owners of the community.
//! Each item is classified into a pool, and each pool has its own rule:
//!
//! - General: every owner pays `share_percent / 100` of each item.
//! - Garage: garage-eligible owners split each item in equal parts.
//! - Building: building-eligible owners pay their percentage renormalized
//!   over the percentages of the eligible owners only.
//!
//! Shares are computed per item, and pool subtotals are the sum of those
//! item shares, so the line detail of an owner always adds up to the
//! subtotal shown for that pool.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::error::{CuotasError, CuotasResult};
use crate::models::{
    AllocatedTotals, AllocationReport, Amount, CommunityConfig, ExpenseItem, LineBreakdown, LineShare, Owner,
    OwnerAllocation, Pool, PoolTotals, Reconciliation, MONTHS_PER_YEAR,
};

/// Accepted rounding drift per owner when reconciling totals
const TOLERANCE_PER_OWNER: Decimal = dec!(0.01);

/// Expense items partitioned by pool
#[derive(Debug, Default)]
struct Partition<'a> {
    general: Vec<&'a ExpenseItem>,
    garage: Vec<&'a ExpenseItem>,
    building: Vec<&'a ExpenseItem>,
}

impl<'a> Partition<'a> {
    fn push(&mut self, pool: Pool, item: &'a ExpenseItem) {
        match pool {
            Pool::General => self.general.push(item),
            Pool::Garage => self.garage.push(item),
            Pool::Building => self.building.push(item),
        }
    }
}

/// Computes owner allocations for a validated community configuration
///
/// The engine only holds immutable configuration, so it can be shared
/// between threads and called any number of times.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    config: CommunityConfig,
}

impl AllocationEngine {
    /// Create an engine, validating the configuration once
    pub fn new(config: CommunityConfig) -> CuotasResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &CommunityConfig {
        &self.config
    }

    /// Allocate the items among all owners
    ///
    /// Fails with `NoValidData` when `items` is empty and with `InvalidInput`
    /// when an amount is negative or too large to be split.
    pub fn allocate(&self, items: &[ExpenseItem]) -> CuotasResult<AllocationReport> {
        if items.is_empty() {
            return Err(CuotasError::NoValidData { skipped: 0 });
        }

        if let Some(item) = items.iter().find(|i| i.amount.is_negative()) {
            return Err(CuotasError::InvalidInput(format!(
                "amount for '{}' is negative: {}",
                item.concept,
                item.amount.value()
            )));
        }

        let mut pools = PoolTotals::default();
        let mut partition = Partition::default();
        for item in items {
            let pool = item.pool();
            let totals = pools.get_mut(pool);
            totals.total = totals
                .total
                .checked_add(item.amount)
                .ok_or_else(|| too_large(&format!("{} pool total", pool)))?;
            totals.item_count += 1;
            partition.push(pool, item);
        }

        debug!(
            general = pools.general.item_count,
            garage = pools.garage.item_count,
            building = pools.building.item_count,
            "partitioned expense items"
        );

        let allocations = self
            .config
            .owners
            .iter()
            .map(|owner| self.allocate_owner(owner, &partition))
            .collect::<CuotasResult<Vec<_>>>()?;

        let expected = pools.grand_total()?;
        let totals = AllocatedTotals::from_allocations(&allocations)?;
        let allocated = totals.annual;
        let tolerance =
            Amount::new(TOLERANCE_PER_OWNER * Decimal::from(self.config.owners.len() as u64));
        let reconciliation = Reconciliation::new(expected, allocated, tolerance);

        if !reconciliation.is_balanced() {
            warn!(
                expected = %expected.value(),
                allocated = %allocated.value(),
                "allocated total does not match the sum of expenses"
            );
        }

        Ok(AllocationReport {
            pools,
            allocations,
            totals,
            reconciliation,
        })
    }

    fn allocate_owner(
        &self,
        owner: &Owner,
        partition: &Partition<'_>,
    ) -> CuotasResult<OwnerAllocation> {
        let general = shares(&partition.general, |amount| {
            split(amount, owner.share_percent, Decimal::ONE_HUNDRED)
        })?;

        let garage = if self.config.is_garage_eligible(&owner.id) {
            let parts = Decimal::from(self.config.garage_eligible.len() as u64);
            shares(&partition.garage, |amount| split(amount, Decimal::ONE, parts))?
        } else {
            Vec::new()
        };

        let building_percent = self.config.adjusted_building_percent(&owner.id);
        let building = if building_percent.is_some() {
            let base = self.config.building_base();
            shares(&partition.building, |amount| {
                split(amount, owner.share_percent, base)
            })?
        } else {
            Vec::new()
        };

        let general_share = subtotal(&general, owner)?;
        let garage_share = subtotal(&garage, owner)?;
        let building_share = subtotal(&building, owner)?;
        let annual_total = Amount::checked_sum([general_share, garage_share, building_share])
            .ok_or_else(|| too_large(&format!("annual total for owner {}", owner.id)))?;
        let monthly_total = Amount::new(annual_total.value() / Decimal::from(MONTHS_PER_YEAR));

        Ok(OwnerAllocation {
            owner: owner.id.clone(),
            share_percent: owner.share_percent,
            building_percent,
            general_share,
            garage_share,
            building_share,
            annual_total,
            monthly_total,
            breakdown: LineBreakdown {
                general,
                garage,
                building,
            },
        })
    }
}

/// Apply a per-item rule to every item of a pool
fn shares<F>(items: &[&ExpenseItem], rule: F) -> CuotasResult<Vec<LineShare>>
where
    F: Fn(Decimal) -> CuotasResult<Decimal>,
{
    items
        .iter()
        .map(|item| {
            Ok(LineShare {
                concept: item.concept.clone(),
                amount: Amount::new(rule(item.amount.value())?),
            })
        })
        .collect()
}

/// `amount * numerator / denominator`, multiplying first to keep precision
fn split(amount: Decimal, numerator: Decimal, denominator: Decimal) -> CuotasResult<Decimal> {
    amount
        .checked_mul(numerator)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| CuotasError::InvalidInput(format!("amount {} is too large to split", amount)))
}

/// Sum of an owner's lines in one pool
fn subtotal(lines: &[LineShare], owner: &Owner) -> CuotasResult<Amount> {
    Amount::checked_sum(lines.iter().map(|l| l.amount))
        .ok_or_else(|| too_large(&format!("pool total for owner {}", owner.id)))
}

fn too_large(what: &str) -> CuotasError {
    CuotasError::InvalidInput(format!("{} is too large", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;

    fn item(concept: &str, amount: Decimal) -> ExpenseItem {
        ExpenseItem::new(concept, Amount::new(amount))
    }

    fn scenario() -> Vec<ExpenseItem> {
        vec![
            item("Administrador", dec!(494.40)),
            item("Energía eléctrica garajes", dec!(400)),
            item("Limpieza edificio", dec!(250)),
        ]
    }

    fn default_engine() -> AllocationEngine {
        AllocationEngine::new(CommunityConfig::default()).unwrap()
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        let diff = (actual - expected).abs();
        assert!(
            diff < dec!(0.000000000001),
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_bajo_scenario() {
        let report = default_engine().allocate(&scenario()).unwrap();
        let bajo = report.allocation_for(&OwnerId::from("Bajo")).unwrap();

        assert_eq!(bajo.general_share.value(), dec!(0.2067) * dec!(494.40));
        assert!(bajo.garage_share.is_zero());
        assert!(bajo.breakdown.garage.is_empty());
        assert_close(
            bajo.building_share.value(),
            dec!(0.2067) / (dec!(1) - dec!(0.2067)) * dec!(250),
        );
        assert_close(
            bajo.annual_total.value(),
            bajo.general_share.value() + bajo.building_share.value(),
        );
    }

    #[test]
    fn test_totals_reconcile() {
        let report = default_engine().allocate(&scenario()).unwrap();
        assert_eq!(report.grand_total().value(), dec!(1144.40));
        assert!(report.reconciliation.is_balanced());
        assert_close(report.reconciliation.allocated.value(), dec!(1144.40));
        assert_close(report.allocated_from(Pool::General).value(), dec!(494.40));
        assert_close(report.allocated_from(Pool::Garage).value(), dec!(400));
        assert_close(report.allocated_from(Pool::Building).value(), dec!(250));
    }

    #[test]
    fn test_garage_pseudo_owner_pays_only_general() {
        let report = default_engine().allocate(&scenario()).unwrap();
        let garaje = report.allocation_for(&OwnerId::from("Garaje")).unwrap();

        assert!(garaje.garage_share.is_zero());
        assert!(garaje.building_share.is_zero());
        assert!(garaje.breakdown.garage.is_empty());
        assert!(garaje.breakdown.building.is_empty());
        assert_eq!(garaje.building_percent, None);
        assert_eq!(garaje.general_share.value(), dec!(494.40) * dec!(20.67) / dec!(100));
    }

    #[test]
    fn test_garage_pool_split_in_seven_equal_parts() {
        let report = default_engine().allocate(&scenario()).unwrap();
        let expected = dec!(400) / dec!(7);
        for id in ["1A", "1B", "1C", "2A", "2B", "3A", "3B"] {
            let allocation = report.allocation_for(&OwnerId::from(id)).unwrap();
            assert_eq!(allocation.garage_share.value(), expected);
            assert_eq!(allocation.breakdown.garage.len(), 1);
        }
    }

    #[test]
    fn test_monthly_is_annual_over_twelve() {
        let report = default_engine().allocate(&scenario()).unwrap();
        for allocation in &report.allocations {
            assert_eq!(
                allocation.monthly_total.value(),
                allocation.annual_total.value() / dec!(12)
            );
        }
    }

    #[test]
    fn test_line_breakdown_sums_to_pool_share() {
        let items = vec![
            item("Administrador", dec!(494.40)),
            item("Agua", dec!(200)),
            item("Energía eléctrica garajes", dec!(400)),
            item("Tasas municipales garaje", dec!(150)),
            item("Limpieza edificio", dec!(250)),
            item("Energía eléctrica edificio", dec!(600)),
        ];
        let report = default_engine().allocate(&items).unwrap();

        for allocation in &report.allocations {
            for pool in Pool::ALL {
                let lines =
                    Amount::checked_sum(allocation.breakdown.lines(pool).iter().map(|l| l.amount));
                assert_eq!(lines, Some(allocation.pool_share(pool)));
            }
        }
    }

    #[test]
    fn test_allocations_follow_owner_table_order() {
        let report = default_engine().allocate(&scenario()).unwrap();
        let ids: Vec<&str> = report.allocations.iter().map(|a| a.owner.as_str()).collect();
        assert_eq!(ids, ["Garaje", "Bajo", "1A", "1B", "1C", "2A", "2B", "3A", "3B"]);
    }

    #[test]
    fn test_synthetic_three_owner_config() {
        let config = CommunityConfig {
            name: "Mini".into(),
            owners: vec![
                Owner::new("P", dec!(50)),
                Owner::new("A", dec!(30)),
                Owner::new("B", dec!(20)),
            ],
            garage_eligible: [OwnerId::from("A"), OwnerId::from("B")].into_iter().collect(),
            building_eligible: [OwnerId::from("A"), OwnerId::from("B")].into_iter().collect(),
        };
        let engine = AllocationEngine::new(config).unwrap();
        let report = engine
            .allocate(&[
                item("Seguro", dec!(100)),
                item("Puerta garaje", dec!(10)),
                item("Pintura edificio", dec!(50)),
            ])
            .unwrap();

        let p = report.allocation_for(&OwnerId::from("P")).unwrap();
        assert_eq!(p.annual_total.value(), dec!(50));

        let a = report.allocation_for(&OwnerId::from("A")).unwrap();
        assert_eq!(a.general_share.value(), dec!(30));
        assert_eq!(a.garage_share.value(), dec!(5));
        assert_eq!(a.building_share.value(), dec!(30));
        assert_eq!(a.building_percent, Some(dec!(60)));

        let b = report.allocation_for(&OwnerId::from("B")).unwrap();
        assert_eq!(b.annual_total.value(), dec!(20) + dec!(5) + dec!(20));

        assert_eq!(report.reconciliation.discrepancy.value(), dec!(0));
    }

    #[test]
    fn test_empty_pools_give_zero_shares() {
        let report = default_engine()
            .allocate(&[item("Administrador", dec!(100))])
            .unwrap();
        let flat = report.allocation_for(&OwnerId::from("1A")).unwrap();
        assert!(flat.garage_share.is_zero());
        assert!(flat.building_share.is_zero());
        assert!(flat.breakdown.garage.is_empty());
        assert_eq!(report.pools.garage.item_count, 0);
    }

    #[test]
    fn test_zero_amounts_compute_to_zero() {
        let report = default_engine()
            .allocate(&[item("Gastos varios", dec!(0))])
            .unwrap();
        assert!(report.allocations.iter().all(|a| a.annual_total.is_zero()));
        assert!(report.reconciliation.is_balanced());
    }

    #[test]
    fn test_empty_input_is_no_valid_data() {
        let err = default_engine().allocate(&[]).unwrap_err();
        assert!(err.is_no_valid_data());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = default_engine()
            .allocate(&[item("Agua", dec!(200)), item("Devolución", dec!(-20))])
            .unwrap_err();
        assert!(matches!(err, CuotasError::InvalidInput(_)));
        assert!(err.to_string().contains("Devolución"));
    }

    #[test]
    fn test_oversized_amount_rejected() {
        let err = default_engine()
            .allocate(&[item("Agua", Decimal::MAX)])
            .unwrap_err();
        assert!(matches!(err, CuotasError::InvalidInput(_)));
    }

    #[test]
    fn test_pools_that_overflow_together_are_rejected() {
        // Each pool total fits on its own, their sum does not.
        let err = default_engine()
            .allocate(&[
                item("Puerta garaje", Decimal::MAX),
                item("Agua", dec!(3000000000000000000000000000)),
            ])
            .unwrap_err();
        assert!(matches!(err, CuotasError::InvalidInput(_)));
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_same_pool_overflow_is_rejected() {
        let err = default_engine()
            .allocate(&[
                item("Puerta garaje", Decimal::MAX),
                item("Tasas garaje", dec!(1)),
            ])
            .unwrap_err();
        assert!(matches!(err, CuotasError::InvalidInput(_)));
        assert!(err.to_string().contains("Garage pool total"));
    }

    #[test]
    fn test_large_amounts_within_range_still_allocate() {
        let big = Decimal::MAX / dec!(4);
        let report = default_engine()
            .allocate(&[item("Puerta garaje", big), item("Tasas garaje", big)])
            .unwrap();
        assert_eq!(report.grand_total().value(), big * dec!(2));
        let flat = report.allocation_for(&OwnerId::from("1A")).unwrap();
        assert_eq!(flat.annual_total, flat.garage_share);
        assert_eq!(report.totals.annual, report.reconciliation.allocated);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = CommunityConfig::default();
        config.owners.pop();
        let err = AllocationEngine::new(config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unbalanced_table_is_reported() {
        let mut config = CommunityConfig::default();
        config.owners[0].share_percent = dec!(20.27);
        let engine = AllocationEngine::new(config).unwrap();

        let report = engine.allocate(&[item("Primas seguros", dec!(800))]).unwrap();
        assert!(!report.reconciliation.is_balanced());
        assert_eq!(report.reconciliation.discrepancy.value(), dec!(-3.2));
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = default_engine();
        let items = scenario();
        let expected = engine.allocate(&items).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.allocate(&items).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
