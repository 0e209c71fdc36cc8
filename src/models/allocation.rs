//! Allocation results
//!
//! The types produced by the allocation engine: what each owner pays from
//! each pool, line by line, and a reconciliation of the grand total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::OwnerId;
use super::money::Amount;
use super::pool::Pool;
use crate::error::{CuotasError, CuotasResult};

/// Number of monthly instalments in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// One owner's share of a single expense line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineShare {
    pub concept: String,
    pub amount: Amount,
}

/// Per-pool line detail for an owner
///
/// A pool the owner is not eligible for has an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub general: Vec<LineShare>,
    pub garage: Vec<LineShare>,
    pub building: Vec<LineShare>,
}

impl LineBreakdown {
    /// Lines charged from a given pool
    pub fn lines(&self, pool: Pool) -> &[LineShare] {
        match pool {
            Pool::General => &self.general,
            Pool::Garage => &self.garage,
            Pool::Building => &self.building,
        }
    }
}

/// What one owner pays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAllocation {
    pub owner: OwnerId,
    pub share_percent: Decimal,
    /// Percentage applied to the building pool, when eligible
    pub building_percent: Option<Decimal>,
    pub general_share: Amount,
    pub garage_share: Amount,
    pub building_share: Amount,
    pub annual_total: Amount,
    pub monthly_total: Amount,
    pub breakdown: LineBreakdown,
}

impl OwnerAllocation {
    /// Subtotal charged from a given pool
    pub fn pool_share(&self, pool: Pool) -> Amount {
        match pool {
            Pool::General => self.general_share,
            Pool::Garage => self.garage_share,
            Pool::Building => self.building_share,
        }
    }
}

/// Total and item count of one pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotal {
    pub total: Amount,
    pub item_count: usize,
}

/// Totals of the three pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals {
    pub general: PoolTotal,
    pub garage: PoolTotal,
    pub building: PoolTotal,
}

impl PoolTotals {
    /// Totals of a given pool
    pub fn get(&self, pool: Pool) -> &PoolTotal {
        match pool {
            Pool::General => &self.general,
            Pool::Garage => &self.garage,
            Pool::Building => &self.building,
        }
    }

    /// Mutable totals of a given pool
    pub fn get_mut(&mut self, pool: Pool) -> &mut PoolTotal {
        match pool {
            Pool::General => &mut self.general,
            Pool::Garage => &mut self.garage,
            Pool::Building => &mut self.building,
        }
    }

    /// Sum over all pools
    ///
    /// Fails with `InvalidInput` when the pools together exceed the decimal
    /// range.
    pub fn grand_total(&self) -> CuotasResult<Amount> {
        Amount::checked_sum(Pool::ALL.map(|pool| self.get(pool).total))
            .ok_or_else(|| CuotasError::InvalidInput("sum of all pools is too large".into()))
    }
}

/// Column totals of the owner allocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedTotals {
    pub general: Amount,
    pub garage: Amount,
    pub building: Amount,
    pub annual: Amount,
    pub monthly: Amount,
}

impl AllocatedTotals {
    /// Add up the allocations of every owner
    ///
    /// Fails with `InvalidInput` when a column exceeds the decimal range.
    pub fn from_allocations(allocations: &[OwnerAllocation]) -> CuotasResult<Self> {
        let column = |name: &str, f: fn(&OwnerAllocation) -> Amount| {
            Amount::checked_sum(allocations.iter().map(f)).ok_or_else(|| {
                CuotasError::InvalidInput(format!("{} total over all owners is too large", name))
            })
        };
        Ok(Self {
            general: column("general", |a| a.general_share)?,
            garage: column("garage", |a| a.garage_share)?,
            building: column("building", |a| a.building_share)?,
            annual: column("annual", |a| a.annual_total)?,
            monthly: column("monthly", |a| a.monthly_total)?,
        })
    }

    /// Total charged from a given pool
    pub fn pool(&self, pool: Pool) -> Amount {
        match pool {
            Pool::General => self.general,
            Pool::Garage => self.garage,
            Pool::Building => self.building,
        }
    }
}

/// Comparison between what was spent and what was charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Sum of all expense amounts
    pub expected: Amount,
    /// Sum of all owners' annual totals
    pub allocated: Amount,
    /// `allocated - expected`
    pub discrepancy: Amount,
    /// Largest accepted absolute discrepancy
    pub tolerance: Amount,
}

impl Reconciliation {
    /// Build a reconciliation record
    pub fn new(expected: Amount, allocated: Amount, tolerance: Amount) -> Self {
        Self {
            expected,
            allocated,
            discrepancy: allocated - expected,
            tolerance,
        }
    }

    /// Whether the discrepancy stays within tolerance
    pub fn is_balanced(&self) -> bool {
        self.discrepancy.abs() <= self.tolerance
    }
}

/// Full output of one allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub pools: PoolTotals,
    /// One entry per owner, in owner-table order
    pub allocations: Vec<OwnerAllocation>,
    /// Column totals over `allocations`
    pub totals: AllocatedTotals,
    pub reconciliation: Reconciliation,
}

impl AllocationReport {
    /// Sum of all expense amounts
    pub fn grand_total(&self) -> Amount {
        self.reconciliation.expected
    }

    /// Allocation for a given owner
    pub fn allocation_for(&self, owner: &OwnerId) -> Option<&OwnerAllocation> {
        self.allocations.iter().find(|a| &a.owner == owner)
    }

    /// Sum of one pool's shares over all owners
    pub fn allocated_from(&self, pool: Pool) -> Amount {
        self.totals.pool(pool)
    }

    /// Sum of monthly totals over all owners
    pub fn monthly_total(&self) -> Amount {
        self.totals.monthly
    }
}
