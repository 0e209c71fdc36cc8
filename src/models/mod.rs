//! Core data models for cuotas-cli
//!
//! This module contains the data structures of the allocation domain:
//! amounts, expense items, pools, the community owner table and the
//! allocation results.

pub mod allocation;
pub mod community;
pub mod expense;
pub mod ids;
pub mod money;
pub mod pool;

pub use allocation::{
    AllocatedTotals, AllocationReport, LineBreakdown, LineShare, OwnerAllocation, PoolTotal,
    PoolTotals, Reconciliation, MONTHS_PER_YEAR,
};
pub use community::{CommunityConfig, Owner, SHARE_SUM_TOLERANCE};
pub use expense::ExpenseItem;
pub use ids::{OwnerId, SessionToken, UserId};
pub use money::{Amount, AmountParseError};
pub use pool::Pool;
