//! Display formatting for terminal output
//!
//! Provides utilities for formatting allocation results and the community
//! table for terminal display.

pub mod allocation;
pub mod report;

pub use allocation::{
    format_allocation_table, format_owner_detail, format_owner_table, format_pool_summary,
    format_reconciliation_warning, format_skipped_rows,
};
pub use report::{format_money, format_percentage};
