//! Service layer for cuotas-cli
//!
//! The service layer reads expense files and turns them into per-owner
//! allocations against the community table.

pub mod allocation;
pub mod import;

#[cfg(test)]
mod allocation_props;

pub use allocation::AllocationEngine;
pub use import::{ImportResult, ImportService, SkippedRow};
