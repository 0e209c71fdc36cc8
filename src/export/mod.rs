//! Export module for cuotas-cli
//!
//! - CSV: the per-owner allocation table and the per-line breakdown
//!   (spreadsheet-compatible)
//! - JSON: the whole allocation report, machine-readable

pub mod csv;
pub mod json;

pub use csv::{export_allocations_csv, export_breakdown_csv};
pub use json::{export_report_json, ReportExport, EXPORT_SCHEMA_VERSION};
