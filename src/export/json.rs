//! JSON Export functionality
//!
//! Writes the complete allocation report with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CuotasError, CuotasResult};
use crate::models::AllocationReport;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Allocation report export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Name of the community the report was computed for
    pub community: String,

    /// Expense file the items were read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Rows of the expense file that were skipped
    #[serde(default)]
    pub skipped_rows: usize,

    pub report: AllocationReport,
}

impl ReportExport {
    /// Wrap a report with export metadata
    pub fn new(community: impl Into<String>, report: AllocationReport) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            community: community.into(),
            source: None,
            skipped_rows: 0,
            report,
        }
    }

    /// Record where the expenses came from
    pub fn with_source(mut self, source: impl Into<String>, skipped_rows: usize) -> Self {
        self.source = Some(source.into());
        self.skipped_rows = skipped_rows;
        self
    }
}

/// Export the report to JSON
pub fn export_report_json<W: Write>(
    export: &ReportExport,
    writer: &mut W,
    pretty: bool,
) -> CuotasResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    }
    .map_err(|e| CuotasError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, CommunityConfig, ExpenseItem, OwnerId};
    use crate::services::AllocationEngine;
    use rust_decimal_macros::dec;

    fn report() -> AllocationReport {
        let items = vec![
            ExpenseItem::new("Agua", Amount::new(dec!(1200))),
            ExpenseItem::new("Puerta garaje", Amount::new(dec!(350))),
        ];
        AllocationEngine::new(CommunityConfig::default())
            .unwrap()
            .allocate(&items)
            .unwrap()
    }

    #[test]
    fn test_export_metadata() {
        let export = ReportExport::new("Calle Mayor 3", report()).with_source("gastos.csv", 2);

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.app_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(export.source.as_deref(), Some("gastos.csv"));
        assert_eq!(export.skipped_rows, 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let export = ReportExport::new("Calle Mayor 3", report());

        let mut output = Vec::new();
        export_report_json(&export, &mut output, true).unwrap();

        let imported: ReportExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(imported.community, "Calle Mayor 3");
        assert_eq!(imported.report, export.report);
        assert_eq!(
            imported
                .report
                .allocation_for(&OwnerId::from("2A"))
                .unwrap()
                .garage_share,
            Amount::new(dec!(50))
        );
    }

    #[test]
    fn test_compact_output() {
        let export = ReportExport::new("Mini", report());
        let mut output = Vec::new();
        export_report_json(&export, &mut output, false).unwrap();
        assert!(!String::from_utf8(output).unwrap().contains('\n'));
    }
}
