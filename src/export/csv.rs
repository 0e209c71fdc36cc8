//! CSV Export functionality
//!
//! Amounts and percentages are written with two decimals and a dot as the
//! decimal separator.

use std::io::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CuotasError, CuotasResult};
use crate::models::{AllocationReport, Amount, Pool, MONTHS_PER_YEAR};

/// Header of the per-owner allocation export
pub const ALLOCATIONS_HEADER: &str =
    "Owner,SharePercent,GeneralShare,GarageShare,BuildingShare,AnnualTotal,MonthlyTotal";

/// Header of the per-line breakdown export
pub const BREAKDOWN_HEADER: &str = "Owner,Pool,Concept,Annual,Monthly";

/// Export one row per owner, in table order
pub fn export_allocations_csv<W: Write>(
    report: &AllocationReport,
    writer: &mut W,
) -> CuotasResult<()> {
    writeln!(writer, "{}", ALLOCATIONS_HEADER).map_err(export_err)?;

    for allocation in &report.allocations {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            escape_csv(allocation.owner.as_str()),
            format_percent(allocation.share_percent),
            allocation.general_share.format_fixed(),
            allocation.garage_share.format_fixed(),
            allocation.building_share.format_fixed(),
            allocation.annual_total.format_fixed(),
            allocation.monthly_total.format_fixed()
        )
        .map_err(export_err)?;
    }

    Ok(())
}

/// Export every line share of every owner
///
/// Owners with nothing to pay from a pool produce no rows for it.
pub fn export_breakdown_csv<W: Write>(
    report: &AllocationReport,
    writer: &mut W,
) -> CuotasResult<()> {
    writeln!(writer, "{}", BREAKDOWN_HEADER).map_err(export_err)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    for allocation in &report.allocations {
        for pool in Pool::ALL {
            for line in allocation.breakdown.lines(pool) {
                let monthly = Amount::new(line.amount.value() / months);
                writeln!(
                    writer,
                    "{},{},{},{},{}",
                    escape_csv(allocation.owner.as_str()),
                    pool,
                    escape_csv(&line.concept),
                    line.amount.format_fixed(),
                    monthly.format_fixed()
                )
                .map_err(export_err)?;
            }
        }
    }

    Ok(())
}

fn export_err(e: std::io::Error) -> CuotasError {
    CuotasError::Export(e.to_string())
}

fn format_percent(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
