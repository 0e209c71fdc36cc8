//! Allocation report display formatting
//!
//! Formats pool summaries, the per-owner allocation table and the line
//! detail of a single owner for terminal output.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::{double_separator, format_header, format_money, format_percentage, separator};
use crate::models::{
    AllocationReport, Amount, CommunityConfig, OwnerAllocation, Pool, Reconciliation,
    MONTHS_PER_YEAR,
};
use crate::services::SkippedRow;

const REPORT_WIDTH: usize = 72;

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "General")]
    general: String,
    #[tabled(rename = "Garage")]
    garage: String,
    #[tabled(rename = "Building")]
    building: String,
    #[tabled(rename = "Annual")]
    annual: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

#[derive(Tabled)]
struct OwnerRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Building share")]
    building: String,
    #[tabled(rename = "Garage")]
    garage: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// Format the per-pool totals with the rule applied to each pool
pub fn format_pool_summary(report: &AllocationReport, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format_header("EXPENSE POOLS", REPORT_WIDTH));
    output.push('\n');
    output.push_str(&double_separator(REPORT_WIDTH));
    output.push('\n');

    for pool in Pool::ALL {
        let totals = report.pools.get(pool);
        output.push_str(&format!(
            "{:<10} {:>3} items  {:>16}   {}\n",
            pool.to_string(),
            totals.item_count,
            format_money(totals.total, currency),
            pool.rule_description()
        ));
    }

    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<20}  {:>16}\n",
        "Annual total",
        format_money(report.grand_total(), currency)
    ));
    output.push_str(&format!(
        "{:<20}  {:>16}\n",
        "Monthly total",
        format_money(report.monthly_total(), currency)
    ));

    output
}

/// Format the per-owner allocation table with a TOTAL row
pub fn format_allocation_table(report: &AllocationReport, currency: &str) -> String {
    let money = |amount: Amount| format_money(amount, currency);

    let mut rows: Vec<AllocationRow> = report
        .allocations
        .iter()
        .map(|a| AllocationRow {
            owner: a.owner.to_string(),
            share: format_percentage(a.share_percent),
            general: money(a.general_share),
            garage: money(a.garage_share),
            building: money(a.building_share),
            annual: money(a.annual_total),
            monthly: money(a.monthly_total),
        })
        .collect();

    let totals = &report.totals;
    rows.push(AllocationRow {
        owner: "TOTAL".to_string(),
        share: format_percentage(report.allocations.iter().map(|a| a.share_percent).sum()),
        general: money(totals.general),
        garage: money(totals.garage),
        building: money(totals.building),
        annual: money(totals.annual),
        monthly: money(totals.monthly),
    });

    render(rows)
}

/// Format the line-by-line detail of one owner
///
/// A pool that has items but none charged to this owner is marked as not
/// applicable.
pub fn format_owner_detail(
    report: &AllocationReport,
    allocation: &OwnerAllocation,
    currency: &str,
) -> String {
    let months = rust_decimal::Decimal::from(MONTHS_PER_YEAR);
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        allocation.owner,
        format_percentage(allocation.share_percent)
    ));
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');

    for pool in Pool::ALL {
        let lines = allocation.breakdown.lines(pool);
        let subtotal = allocation.pool_share(pool);

        let heading = match (pool, allocation.building_percent) {
            (Pool::Building, Some(pct)) => format!("{} ({})", pool, format_percentage(pct)),
            _ => pool.to_string(),
        };
        output.push_str(&format!(
            "  {:<40} {:>12} {:>14}\n",
            heading,
            format_money(Amount::new(subtotal.value() / months), currency),
            format_money(subtotal, currency)
        ));

        if lines.is_empty() {
            if report.pools.get(pool).item_count > 0 {
                output.push_str("    (not applicable)\n");
            }
            continue;
        }

        for line in lines {
            output.push_str(&format!(
                "    {:<38} {:>12} {:>14}\n",
                truncate(&line.concept, 38),
                format_money(Amount::new(line.amount.value() / months), currency),
                format_money(line.amount, currency)
            ));
        }
    }

    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "  {:<40} {:>12} {:>14}\n",
        "Total",
        format_money(allocation.monthly_total, currency),
        format_money(allocation.annual_total, currency)
    ));

    output
}

/// Format the community owner table with eligibility
pub fn format_owner_table(config: &CommunityConfig) -> String {
    let rows: Vec<OwnerRow> = config
        .owners
        .iter()
        .map(|owner| OwnerRow {
            owner: owner.id.to_string(),
            share: format_percentage(owner.share_percent),
            building: config
                .adjusted_building_percent(&owner.id)
                .map(format_percentage)
                .unwrap_or_else(|| "-".to_string()),
            garage: if config.is_garage_eligible(&owner.id) {
                "yes".to_string()
            } else {
                "-".to_string()
            },
            description: owner.description.clone().unwrap_or_default(),
        })
        .collect();

    let mut output = format!("{}\n", config.name);
    output.push_str(&render(rows));
    output.push_str(&format!(
        "\nTotal share: {}   Building base: {}   Garage owners: {}\n",
        format_percentage(config.total_percent()),
        format_percentage(config.building_base()),
        config.garage_eligible.len()
    ));
    output
}

/// Format the rows skipped while importing
pub fn format_skipped_rows(skipped: &[SkippedRow]) -> String {
    let mut output = format!("Skipped {} row(s):\n", skipped.len());
    for row in skipped {
        output.push_str(&format!("  line {}: {}\n", row.line, row.reason));
    }
    output
}

/// A warning when the owners were charged a different total than was spent
pub fn format_reconciliation_warning(
    reconciliation: &Reconciliation,
    currency: &str,
) -> Option<String> {
    if reconciliation.is_balanced() {
        return None;
    }
    Some(format!(
        "Warning: owners were charged {} but expenses total {} (difference {})",
        format_money(reconciliation.allocated, currency),
        format_money(reconciliation.expected, currency),
        format_money(reconciliation.discrepancy, currency)
    ))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseItem, OwnerId};
    use crate::services::AllocationEngine;
    use rust_decimal_macros::dec;

    fn report() -> AllocationReport {
        let items = vec![
            ExpenseItem::new("Administrador", Amount::new(dec!(494.40))),
            ExpenseItem::new("Seguro edificio", Amount::new(dec!(250))),
            ExpenseItem::new("Puerta garaje", Amount::new(dec!(70))),
        ];
        AllocationEngine::new(CommunityConfig::default())
            .unwrap()
            .allocate(&items)
            .unwrap()
    }

    #[test]
    fn test_pool_summary() {
        let output = format_pool_summary(&report(), "€");
        assert!(output.contains("General"));
        assert!(output.contains("494,40 €"));
        assert!(output.contains("garage owners, equal parts"));
        assert!(output.contains("814,40 €"));
    }

    #[test]
    fn test_allocation_table_has_total_row() {
        let output = format_allocation_table(&report(), "€");
        assert!(output.contains("Owner"));
        assert!(output.contains("Bajo"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("100,00%"));
        assert!(output.contains("814,40 €"));
    }

    #[test]
    fn test_owner_detail() {
        let report = report();

        let bajo = report.allocation_for(&OwnerId::from("Bajo")).unwrap();
        let output = format_owner_detail(&report, bajo, "€");
        assert!(output.contains("Bajo (20,67%)"));
        assert!(output.contains("Seguro edificio"));
        assert!(output.contains("(not applicable)"));
        assert!(output.contains("167,33 €"));

        let flat = report.allocation_for(&OwnerId::from("1A")).unwrap();
        let output = format_owner_detail(&report, flat, "€");
        assert!(output.contains("Puerta garaje"));
        assert!(!output.contains("(not applicable)"));
    }

    #[test]
    fn test_owner_table() {
        let output = format_owner_table(&CommunityConfig::default());
        assert!(output.contains("Garaje"));
        assert!(output.contains("26,06%"));
        assert!(output.contains("Building base: 79,33%"));
        assert!(output.contains("Garage owners: 7"));
    }

    #[test]
    fn test_skipped_rows() {
        let skipped = vec![SkippedRow {
            line: 4,
            reason: "Missing amount column".into(),
        }];
        let output = format_skipped_rows(&skipped);
        assert!(output.contains("Skipped 1 row(s)"));
        assert!(output.contains("line 4: Missing amount column"));
    }

    #[test]
    fn test_reconciliation_warning() {
        let balanced = Reconciliation::new(
            Amount::new(dec!(100)),
            Amount::new(dec!(100)),
            Amount::new(dec!(0.09)),
        );
        assert!(format_reconciliation_warning(&balanced, "€").is_none());

        let off = Reconciliation::new(
            Amount::new(dec!(100)),
            Amount::new(dec!(96.8)),
            Amount::new(dec!(0.09)),
        );
        let warning = format_reconciliation_warning(&off, "€").unwrap();
        assert!(warning.contains("96,80 €"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("corto", 10), "corto");
        assert_eq!(truncate("Mantenimiento ascensor", 10), "Manteni...");
    }
}
