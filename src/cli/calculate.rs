//! The `calculate` command
//!
//! Reads an expense file, allocates it among the owners and prints the
//! result, optionally writing CSV and JSON exports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use super::CliContext;
use crate::audit::AuditEntry;
use crate::display::{
    format_allocation_table, format_owner_detail, format_pool_summary,
    format_reconciliation_warning, format_skipped_rows,
};
use crate::error::{CuotasError, CuotasResult};
use crate::export::{export_allocations_csv, export_breakdown_csv, export_report_json, ReportExport};
use crate::services::{AllocationEngine, ImportService};

/// Arguments of `cuotas calculate`
#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Expense CSV file (`concept,amount`, first row is a header)
    pub file: PathBuf,

    /// Show the line detail of every owner
    #[arg(short, long)]
    pub detail: bool,

    /// Show the line detail of one owner
    #[arg(short, long, conflicts_with = "detail")]
    pub owner: Option<String>,

    /// Field delimiter of the expense file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Write the per-owner table to a CSV file
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Write every owner's line shares to a CSV file
    #[arg(long, value_name = "CSV")]
    pub breakdown: Option<PathBuf>,

    /// Write the full report to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Handle `cuotas calculate`
pub fn handle_calculate_command(ctx: &CliContext, args: CalculateArgs) -> CuotasResult<()> {
    let decision = ctx.require_session()?;
    let config = ctx.community()?;
    let engine = AllocationEngine::new(config)?;
    let currency = ctx.settings.currency_symbol.as_str();

    let delimiter = u8::try_from(args.delimiter).map_err(|_| {
        CuotasError::Validation(format!("Delimiter must be ASCII: '{}'", args.delimiter))
    })?;
    let imported = ImportService::new()
        .with_delimiter(delimiter)
        .import_file(&args.file)?;

    let skipped = imported.skipped.clone();
    if !skipped.is_empty() {
        eprint!("{}", format_skipped_rows(&skipped));
    }
    let items = imported.into_items()?;
    let report = engine.allocate(&items)?;

    print!("{}", format_pool_summary(&report, currency));
    println!();
    println!("{}", format_allocation_table(&report, currency));

    if args.detail {
        for allocation in &report.allocations {
            println!();
            print!("{}", format_owner_detail(&report, allocation, currency));
        }
    } else if let Some(label) = &args.owner {
        let owner = engine
            .config()
            .find_owner(label)
            .ok_or_else(|| CuotasError::owner_not_found(label))?;
        let allocation = report
            .allocation_for(&owner.id)
            .ok_or_else(|| CuotasError::owner_not_found(label))?;
        println!();
        print!("{}", format_owner_detail(&report, allocation, currency));
    }

    if let Some(warning) = format_reconciliation_warning(&report.reconciliation, currency) {
        eprintln!("{}", warning);
    }

    let source = args.file.display().to_string();
    if let Some(path) = &args.export {
        write_file(path, |w| export_allocations_csv(&report, w))?;
        println!("Allocation table exported to: {}", path.display());
    }
    if let Some(path) = &args.breakdown {
        write_file(path, |w| export_breakdown_csv(&report, w))?;
        println!("Line breakdown exported to: {}", path.display());
    }
    if let Some(path) = &args.json {
        let export = ReportExport::new(engine.config().name.clone(), report.clone())
            .with_source(source.as_str(), skipped.len());
        write_file(path, |w| export_report_json(&export, w, true))?;
        println!("Report exported to: {}", path.display());
    }

    ctx.audit().log(&AuditEntry::calculate(
        decision.actor(),
        source,
        items.len(),
        skipped.len(),
        report.grand_total(),
    ))?;
    info!(items = items.len(), "calculation complete");

    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> CuotasResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> CuotasResult<()>,
{
    let file = File::create(path).map_err(|e| {
        CuotasError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| CuotasError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
