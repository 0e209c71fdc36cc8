//! The `audit` command

use super::CliContext;
use crate::error::CuotasResult;

/// Handle `cuotas audit`: print the most recent entries, oldest first
pub fn handle_audit_command(ctx: &CliContext, limit: usize) -> CuotasResult<()> {
    let entries = ctx.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
