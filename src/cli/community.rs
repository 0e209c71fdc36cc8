//! Community table commands: `owners` and `classify`

use super::CliContext;
use crate::display::format_owner_table;
use crate::error::CuotasResult;
use crate::models::Pool;

/// Handle `cuotas owners`
pub fn handle_owners_command(ctx: &CliContext) -> CuotasResult<()> {
    ctx.require_session()?;
    let config = ctx.community()?;
    print!("{}", format_owner_table(&config));
    Ok(())
}

/// Handle `cuotas classify <concept>...`
pub fn handle_classify_command(ctx: &CliContext, concepts: &[String]) -> CuotasResult<()> {
    ctx.require_session()?;

    let width = concepts
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    for concept in concepts {
        let pool = Pool::classify(concept);
        println!(
            "{:<width$}  {:<8}  {}",
            concept,
            pool.to_string(),
            pool.rule_description(),
            width = width
        );
    }

    Ok(())
}
