//! Validate command

use anyhow::{bail, Context, Result};

use crate::commands::CommandContext;
use crate::interactive::spinner;
use crate::output::{colors, Formattable, OutputFormat};

/// Load every trace and report the ones that would be excluded.
///
/// Fails when anything was rejected, so scripts can gate on the exit status.
pub async fn run(ctx: &CommandContext) -> Result<()> {
    let service = ctx.service()?;

    let sp = spinner("Checking traces...", ctx.quiet());
    let summary = service.validate().await;
    sp.finish_and_clear();
    let summary = summary.context("Validation failed")?;

    println!("{}", summary.format(ctx.format)?);

    if !summary.is_clean() {
        bail!("{} trace(s) rejected", summary.rejected.len());
    }

    if ctx.format == OutputFormat::Table {
        println!("{} All {} traces are valid", colors::success("✓"), summary.valid);
    }
    Ok(())
}
