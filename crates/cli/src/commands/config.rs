//! Configuration commands

use anyhow::Result;

use crate::commands::CommandContext;
use crate::output::{colors, JsonFormatter, OutputFormat};

/// Print the effective configuration
pub fn show(ctx: &CommandContext) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&ctx.config)?),
        OutputFormat::Table | OutputFormat::Plain => print!("{}", ctx.config.to_toml()?),
    }
    Ok(())
}

/// Check the configuration and the files it points at
pub fn check(ctx: &CommandContext) -> Result<()> {
    let directions = ctx.directions()?;

    let results_dir = &ctx.config.input.results_dir;
    if !results_dir.is_dir() {
        println!(
            "{} Results directory {} does not exist",
            colors::warning("!"),
            results_dir.display()
        );
    }

    println!(
        "{} Configuration is valid ({} direction entries)",
        colors::success("✓"),
        directions.len()
    );
    Ok(())
}
