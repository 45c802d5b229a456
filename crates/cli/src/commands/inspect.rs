//! Inspect command

use anyhow::Result;
use solverbench_domain::{InstanceKey, RunKey};

use crate::commands::CommandContext;
use crate::output::Formattable;

/// Print the parsed trace of one run
pub async fn run(
    ctx: &CommandContext,
    configuration: String,
    problem: String,
    instance: String,
) -> Result<()> {
    let run = RunKey::new(configuration, InstanceKey::new(problem, instance));
    let inspected = ctx.service()?.inspect(&run).await?;

    println!("{}", inspected.format(ctx.format)?);
    Ok(())
}
