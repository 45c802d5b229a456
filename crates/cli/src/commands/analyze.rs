//! Analyze command

use anyhow::{Context, Result};
use solverbench_infrastructure::ReportExporter;
use tracing::instrument;

use crate::commands::CommandContext;
use crate::interactive::spinner;
use crate::output::{colors, Formattable};

/// Score every trace, write the report files and print the overall ranking
#[instrument(skip(ctx), fields(results_dir = %ctx.config.input.results_dir.display()))]
pub async fn run(ctx: &CommandContext, export: bool) -> Result<()> {
    let service = ctx.service()?;

    let sp = spinner("Scoring traces...", ctx.quiet());
    let report = service.analyze().await;
    sp.finish_and_clear();
    let report = report.context("Analysis failed")?;

    if export {
        let exporter = ReportExporter::from_config(&ctx.config.output);
        let written = exporter.export(&report)?;
        if !ctx.quiet() {
            println!(
                "{} Wrote {} files to {}",
                colors::success("✓"),
                written.len(),
                exporter.dir().display()
            );
            println!();
        }
    }

    println!("{}", report.format(ctx.format)?);
    Ok(())
}
