//! Show command

use anyhow::{bail, Context, Result};
use solverbench_domain::{AnalysisReport, ProblemReport};

use crate::commands::CommandContext;
use crate::interactive::spinner;
use crate::output::{colors, Formattable, JsonFormatter, OutputFormat, PlainFormatter};

/// Problems to print, all of them unless one is named
pub fn select_problems<'a>(
    report: &'a AnalysisReport,
    problem: Option<&str>,
) -> Result<Vec<&'a ProblemReport>> {
    let Some(name) = problem else {
        return Ok(report.problems.iter().collect());
    };

    let selected: Vec<&ProblemReport> = report
        .problems
        .iter()
        .filter(|p| p.problem.as_str() == name)
        .collect();
    if selected.is_empty() {
        bail!("Problem '{}' not found in results", name);
    }
    Ok(selected)
}

/// Print per-instance scores without writing any files
pub async fn run(ctx: &CommandContext, problem: Option<String>) -> Result<()> {
    let service = ctx.service()?;

    let sp = spinner("Scoring traces...", ctx.quiet());
    let report = service.analyze().await;
    sp.finish_and_clear();
    let report = report.context("Analysis failed")?;

    let selected = select_problems(&report, problem.as_deref())?;

    match ctx.format {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&selected)?),
        OutputFormat::Plain => println!("{}", PlainFormatter::format(&selected)?),
        OutputFormat::Table => {
            if selected.is_empty() {
                println!("{}", colors::warning("No traces found."));
                return Ok(());
            }
            for problem in selected {
                println!("{}", problem.format_table()?);
            }
            if !report.excluded.is_empty() {
                println!(
                    "{}",
                    colors::warning(&format!(
                        "{} trace(s) excluded, run 'solverbench validate' for details",
                        report.excluded.len()
                    ))
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solverbench_application::ScoringEngine;
    use solverbench_testing::{create_test_analysis_input, create_test_directions};

    fn report() -> AnalysisReport {
        ScoringEngine::default().analyze(&create_test_analysis_input(), &create_test_directions())
    }

    #[test]
    fn test_select_all_problems() {
        let report = report();
        assert_eq!(select_problems(&report, None).unwrap().len(), 2);
    }

    #[test]
    fn test_select_one_problem() {
        let report = report();
        let selected = select_problems(&report, Some("knapsack")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].problem.as_str(), "knapsack");
    }

    #[test]
    fn test_select_unknown_problem() {
        let report = report();
        let error = select_problems(&report, Some("tsp")).unwrap_err();
        assert!(error.to_string().contains("tsp"));
    }
}
