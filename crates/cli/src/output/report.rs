//! Table rendering of analysis results

use super::{Formattable, TableFormatter};
use anyhow::Result;
use solverbench_application::{InspectedTrace, ValidationSummary};
use solverbench_common::serialization::format_optional_float_or;
use solverbench_common::format_float;
use solverbench_domain::{AnalysisReport, ExcludedTrace, ProblemReport, SummaryRow};
use std::collections::BTreeSet;

/// Decimal places shown in terminal tables
pub const TABLE_PRECISION: usize = 4;

const PLACEHOLDER: &str = "-";

fn score(value: Option<f64>) -> String {
    format_optional_float_or(value, TABLE_PRECISION, PLACEHOLDER)
}

fn summary_table(rows: &[SummaryRow]) -> String {
    let rows = rows
        .iter()
        .map(|row| {
            vec![
                row.rank
                    .map(|rank| rank.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                row.configuration.to_string(),
                row.scored.to_string(),
                row.unscored.to_string(),
                score(row.mean_objective_score),
                score(row.median_objective_score),
                score(row.mean_auc_score),
                score(row.median_auc_score),
            ]
        })
        .collect();

    TableFormatter::simple(
        vec![
            "Rank",
            "Configuration",
            "Scored",
            "Unscored",
            "Mean objective",
            "Median objective",
            "Mean AUC",
            "Median AUC",
        ],
        rows,
    )
}

fn excluded_table(excluded: &[ExcludedTrace]) -> String {
    let rows = excluded
        .iter()
        .map(|e| vec![e.location(), e.code.clone(), e.message.clone()])
        .collect();
    TableFormatter::simple(vec!["Location", "Code", "Message"], rows)
}

impl Formattable for AnalysisReport {
    fn format_table(&self) -> Result<String> {
        let counts = self.status_counts();
        let mut out = String::new();

        out.push_str("Overall ranking\n");
        out.push_str(&summary_table(&self.overall));
        out.push_str(&format!(
            "\nInstances: {} scored, {} degraded, {} unscored, {} failed\n",
            counts.scored, counts.degraded, counts.unscored, counts.failed
        ));

        if !self.excluded.is_empty() {
            out.push_str(&format!("\nExcluded traces ({})\n", self.excluded.len()));
            out.push_str(&excluded_table(&self.excluded));
            out.push('\n');
        }

        Ok(out)
    }
}

impl Formattable for ProblemReport {
    fn format_table(&self) -> Result<String> {
        let mut rows = Vec::new();
        for instance in &self.instances {
            let direction = instance
                .direction
                .map(|d| d.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            for run in &instance.runs {
                rows.push(vec![
                    instance.key.instance.to_string(),
                    direction.clone(),
                    instance.status.as_str().to_string(),
                    run.configuration.to_string(),
                    run.status.as_str().to_string(),
                    score(run.objective_score),
                    score(run.auc_score),
                    score(run.best_objective),
                    run.num_solutions.to_string(),
                ]);
            }
        }

        let mut out = format!("Problem: {}\n", self.problem);
        out.push_str(&TableFormatter::simple(
            vec![
                "Instance",
                "Direction",
                "Instance status",
                "Configuration",
                "Run status",
                "Objective",
                "AUC",
                "Best",
                "Solutions",
            ],
            rows,
        ));
        out.push('\n');
        out.push_str(&summary_table(&self.summary));
        out.push('\n');
        Ok(out)
    }
}

impl Formattable for ValidationSummary {
    fn format_table(&self) -> Result<String> {
        let mut out = TableFormatter::key_value(vec![
            ("Configurations", self.configurations.len().to_string()),
            ("Runs", self.runs.to_string()),
            ("Valid", self.valid.to_string()),
            ("Rejected", self.rejected.len().to_string()),
        ]);
        out.push('\n');

        if !self.rejected.is_empty() {
            out.push_str(&excluded_table(&self.rejected));
            out.push('\n');
        }
        Ok(out)
    }
}

impl Formattable for InspectedTrace {
    fn format_table(&self) -> Result<String> {
        let direction = self
            .direction
            .map(|d| d.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let improving = match (&self.direction, &self.improvement_error) {
            (None, _) => PLACEHOLDER.to_string(),
            (Some(_), None) => "yes".to_string(),
            (Some(_), Some(error)) => format!("no ({})", error),
        };

        let mut out = TableFormatter::key_value(vec![
            ("Run", self.run.to_string()),
            ("Direction", direction),
            ("Solutions", self.trace.len().to_string()),
            ("Improving", improving),
        ]);
        out.push('\n');

        if self.trace.is_empty() {
            return Ok(out);
        }

        let extra_columns: BTreeSet<&str> = self
            .trace
            .points()
            .iter()
            .flat_map(|p| p.extra.keys().map(String::as_str))
            .collect();

        let mut headers = vec!["Time", "Objective"];
        headers.extend(extra_columns.iter().copied());

        let rows = self
            .trace
            .points()
            .iter()
            .map(|point| {
                let mut row = vec![
                    format_float(point.time, TABLE_PRECISION),
                    format_float(point.objective, TABLE_PRECISION),
                ];
                row.extend(extra_columns.iter().map(|column| {
                    point
                        .extra
                        .get(*column)
                        .cloned()
                        .unwrap_or_else(|| PLACEHOLDER.to_string())
                }));
                row
            })
            .collect();

        out.push_str(&TableFormatter::simple(headers, rows));
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use solverbench_application::ScoringEngine;
    use solverbench_domain::{
        ConfigurationId, InstanceKey, ObjectiveDirection, ProblemId, RunKey, SolutionPoint, Trace,
    };
    use solverbench_testing::{create_test_analysis_input, create_test_directions};

    fn report() -> AnalysisReport {
        ScoringEngine::default().analyze(&create_test_analysis_input(), &create_test_directions())
    }

    #[test]
    fn test_report_table() {
        let rendered = report().format(OutputFormat::Table).unwrap();
        assert!(rendered.contains("Overall ranking"));
        assert!(rendered.contains("Mean AUC"));
        assert!(rendered.contains("Instances: 3 scored"));
        assert!(!rendered.contains("Excluded traces"));
    }

    #[test]
    fn test_report_json_matches_serde() {
        let report = report();
        let rendered = report.format(OutputFormat::Json).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_problem_table() {
        let report = report();
        let jobshop = report.problem(&ProblemId::new("jobshop")).unwrap();
        let rendered = jobshop.format_table().unwrap();

        assert!(rendered.starts_with("Problem: jobshop"));
        assert!(rendered.contains("ft06"));
        assert!(rendered.contains("0.6667"));
        assert!(rendered.contains("minimize"));
    }

    #[test]
    fn test_validation_table() {
        let summary = ValidationSummary {
            configurations: vec![ConfigurationId::new("a")],
            runs: 2,
            valid: 1,
            rejected: vec![ExcludedTrace::run(
                &RunKey::new("a", InstanceKey::new("jobshop", "ft06")),
                "CORRUPT_TRACE",
                "time goes backwards",
            )],
        };
        let rendered = summary.format_table().unwrap();
        assert!(rendered.contains("a@jobshop/ft06"));
        assert!(rendered.contains("CORRUPT_TRACE"));
    }

    #[test]
    fn test_inspected_trace_table() {
        let trace = Trace::new(vec![
            SolutionPoint::new(1.0, 10.0).with_extra("nodes", "100"),
            SolutionPoint::new(3.0, 4.0),
        ])
        .unwrap();
        let inspected = InspectedTrace {
            run: RunKey::new("a", InstanceKey::new("jobshop", "ft06")),
            direction: Some(ObjectiveDirection::Minimize),
            trace,
            improvement_error: None,
        };

        let rendered = inspected.format_table().unwrap();
        assert!(rendered.contains("nodes"));
        assert!(rendered.contains("10.0000"));
        assert!(rendered.contains("yes"));
    }
}
