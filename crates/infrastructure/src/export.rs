//! Report export
//!
//! Writes an [`AnalysisReport`] to an output directory as CSV tables, a JSON
//! document and a Markdown summary. Floats are printed with a fixed precision
//! and every table is ordered, so identical reports give identical files.

use anyhow::{Context, Result};
use solverbench_common::serialization::{format_optional_float, format_optional_float_or};
use solverbench_common::{ExportFormat, OutputConfig};
use solverbench_domain::{AnalysisReport, ProblemReport, SummaryRow};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const SCORES_FILE: &str = "scores.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const STATUS_FILE: &str = "status.csv";
pub const EXCLUDED_FILE: &str = "excluded.csv";
pub const REPORT_FILE: &str = "report.json";
pub const MARKDOWN_FILE: &str = "summary.md";

const SCORES_HEADER: [&str; 11] = [
    "configuration",
    "instance",
    "direction",
    "objective_score",
    "auc_score",
    "unscored",
    "status",
    "num_solutions",
    "best_objective",
    "first_solution_time",
    "last_solution_time",
];

const SUMMARY_HEADER: [&str; 8] = [
    "rank",
    "configuration",
    "scored",
    "unscored",
    "mean_objective_score",
    "median_objective_score",
    "mean_auc_score",
    "median_auc_score",
];

/// Writes reports to an output directory
#[derive(Debug, Clone)]
pub struct ReportExporter {
    dir: PathBuf,
    precision: usize,
    formats: Vec<ExportFormat>,
}

impl ReportExporter {
    /// Create an exporter writing every format
    pub fn new(dir: impl Into<PathBuf>, precision: usize) -> Self {
        Self {
            dir: dir.into(),
            precision,
            formats: vec![ExportFormat::Csv, ExportFormat::Json, ExportFormat::Markdown],
        }
    }

    /// Create an exporter from the output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            precision: config.precision,
            formats: config.formats.clone(),
        }
    }

    /// Restrict the written formats
    pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every configured format, returning the written paths
    #[instrument(skip(self, report), fields(dir = %self.dir.display()))]
    pub fn export(&self, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create output directory {}", self.dir.display())
        })?;

        let mut written = Vec::new();
        if self.formats.contains(&ExportFormat::Csv) {
            for problem in &report.problems {
                let dir = self.dir.join(problem.problem.as_str());
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory {}", dir.display()))?;
                written.push(self.write_scores(&dir.join(SCORES_FILE), problem)?);
                written.push(self.write_summary(&dir.join(SUMMARY_FILE), &problem.summary)?);
            }
            written.push(self.write_summary(&self.dir.join(SUMMARY_FILE), &report.overall)?);
            written.push(self.write_status(&self.dir.join(STATUS_FILE), report)?);
            written.push(self.write_excluded(&self.dir.join(EXCLUDED_FILE), report)?);
        }
        if self.formats.contains(&ExportFormat::Json) {
            written.push(self.write_json(&self.dir.join(REPORT_FILE), report)?);
        }
        if self.formats.contains(&ExportFormat::Markdown) {
            let path = self.dir.join(MARKDOWN_FILE);
            write_file(&path, &self.render_markdown(report))?;
            written.push(path);
        }

        info!(files = written.len(), "Report exported");
        Ok(written)
    }

    fn float(&self, value: Option<f64>) -> String {
        format_optional_float(value, self.precision)
    }

    /// Per-instance scores of one problem
    pub fn write_scores(&self, path: &Path, problem: &ProblemReport) -> Result<PathBuf> {
        let mut writer = csv_writer(path)?;
        writer.write_record(SCORES_HEADER)?;

        for instance in &problem.instances {
            let direction = instance
                .direction
                .map(|d| d.to_string())
                .unwrap_or_default();
            for run in &instance.runs {
                writer.write_record([
                    run.configuration.to_string(),
                    run.instance.instance.to_string(),
                    direction.clone(),
                    self.float(run.objective_score),
                    self.float(run.auc_score),
                    run.is_unscored().to_string(),
                    run.status.as_str().to_string(),
                    run.num_solutions.to_string(),
                    self.float(run.best_objective),
                    self.float(run.first_solution_time),
                    self.float(run.last_solution_time),
                ])?;
            }
        }

        finish(writer, path)
    }

    /// Ranked summary table
    pub fn write_summary(&self, path: &Path, rows: &[SummaryRow]) -> Result<PathBuf> {
        let mut writer = csv_writer(path)?;
        writer.write_record(SUMMARY_HEADER)?;

        for row in rows {
            writer.write_record([
                row.rank.map(|r| r.to_string()).unwrap_or_default(),
                row.configuration.to_string(),
                row.scored.to_string(),
                row.unscored.to_string(),
                self.float(row.mean_objective_score),
                self.float(row.median_objective_score),
                self.float(row.mean_auc_score),
                self.float(row.median_auc_score),
            ])?;
        }

        finish(writer, path)
    }

    /// Status of every instance
    pub fn write_status(&self, path: &Path, report: &AnalysisReport) -> Result<PathBuf> {
        let mut writer = csv_writer(path)?;
        writer.write_record([
            "problem",
            "instance",
            "direction",
            "status",
            "detail",
            "objective_lower",
            "objective_upper",
            "time_min",
            "time_max",
        ])?;

        for instance in report.instances() {
            let bounds = instance.bounds.as_ref();
            writer.write_record([
                instance.key.problem.to_string(),
                instance.key.instance.to_string(),
                instance
                    .direction
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                instance.status.as_str().to_string(),
                instance.status.detail(),
                self.float(bounds.map(|b| b.lower)),
                self.float(bounds.map(|b| b.upper)),
                self.float(bounds.map(|b| b.time_min)),
                self.float(bounds.map(|b| b.time_max)),
            ])?;
        }

        finish(writer, path)
    }

    /// Traces and results files left out of scoring
    pub fn write_excluded(&self, path: &Path, report: &AnalysisReport) -> Result<PathBuf> {
        let mut writer = csv_writer(path)?;
        writer.write_record(["configuration", "problem", "instance", "code", "message"])?;

        for excluded in &report.excluded {
            let (problem, instance) = match &excluded.instance {
                Some(key) => (key.problem.to_string(), key.instance.to_string()),
                None => (String::new(), String::new()),
            };
            writer.write_record([
                excluded.configuration.to_string(),
                problem,
                instance,
                excluded.code.clone(),
                excluded.message.clone(),
            ])?;
        }

        finish(writer, path)
    }

    /// Full report as pretty-printed JSON
    pub fn write_json(&self, path: &Path, report: &AnalysisReport) -> Result<PathBuf> {
        let mut json =
            serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        json.push('\n');
        write_file(path, &json)?;
        Ok(path.to_path_buf())
    }

    /// Markdown tables of the overall and per-problem summaries
    pub fn render_markdown(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();
        let counts = report.status_counts();

        let _ = writeln!(out, "# Benchmark summary\n");
        let _ = writeln!(
            out,
            "{} instances: {} scored, {} degraded, {} unscored, {} failed. {} traces excluded.\n",
            counts.total(),
            counts.scored,
            counts.degraded,
            counts.unscored,
            counts.failed,
            report.excluded.len()
        );
        let _ = writeln!(out, "## Overall\n");
        self.markdown_table(&mut out, &report.overall);

        for problem in &report.problems {
            let direction = problem
                .instances
                .iter()
                .find_map(|i| i.direction)
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            let _ = writeln!(out, "\n## {}{}\n", problem.problem, direction);
            self.markdown_table(&mut out, &problem.summary);
        }

        out
    }

    fn markdown_table(&self, out: &mut String, rows: &[SummaryRow]) {
        let cell = |value: Option<f64>| format_optional_float_or(value, self.precision, "-");

        let _ = writeln!(
            out,
            "| Rank | Configuration | Scored | Unscored | Mean objective | Median objective | Mean AUC | Median AUC |"
        );
        let _ = writeln!(out, "|---:|---|---:|---:|---:|---:|---:|---:|");
        for row in rows {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                row.rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                row.configuration,
                row.scored,
                row.unscored,
                cell(row.mean_objective_score),
                cell(row.median_objective_score),
                cell(row.mean_auc_score),
                cell(row.median_auc_score),
            );
        }
    }
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn finish(mut writer: csv::Writer<fs::File>, path: &Path) -> Result<PathBuf> {
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote table");
    Ok(path.to_path_buf())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}
