//! Analysis configuration.
//!
//! This module provides a layered configuration system that loads settings
//! from configuration files and environment variables.
//!
//! ## Example Configuration
//!
//! ```toml
//! [input]
//! results_dir = "results"
//! layout = "auto"
//! directions_file = "directions.toml"
//!
//! [scoring]
//! time_limit = 300000000.0
//! penalize_empty_traces = true
//!
//! [output]
//! dir = "analysis"
//! precision = 6
//! formats = ["csv", "json", "markdown"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest number of fractional digits printed for a score
pub const MAX_PRECISION: usize = 15;

/// Main analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Where traces are read from and how they are parsed
    #[serde(default)]
    pub input: InputConfig,
    /// Scoring options
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Where and how results are written
    #[serde(default)]
    pub output: OutputConfig,
    /// Runtime limits
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Logging setup
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Root of the results tree, one sub-directory per configuration
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// File layout inside each configuration directory
    #[serde(default)]
    pub layout: ResultsLayout,

    /// Column holding the time of each solution
    #[serde(default = "default_time_column")]
    pub time_column: String,

    /// Column holding the objective value of each solution
    #[serde(default = "default_objective_column")]
    pub objective_column: String,

    /// Column holding the event type, if the results carry one
    #[serde(default = "default_event_column")]
    pub event_column: String,

    /// Event type value that marks a new solution
    #[serde(default = "default_solution_event")]
    pub solution_event: String,

    /// Column naming the problem in combined results files
    #[serde(default = "default_problem_column")]
    pub problem_column: String,

    /// Column naming the instance in combined results files
    #[serde(default = "default_instance_column")]
    pub instance_column: String,

    /// TOML or JSON file mapping problems to objective directions
    #[serde(default)]
    pub directions_file: Option<PathBuf>,

    /// Infer the direction of problems absent from the direction map
    #[serde(default)]
    pub infer_directions: bool,
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Run time limit, in the unit of the time column
    #[serde(default)]
    pub time_limit: Option<f64>,

    /// Give empty traces the worst scores instead of leaving them unscored
    #[serde(default = "default_true")]
    pub penalize_empty_traces: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the result tables are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Number of fractional digits printed for floats
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// File formats to write
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum number of trace files read at the same time
    #[serde(default = "default_max_concurrent_loads")]
    pub max_concurrent_loads: usize,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to log records
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// File layout of a configuration directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultsLayout {
    /// Detect per configuration directory
    #[default]
    Auto,
    /// `<configuration>/<problem>/<instance>.csv`
    PerInstance,
    /// `<configuration>/results.csv` with problem and instance columns
    Combined,
}

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Per-problem and overall CSV tables
    Csv,
    /// Full report as JSON
    Json,
    /// Markdown summary tables
    Markdown,
}

// Default value functions
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_time_column() -> String {
    "time".to_string()
}

fn default_objective_column() -> String {
    "objective".to_string()
}

fn default_event_column() -> String {
    "type".to_string()
}

fn default_solution_event() -> String {
    "new_solution".to_string()
}

fn default_problem_column() -> String {
    "problem".to_string()
}

fn default_instance_column() -> String {
    "instance".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("analysis")
}

fn default_precision() -> usize {
    6
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Csv, ExportFormat::Json, ExportFormat::Markdown]
}

fn default_max_concurrent_loads() -> usize {
    16
}

fn default_service_name() -> String {
    "solverbench".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            layout: ResultsLayout::default(),
            time_column: default_time_column(),
            objective_column: default_objective_column(),
            event_column: default_event_column(),
            solution_event: default_solution_event(),
            problem_column: default_problem_column(),
            instance_column: default_instance_column(),
            directions_file: None,
            infer_directions: false,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            penalize_empty_traces: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            precision: default_precision(),
            formats: default_formats(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_concurrent_loads: default_max_concurrent_loads(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from configuration files and environment variables.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. solverbench.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from SOLVERBENCH_ENV)
    /// 4. The explicit configuration file, when given (must exist)
    /// 5. Environment variables (prefixed with SOLVERBENCH__)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use solverbench_common::config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::load(None).expect("Failed to load configuration");
    /// println!("Reading results from {}", config.input.results_dir.display());
    /// ```
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = std::env::var("SOLVERBENCH_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("solverbench").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Configuration file {} does not exist", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Example: SOLVERBENCH__OUTPUT__PRECISION=4
        let config = builder
            .add_source(
                config::Environment::with_prefix("SOLVERBENCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("output.formats")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let analysis_config: AnalysisConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        analysis_config.validate()?;

        Ok(analysis_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let columns = [
            ("time", &self.input.time_column),
            ("objective", &self.input.objective_column),
            ("problem", &self.input.problem_column),
            ("instance", &self.input.instance_column),
        ];
        for (name, column) in columns {
            if column.trim().is_empty() {
                anyhow::bail!("The {} column name must not be empty", name);
            }
        }

        if self.input.time_column == self.input.objective_column {
            anyhow::bail!(
                "Time and objective columns must differ (both are '{}')",
                self.input.time_column
            );
        }

        if let Some(limit) = self.scoring.time_limit {
            if !limit.is_finite() || limit <= 0.0 {
                anyhow::bail!("Time limit must be a positive number, got {}", limit);
            }
        }

        if self.output.precision > MAX_PRECISION {
            anyhow::bail!(
                "Output precision must be at most {}, got {}",
                MAX_PRECISION,
                self.output.precision
            );
        }

        if self.runtime.max_concurrent_loads == 0 {
            anyhow::bail!("Maximum concurrent loads must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.precision, 6);
        assert_eq!(config.input.time_column, "time");
        assert!(config.scoring.penalize_empty_traces);
        assert!(config.output.formats.contains(&ExportFormat::Markdown));
    }

    #[test]
    fn test_config_validation() {
        let mut config = AnalysisConfig::default();

        config.scoring.time_limit = Some(0.0);
        assert!(config.validate().is_err());
        config.scoring.time_limit = Some(300.0);
        assert!(config.validate().is_ok());

        config.output.precision = 40;
        assert!(config.validate().is_err());
        config.output.precision = 6;

        config.runtime.max_concurrent_loads = 0;
        assert!(config.validate().is_err());
        config.runtime.max_concurrent_loads = 4;

        config.input.objective_column = "time".to_string();
        assert!(config.validate().is_err());
        config.input.objective_column = "objective".to_string();

        config.telemetry.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[input]
results_dir = "runs"
time_column = "num_decisions"
infer_directions = true

[output]
precision = 3
formats = ["csv"]
"#
        )
        .unwrap();

        let config = AnalysisConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.input.results_dir, PathBuf::from("runs"));
        assert_eq!(config.input.time_column, "num_decisions");
        assert!(config.input.infer_directions);
        assert_eq!(config.output.precision, 3);
        assert_eq!(config.output.formats, vec![ExportFormat::Csv]);
        assert_eq!(config.input.objective_column, "objective");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = AnalysisConfig::load(Some(Path::new("/nonexistent/solverbench.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_rendering() {
        let rendered = AnalysisConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[input]"));
        assert!(rendered.contains("penalize_empty_traces = true"));
        let parsed: AnalysisConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AnalysisConfig::default());
    }
}
