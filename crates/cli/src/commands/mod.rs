//! CLI commands

pub mod analyze;
pub mod config;
pub mod inspect;
pub mod show;
pub mod validate;

use crate::output::OutputFormat;
use anyhow::Result;
use clap::{Args, ValueEnum};
use solverbench_application::{AnalysisService, ScoringEngine, ScoringEngineConfig, ServiceConfig};
use solverbench_common::{AnalysisConfig, ResultsLayout};
use solverbench_domain::DirectionMap;
use solverbench_infrastructure::{load_directions, ResultsStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Results directory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Detect per configuration directory
    Auto,
    /// One CSV file per instance
    PerInstance,
    /// One results.csv per configuration
    Combined,
}

impl From<LayoutArg> for ResultsLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Auto => ResultsLayout::Auto,
            LayoutArg::PerInstance => ResultsLayout::PerInstance,
            LayoutArg::Combined => ResultsLayout::Combined,
        }
    }
}

/// Input options shared by every command that reads results
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Results directory, one subdirectory per configuration
    #[arg(value_name = "RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Direction map file (TOML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    pub directions: Option<PathBuf>,

    /// Infer directions of problems missing from the direction map
    #[arg(long)]
    pub infer_directions: bool,

    /// Results directory layout
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Column holding the time axis
    #[arg(long, value_name = "COLUMN")]
    pub time_column: Option<String>,

    /// Column holding the objective value
    #[arg(long, value_name = "COLUMN")]
    pub objective_column: Option<String>,

    /// Run time limit, extends every instance's time window
    #[arg(long, value_name = "SECONDS")]
    pub time_limit: Option<f64>,

    /// Leave runs without solutions unscored instead of scoring them worst
    #[arg(long)]
    pub no_empty_penalty: bool,

    /// Maximum number of traces loaded at once
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl InputArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AnalysisConfig) -> Result<()> {
        if let Some(dir) = &self.results_dir {
            config.input.results_dir = dir.clone();
        }
        if let Some(path) = &self.directions {
            config.input.directions_file = Some(path.clone());
        }
        if self.infer_directions {
            config.input.infer_directions = true;
        }
        if let Some(layout) = self.layout {
            config.input.layout = layout.into();
        }
        if let Some(column) = &self.time_column {
            config.input.time_column = column.clone();
        }
        if let Some(column) = &self.objective_column {
            config.input.objective_column = column.clone();
        }
        if let Some(limit) = self.time_limit {
            config.scoring.time_limit = Some(limit);
        }
        if self.no_empty_penalty {
            config.scoring.penalize_empty_traces = false;
        }
        if let Some(jobs) = self.jobs {
            config.runtime.max_concurrent_loads = jobs;
        }

        config.validate()
    }
}

/// Context passed to all commands
pub struct CommandContext {
    pub config: AnalysisConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: AnalysisConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Direction map from the configured file, empty when none is set
    pub fn directions(&self) -> Result<DirectionMap> {
        match &self.config.input.directions_file {
            Some(path) => load_directions(path),
            None => Ok(DirectionMap::new()),
        }
    }

    /// Build the analysis service over the configured results directory
    pub fn service(&self) -> Result<AnalysisService<ResultsStore>> {
        let store = ResultsStore::from_config(&self.config.input);
        Ok(AnalysisService::new(
            Arc::new(store),
            ScoringEngine::new(ScoringEngineConfig::from(&self.config)),
            self.directions()?,
            ServiceConfig::from(&self.config),
        ))
    }

    /// Whether spinners should be hidden
    pub fn quiet(&self) -> bool {
        self.format.is_machine_readable()
    }
}
