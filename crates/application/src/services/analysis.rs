//! Analysis Service
//!
//! Loads every trace of a results source concurrently, then scores the whole
//! set with the scoring engine.

use super::{ServiceConfig, TraceRepository};
use crate::scoring::{AnalysisInput, ScoringEngine};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use solverbench_domain::{
    AnalysisError, AnalysisReport, AnalysisResult, ConfigurationId, DirectionMap, ExcludedTrace,
    ObjectiveDirection, RunKey, Trace, TraceError,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of checking every trace without scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    /// Configurations found
    pub configurations: Vec<ConfigurationId>,
    /// Number of runs found
    pub runs: usize,
    /// Number of runs whose trace loaded cleanly
    pub valid: usize,
    /// Rejected traces and results files
    pub rejected: Vec<ExcludedTrace>,
}

impl ValidationSummary {
    /// True when nothing was rejected
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// One trace with the direction it would be scored in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectedTrace {
    /// Run identity
    pub run: RunKey,
    /// Configured direction, if any
    pub direction: Option<ObjectiveDirection>,
    /// The loaded trace
    pub trace: Trace,
    /// Why the trace would be excluded for its direction, if it would be
    pub improvement_error: Option<String>,
}

/// Analysis service
pub struct AnalysisService<R>
where
    R: TraceRepository,
{
    repository: Arc<R>,
    engine: ScoringEngine,
    directions: DirectionMap,
    config: ServiceConfig,
}

impl<R> AnalysisService<R>
where
    R: TraceRepository,
{
    pub fn new(
        repository: Arc<R>,
        engine: ScoringEngine,
        directions: DirectionMap,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            engine,
            directions,
            config,
        }
    }

    /// Direction map used for scoring
    pub fn directions(&self) -> &DirectionMap {
        &self.directions
    }

    /// Load every trace of the repository
    #[instrument(skip(self), fields(max_concurrent_loads = self.config.max_concurrent_loads))]
    pub async fn load(&self) -> AnalysisResult<AnalysisInput> {
        let catalog = self.repository.catalog().await?;
        info!(
            configurations = catalog.configurations.len(),
            runs = catalog.runs.len(),
            "Loading traces"
        );

        let loaded: Vec<(RunKey, Result<Trace, TraceError>)> = stream::iter(catalog.runs)
            .map(|run| {
                let repository = Arc::clone(&self.repository);
                async move {
                    let loaded = repository.load_trace(&run).await;
                    (run, loaded)
                }
            })
            .buffer_unordered(self.config.max_concurrent_loads.max(1))
            .collect()
            .await;

        let mut input = AnalysisInput::new();
        input.configurations.extend(catalog.configurations);

        for rejected in &catalog.rejected {
            warn!(
                source = %rejected.location(),
                code = %rejected.code,
                error = %rejected.message,
                "Excluding results file"
            );
        }
        input.rejected_sources = catalog.rejected;

        for (run, loaded) in loaded {
            match &loaded {
                Ok(trace) => debug!(run = %run, solutions = trace.len(), "Trace loaded"),
                Err(error) => warn!(
                    run = %run,
                    code = error.error_code(),
                    error = %error,
                    "Excluding trace"
                ),
            }
            input.add(run, loaded);
        }

        Ok(input)
    }

    /// Load and score every trace
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> AnalysisResult<AnalysisReport> {
        let input = self.load().await?;
        Ok(self.engine.analyze(&input, &self.directions))
    }

    /// Load every trace and report the rejected ones without scoring
    #[instrument(skip(self))]
    pub async fn validate(&self) -> AnalysisResult<ValidationSummary> {
        let input = self.load().await?;

        let mut rejected = input.rejected_sources.clone();
        for runs in input.instances.values() {
            for (configuration, error) in &runs.rejected {
                let run = RunKey::new(configuration.clone(), runs.key.clone());
                rejected.push(ExcludedTrace::run(&run, error.error_code(), error.to_string()));
            }
            if let Some(direction) = self.directions.lookup(&runs.key) {
                for (configuration, trace) in &runs.traces {
                    if let Err(error) = trace.check_improving(direction) {
                        let run = RunKey::new(configuration.clone(), runs.key.clone());
                        let error = TraceError::from(error);
                        rejected.push(ExcludedTrace::run(&run, error.error_code(), error.to_string()));
                    }
                }
            }
        }
        rejected.sort();

        let runs = input.run_count();
        let invalid_runs = rejected.iter().filter(|r| r.instance.is_some()).count();

        Ok(ValidationSummary {
            configurations: input.configurations.into_iter().collect(),
            runs,
            valid: runs.saturating_sub(invalid_runs),
            rejected,
        })
    }

    /// Load a single trace
    #[instrument(skip(self, run), fields(run = %run))]
    pub async fn inspect(&self, run: &RunKey) -> AnalysisResult<InspectedTrace> {
        let catalog = self.repository.catalog().await?;
        if !catalog.runs.contains(run) {
            return Err(AnalysisError::Source(format!("no trace found for {}", run)));
        }

        let trace = self.repository.load_trace(run).await?;
        let direction = self.directions.lookup(&run.instance);
        let improvement_error = direction
            .and_then(|d| trace.check_improving(d).err())
            .map(|e| e.to_string());

        Ok(InspectedTrace {
            run: run.clone(),
            direction,
            trace,
            improvement_error,
        })
    }
}
