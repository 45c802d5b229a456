//! Scoring Engine - Per-instance scoring and report assembly
//!
//! The scoring engine resolves objective directions, runs the bound and score
//! calculators on every instance, and aggregates the resulting scores into
//! per-problem and overall summaries. It is synchronous and pure: the same
//! input always yields the same report.

use crate::scoring::aggregation;
use crate::scoring::bounds::{check_consistency, instance_bounds, run_bounds};
use crate::scoring::calculator::{auc_score, objective_score};
use serde::{Deserialize, Serialize};
use solverbench_common::AnalysisConfig;
use solverbench_domain::{
    AnalysisReport, ConfigurationId, DirectionMap, ExcludedTrace, InstanceBounds, InstanceKey,
    InstanceReport, InstanceStatus, ObjectiveDirection, ProblemId, ProblemReport, RunBounds,
    RunKey, RunScore, RunStatus, ScoringError, Trace, TraceError, UnscoredReason,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Scoring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEngineConfig {
    /// Run time limit; extends the AUC time window when set
    pub time_limit: Option<f64>,
    /// Give empty traces the worst scores instead of leaving them unscored
    pub penalize_empty_traces: bool,
    /// Infer the direction of problems missing from the direction map
    pub infer_directions: bool,
}

impl Default for ScoringEngineConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            penalize_empty_traces: true,
            infer_directions: false,
        }
    }
}

impl From<&AnalysisConfig> for ScoringEngineConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            time_limit: config.scoring.time_limit,
            penalize_empty_traces: config.scoring.penalize_empty_traces,
            infer_directions: config.input.infer_directions,
        }
    }
}

/// Traces of one instance, keyed by configuration
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRuns {
    /// Instance identity
    pub key: InstanceKey,
    /// Successfully loaded traces
    pub traces: BTreeMap<ConfigurationId, Trace>,
    /// Traces the loader rejected
    pub rejected: BTreeMap<ConfigurationId, TraceError>,
}

impl InstanceRuns {
    /// Create an instance without runs
    pub fn new(key: InstanceKey) -> Self {
        Self {
            key,
            traces: BTreeMap::new(),
            rejected: BTreeMap::new(),
        }
    }

    /// Add a loaded trace
    pub fn with_trace(mut self, configuration: impl Into<ConfigurationId>, trace: Trace) -> Self {
        self.traces.insert(configuration.into(), trace);
        self
    }

    /// Add a trace the loader rejected
    pub fn with_rejected(
        mut self,
        configuration: impl Into<ConfigurationId>,
        error: TraceError,
    ) -> Self {
        self.rejected.insert(configuration.into(), error);
        self
    }

    /// Every configuration that has a trace or a rejected trace here
    pub fn configurations(&self) -> impl Iterator<Item = &ConfigurationId> {
        self.traces.keys().chain(self.rejected.keys())
    }
}

/// Everything loaded from a results source, ready to score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisInput {
    /// Every configuration known to the source
    pub configurations: BTreeSet<ConfigurationId>,
    /// Runs grouped by instance
    pub instances: BTreeMap<InstanceKey, InstanceRuns>,
    /// Whole results files that could not be split into traces
    pub rejected_sources: Vec<ExcludedTrace>,
}

impl AnalysisInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of loading one run
    pub fn add(&mut self, run: RunKey, loaded: Result<Trace, TraceError>) {
        self.configurations.insert(run.configuration.clone());
        let entry = self
            .instances
            .entry(run.instance.clone())
            .or_insert_with(|| InstanceRuns::new(run.instance.clone()));
        match loaded {
            Ok(trace) => {
                entry.traces.insert(run.configuration, trace);
            }
            Err(error) => {
                entry.rejected.insert(run.configuration, error);
            }
        }
    }

    /// Builder-style variant of [`AnalysisInput::add`] for loaded traces
    pub fn with_trace(mut self, run: RunKey, trace: Trace) -> Self {
        self.add(run, Ok(trace));
        self
    }

    /// Number of runs, loaded or rejected
    pub fn run_count(&self) -> usize {
        self.instances
            .values()
            .map(|i| i.traces.len() + i.rejected.len())
            .sum()
    }
}

/// Scoring result of one instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceOutcome {
    /// Report of the instance
    pub report: InstanceReport,
    /// Traces excluded while scoring the instance
    pub excluded: Vec<ExcludedTrace>,
}

/// The main scoring engine
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringEngineConfig,
}

impl ScoringEngine {
    /// Create a new scoring engine
    pub fn new(config: ScoringEngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration
    pub fn config(&self) -> &ScoringEngineConfig {
        &self.config
    }

    /// Score every instance of the input and aggregate the results
    #[instrument(
        skip(self, input, directions),
        fields(
            configurations = input.configurations.len(),
            instances = input.instances.len()
        )
    )]
    pub fn analyze(&self, input: &AnalysisInput, directions: &DirectionMap) -> AnalysisReport {
        let mut by_problem: BTreeMap<&ProblemId, Vec<&InstanceRuns>> = BTreeMap::new();
        for runs in input.instances.values() {
            by_problem.entry(&runs.key.problem).or_default().push(runs);
        }

        let mut excluded = input.rejected_sources.clone();
        let mut problems = Vec::with_capacity(by_problem.len());

        for (problem, instances) in by_problem {
            let problem_direction = self.resolve_direction(problem, &instances, directions);

            let mut reports = Vec::with_capacity(instances.len());
            for runs in instances {
                let outcome = match (directions.lookup(&runs.key), &problem_direction) {
                    (Some(direction), _) => {
                        self.score_instance(runs, Some(direction), &input.configurations)
                    }
                    (None, Ok(direction)) => {
                        self.score_instance(runs, *direction, &input.configurations)
                    }
                    (None, Err(error)) => self.fail_instance(runs, &input.configurations, error),
                };
                excluded.extend(outcome.excluded);
                reports.push(outcome.report);
            }

            let summary = aggregation::summarize(
                &input.configurations,
                reports.iter().flat_map(|r| r.runs.iter()),
            );

            problems.push(ProblemReport {
                problem: problem.clone(),
                instances: reports,
                summary,
            });
        }

        let overall = aggregation::summarize(
            &input.configurations,
            problems.iter().flat_map(|p| p.runs()),
        );
        excluded.sort();

        let report = AnalysisReport {
            problems,
            overall,
            excluded,
        };

        let counts = report.status_counts();
        info!(
            problems = report.problems.len(),
            scored = counts.scored,
            degraded = counts.degraded,
            unscored = counts.unscored,
            failed = counts.failed,
            excluded = report.excluded.len(),
            "Analysis complete"
        );

        report
    }

    /// Direction of a problem from the map, or inferred from its traces
    pub fn resolve_direction(
        &self,
        problem: &ProblemId,
        instances: &[&InstanceRuns],
        directions: &DirectionMap,
    ) -> Result<Option<ObjectiveDirection>, ScoringError> {
        if let Some(direction) = directions.problem(problem) {
            return Ok(Some(direction));
        }
        if !self.config.infer_directions {
            return Ok(None);
        }

        let traces = instances.iter().flat_map(|runs| runs.traces.values());
        match ObjectiveDirection::infer(traces) {
            Ok(direction) => {
                debug!(problem = %problem, direction = %direction, "Inferred objective direction");
                Ok(Some(direction))
            }
            Err(source) => {
                warn!(problem = %problem, error = %source, "Cannot infer objective direction");
                Err(ScoringError::DirectionInference {
                    problem: problem.clone(),
                    source,
                })
            }
        }
    }

    /// Score one instance.
    ///
    /// Every configuration in `configurations` gets a row; those without a
    /// trace are marked missing.
    pub fn score_instance(
        &self,
        runs: &InstanceRuns,
        direction: Option<ObjectiveDirection>,
        configurations: &BTreeSet<ConfigurationId>,
    ) -> InstanceOutcome {
        let mut rows = Self::initial_rows(runs, configurations);
        let mut excluded = Self::rejected(runs);

        let Some(direction) = direction else {
            debug!(instance = %runs.key, "No objective direction, leaving instance unscored");
            for configuration in runs.traces.keys() {
                Self::set_status(&mut rows, configuration, RunStatus::Unscored);
            }
            return Self::outcome(
                runs,
                None,
                InstanceStatus::Unscored {
                    reason: UnscoredReason::MissingDirection,
                },
                None,
                rows,
                excluded,
            );
        };

        let mut usable: Vec<(&ConfigurationId, &Trace)> = Vec::with_capacity(runs.traces.len());
        for (configuration, trace) in &runs.traces {
            match trace.check_improving(direction) {
                Ok(()) => usable.push((configuration, trace)),
                Err(error) => {
                    let run = RunKey::new(configuration.clone(), runs.key.clone());
                    warn!(run = %run, error = %error, "Excluding trace");
                    let error = TraceError::from(error);
                    excluded.push(ExcludedTrace::run(&run, error.error_code(), error.to_string()));
                    Self::set_status(&mut rows, configuration, RunStatus::Excluded);
                }
            }
        }

        for (configuration, trace) in &usable {
            if let Some(row) = rows.get_mut(*configuration) {
                row.num_solutions = trace.len();
                row.best_objective = trace.best_objective(direction);
                row.first_solution_time = trace.first_time();
                row.last_solution_time = trace.last_time();
                row.status = RunStatus::Unscored;
            }
        }

        if usable.is_empty() {
            return Self::outcome(
                runs,
                Some(direction),
                InstanceStatus::Unscored {
                    reason: UnscoredReason::NoUsableTraces,
                },
                None,
                rows,
                excluded,
            );
        }

        let extremes: Vec<RunBounds> = usable
            .iter()
            .filter_map(|(configuration, trace)| run_bounds(configuration, trace, direction))
            .collect();

        let Some(bounds) = instance_bounds(&extremes, direction, self.config.time_limit) else {
            return Self::outcome(
                runs,
                Some(direction),
                InstanceStatus::Unscored {
                    reason: UnscoredReason::NoSolutions,
                },
                None,
                rows,
                excluded,
            );
        };

        if let Err(error) = check_consistency(&bounds, &extremes) {
            warn!(instance = %runs.key, error = %error, "Instance failed");
            for (configuration, _) in &usable {
                Self::set_status(&mut rows, configuration, RunStatus::Failed);
            }
            return Self::outcome(
                runs,
                Some(direction),
                InstanceStatus::Failed {
                    code: error.error_code().to_string(),
                    message: error.to_string(),
                },
                Some(bounds),
                rows,
                excluded,
            );
        }

        let area = bounds.area();
        for (configuration, trace) in &usable {
            let Some(row) = rows.get_mut(*configuration) else {
                continue;
            };
            match trace.best_objective(direction) {
                Some(best) => {
                    row.objective_score = Some(objective_score(best, &bounds));
                    row.auc_score = auc_score(trace, &bounds, direction);
                    row.status = if row.auc_score.is_some() {
                        RunStatus::Scored
                    } else {
                        RunStatus::Partial
                    };
                }
                None => {
                    row.status = RunStatus::NoSolution;
                    if self.config.penalize_empty_traces {
                        row.objective_score = (bounds.objective_range() > 0.0).then_some(1.0);
                        row.auc_score = area.map(|_| 1.0);
                    }
                }
            }
        }

        let status = match area {
            Some(_) => InstanceStatus::Scored,
            None if bounds.objective_range() <= 0.0 => InstanceStatus::Degraded {
                reason: UnscoredReason::DegenerateObjectiveRange,
            },
            None => InstanceStatus::Degraded {
                reason: UnscoredReason::DegenerateTimeWindow,
            },
        };

        debug!(instance = %runs.key, status = status.as_str(), "Instance scored");
        Self::outcome(runs, Some(direction), status, Some(bounds), rows, excluded)
    }

    /// Report an instance whose direction could not be determined
    pub fn fail_instance(
        &self,
        runs: &InstanceRuns,
        configurations: &BTreeSet<ConfigurationId>,
        error: &ScoringError,
    ) -> InstanceOutcome {
        let mut rows = Self::initial_rows(runs, configurations);
        for configuration in runs.traces.keys() {
            Self::set_status(&mut rows, configuration, RunStatus::Failed);
        }
        Self::outcome(
            runs,
            None,
            InstanceStatus::Failed {
                code: error.error_code().to_string(),
                message: error.to_string(),
            },
            None,
            rows,
            Self::rejected(runs),
        )
    }

    fn initial_rows(
        runs: &InstanceRuns,
        configurations: &BTreeSet<ConfigurationId>,
    ) -> BTreeMap<ConfigurationId, RunScore> {
        let mut rows: BTreeMap<ConfigurationId, RunScore> = configurations
            .iter()
            .chain(runs.configurations())
            .map(|configuration| {
                (
                    configuration.clone(),
                    RunScore::unscored(configuration.clone(), runs.key.clone(), RunStatus::Missing),
                )
            })
            .collect();
        for configuration in runs.rejected.keys() {
            Self::set_status(&mut rows, configuration, RunStatus::Excluded);
        }
        rows
    }

    fn rejected(runs: &InstanceRuns) -> Vec<ExcludedTrace> {
        runs.rejected
            .iter()
            .map(|(configuration, error)| {
                let run = RunKey::new(configuration.clone(), runs.key.clone());
                ExcludedTrace::run(&run, error.error_code(), error.to_string())
            })
            .collect()
    }

    fn set_status(
        rows: &mut BTreeMap<ConfigurationId, RunScore>,
        configuration: &ConfigurationId,
        status: RunStatus,
    ) {
        if let Some(row) = rows.get_mut(configuration) {
            row.status = status;
        }
    }

    fn outcome(
        runs: &InstanceRuns,
        direction: Option<ObjectiveDirection>,
        status: InstanceStatus,
        bounds: Option<InstanceBounds>,
        rows: BTreeMap<ConfigurationId, RunScore>,
        excluded: Vec<ExcludedTrace>,
    ) -> InstanceOutcome {
        InstanceOutcome {
            report: InstanceReport {
                key: runs.key.clone(),
                direction,
                status,
                bounds,
                runs: rows.into_values().collect(),
            },
            excluded,
        }
    }
}

/// Builder for ScoringEngine
#[derive(Debug, Default)]
pub struct ScoringEngineBuilder {
    config: ScoringEngineConfig,
}

impl ScoringEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: ScoringEngineConfig::default(),
        }
    }

    pub fn config(mut self, config: ScoringEngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn time_limit(mut self, limit: Option<f64>) -> Self {
        self.config.time_limit = limit;
        self
    }

    pub fn penalize_empty_traces(mut self, penalize: bool) -> Self {
        self.config.penalize_empty_traces = penalize;
        self
    }

    pub fn infer_directions(mut self, infer: bool) -> Self {
        self.config.infer_directions = infer;
        self
    }

    pub fn build(self) -> ScoringEngine {
        ScoringEngine::new(self.config)
    }
}
