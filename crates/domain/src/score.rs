//! Score records, instance statuses and analysis reports.
//!
//! Absent scores are `None`, never a numeric zero: a configuration that could
//! not be scored must stay distinguishable from one that performed worst.

use crate::bounds::InstanceBounds;
use crate::identifiers::{ConfigurationId, InstanceKey, ProblemId, RunKey};
use crate::objective::ObjectiveDirection;
use serde::{Deserialize, Serialize};

/// Status of one (configuration, instance) run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Both scores computed
    Scored,
    /// Objective score computed, AUC unscored because the instance is degenerate
    Partial,
    /// The run found no solution while others did
    NoSolution,
    /// The trace was rejected by the loader or the improvement check
    Excluded,
    /// The configuration has no trace for this instance
    Missing,
    /// The whole instance is unscored
    Unscored,
    /// The whole instance failed
    Failed,
}

impl RunStatus {
    /// Stable name used in tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scored => "scored",
            Self::Partial => "partial",
            Self::NoSolution => "no_solution",
            Self::Excluded => "excluded",
            Self::Missing => "missing",
            Self::Unscored => "unscored",
            Self::Failed => "failed",
        }
    }
}

/// Scores of one configuration on one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunScore {
    /// Configuration that produced the run
    pub configuration: ConfigurationId,
    /// Instance the run solved
    pub instance: InstanceKey,
    /// Normalized distance to the best known objective, `0` is best
    pub objective_score: Option<f64>,
    /// Normalized area under the objective-over-time curve, `0` is best
    pub auc_score: Option<f64>,
    /// How the scores were obtained
    pub status: RunStatus,
    /// Number of solutions reported
    pub num_solutions: usize,
    /// Best objective value reported
    pub best_objective: Option<f64>,
    /// Time of the first solution
    pub first_solution_time: Option<f64>,
    /// Time of the last solution
    pub last_solution_time: Option<f64>,
}

impl RunScore {
    /// Row for a configuration that produced no scores
    pub fn unscored(
        configuration: ConfigurationId,
        instance: InstanceKey,
        status: RunStatus,
    ) -> Self {
        Self {
            configuration,
            instance,
            objective_score: None,
            auc_score: None,
            status,
            num_solutions: 0,
            best_objective: None,
            first_solution_time: None,
            last_solution_time: None,
        }
    }

    /// True unless both scores are present
    pub fn is_unscored(&self) -> bool {
        self.objective_score.is_none() || self.auc_score.is_none()
    }

    /// Run identity
    pub fn run_key(&self) -> RunKey {
        RunKey::new(self.configuration.clone(), self.instance.clone())
    }
}

/// Why an instance (or its AUC) carries no score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscoredReason {
    /// No configuration found a solution
    NoSolutions,
    /// Every usable trace was excluded
    NoUsableTraces,
    /// Every solution has the same objective value
    DegenerateObjectiveRange,
    /// Every solution was reported at the same time
    DegenerateTimeWindow,
    /// The objective direction is unknown
    MissingDirection,
}

impl UnscoredReason {
    /// Stable name used in tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSolutions => "no_solutions",
            Self::NoUsableTraces => "no_usable_traces",
            Self::DegenerateObjectiveRange => "degenerate_objective_range",
            Self::DegenerateTimeWindow => "degenerate_time_window",
            Self::MissingDirection => "missing_direction",
        }
    }
}

/// Outcome of scoring one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Objective and AUC scores were computed
    Scored,
    /// Objective scores exist but AUC scores do not
    Degraded {
        /// Why the AUC is unscored
        reason: UnscoredReason,
    },
    /// No score at all
    Unscored {
        /// Why nothing was scored
        reason: UnscoredReason,
    },
    /// Scoring failed on an invariant violation
    Failed {
        /// Stable error code
        code: String,
        /// Human-readable error message
        message: String,
    },
}

impl InstanceStatus {
    /// Stable name used in tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scored => "scored",
            Self::Degraded { .. } => "degraded",
            Self::Unscored { .. } => "unscored",
            Self::Failed { .. } => "failed",
        }
    }

    /// Reason or error detail, empty for scored instances
    pub fn detail(&self) -> String {
        match self {
            Self::Scored => String::new(),
            Self::Degraded { reason } | Self::Unscored { reason } => reason.as_str().to_string(),
            Self::Failed { code, message } => format!("{code}: {message}"),
        }
    }
}

/// Scores and status of one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceReport {
    /// Instance identity
    pub key: InstanceKey,
    /// Objective direction used, if known
    pub direction: Option<ObjectiveDirection>,
    /// Scoring outcome
    pub status: InstanceStatus,
    /// Global bounds, when they could be computed
    pub bounds: Option<InstanceBounds>,
    /// One row per configuration, ordered by configuration
    pub runs: Vec<RunScore>,
}

/// Aggregated scores of one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Competition rank, `None` when the configuration has no scored instance
    pub rank: Option<usize>,
    /// Configuration summarized
    pub configuration: ConfigurationId,
    /// Instances where both scores are present
    pub scored: usize,
    /// Instances where at least one score is absent
    pub unscored: usize,
    /// Mean objective score over the scored instances
    pub mean_objective_score: Option<f64>,
    /// Median objective score over the scored instances
    pub median_objective_score: Option<f64>,
    /// Mean AUC score over the scored instances
    pub mean_auc_score: Option<f64>,
    /// Median AUC score over the scored instances
    pub median_auc_score: Option<f64>,
}

/// Per-problem results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemReport {
    /// Problem identity
    pub problem: ProblemId,
    /// Instances of the problem, ordered by name
    pub instances: Vec<InstanceReport>,
    /// One ranked row per configuration seen on the problem
    pub summary: Vec<SummaryRow>,
}

impl ProblemReport {
    /// Every per-instance row of the problem
    pub fn runs(&self) -> impl Iterator<Item = &RunScore> {
        self.instances.iter().flat_map(|i| i.runs.iter())
    }
}

/// A trace, or a whole results file, that was left out of scoring
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExcludedTrace {
    /// Configuration whose results were rejected
    pub configuration: ConfigurationId,
    /// Rejected instance, `None` when a whole results file was unusable
    pub instance: Option<InstanceKey>,
    /// Stable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ExcludedTrace {
    /// Record a rejected trace of one run
    pub fn run(run: &RunKey, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            configuration: run.configuration.clone(),
            instance: Some(run.instance.clone()),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Record a results file of a configuration that could not be used at all
    pub fn source(
        configuration: ConfigurationId,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            configuration,
            instance: None,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Location shown in tables: `configuration@problem/instance` or the configuration alone
    pub fn location(&self) -> String {
        match &self.instance {
            Some(instance) => format!("{}@{}", self.configuration, instance),
            None => self.configuration.to_string(),
        }
    }
}

/// Complete result of one analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Per-problem results, ordered by problem
    pub problems: Vec<ProblemReport>,
    /// Ranked summary across every problem
    pub overall: Vec<SummaryRow>,
    /// Traces left out of scoring, ordered by configuration and instance
    pub excluded: Vec<ExcludedTrace>,
}

impl AnalysisReport {
    /// Every instance report
    pub fn instances(&self) -> impl Iterator<Item = &InstanceReport> {
        self.problems.iter().flat_map(|p| p.instances.iter())
    }

    /// Find the report of one problem
    pub fn problem(&self, problem: &ProblemId) -> Option<&ProblemReport> {
        self.problems.iter().find(|p| &p.problem == problem)
    }

    /// Number of instances per status name
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for instance in self.instances() {
            match instance.status {
                InstanceStatus::Scored => counts.scored += 1,
                InstanceStatus::Degraded { .. } => counts.degraded += 1,
                InstanceStatus::Unscored { .. } => counts.unscored += 1,
                InstanceStatus::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }
}

/// Instance counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Fully scored instances
    pub scored: usize,
    /// Instances with objective scores only
    pub degraded: usize,
    /// Instances without scores
    pub unscored: usize,
    /// Instances that failed
    pub failed: usize,
}

impl StatusCounts {
    /// Total number of instances
    pub fn total(&self) -> usize {
        self.scored + self.degraded + self.unscored + self.failed
    }
}
