//! Objective direction of an optimization instance.

use crate::identifiers::{InstanceKey, ProblemId};
use crate::trace::Trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether smaller or larger objective values are better
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveDirection {
    /// Smaller objective values are better
    Minimize,
    /// Larger objective values are better
    Maximize,
}

impl ObjectiveDirection {
    /// Return the better of two objective values
    pub fn best(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Minimize => a.min(b),
            Self::Maximize => a.max(b),
        }
    }

    /// Return the worse of two objective values
    pub fn worst(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Minimize => a.max(b),
            Self::Maximize => a.min(b),
        }
    }

    /// True when moving from `previous` to `next` makes the objective worse
    pub fn is_worsening(&self, previous: f64, next: f64) -> bool {
        match self {
            Self::Minimize => next > previous,
            Self::Maximize => next < previous,
        }
    }

    /// Arrow used in reports
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Minimize => "↓",
            Self::Maximize => "↑",
        }
    }

    /// Parse a direction name, accepting common spellings
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "min" | "minimize" | "minimise" | "minimization" => Some(Self::Minimize),
            "max" | "maximize" | "maximise" | "maximization" => Some(Self::Maximize),
            _ => None,
        }
    }

    /// Infer the direction of a problem from the traces of its runs.
    ///
    /// A run that ever increases its objective marks the problem as a
    /// maximization problem; otherwise it is a minimization problem. A run that
    /// both increases and decreases, or a problem mixing increasing and
    /// decreasing runs, cannot be classified.
    pub fn infer<'a>(
        traces: impl IntoIterator<Item = &'a Trace>,
    ) -> Result<Self, DirectionInferenceError> {
        let mut increasing = 0usize;
        let mut decreasing = 0usize;

        for trace in traces {
            let objectives: Vec<f64> = trace.points().iter().map(|p| p.objective).collect();
            let up = objectives.windows(2).any(|w| w[1] > w[0]);
            let down = objectives.windows(2).any(|w| w[1] < w[0]);

            if up && down {
                return Err(DirectionInferenceError::NonMonotonicRun);
            }
            if up {
                increasing += 1;
            }
            if down {
                decreasing += 1;
            }
        }

        if increasing > 0 && decreasing > 0 {
            return Err(DirectionInferenceError::MixedRuns {
                increasing,
                decreasing,
            });
        }

        Ok(if increasing > 0 {
            Self::Maximize
        } else {
            Self::Minimize
        })
    }
}

impl fmt::Display for ObjectiveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimize => write!(f, "minimize"),
            Self::Maximize => write!(f, "maximize"),
        }
    }
}

/// Objective directions keyed by problem, with per-instance overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionMap {
    problems: BTreeMap<ProblemId, ObjectiveDirection>,
    instances: BTreeMap<InstanceKey, ObjectiveDirection>,
}

impl DirectionMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction of every instance of a problem
    pub fn insert_problem(&mut self, problem: impl Into<ProblemId>, direction: ObjectiveDirection) {
        self.problems.insert(problem.into(), direction);
    }

    /// Set the direction of one instance, overriding its problem
    pub fn insert_instance(&mut self, instance: InstanceKey, direction: ObjectiveDirection) {
        self.instances.insert(instance, direction);
    }

    /// Builder-style variant of [`DirectionMap::insert_problem`]
    pub fn with_problem(
        mut self,
        problem: impl Into<ProblemId>,
        direction: ObjectiveDirection,
    ) -> Self {
        self.insert_problem(problem, direction);
        self
    }

    /// Direction configured for a problem
    pub fn problem(&self, problem: &ProblemId) -> Option<ObjectiveDirection> {
        self.problems.get(problem).copied()
    }

    /// Direction of an instance: its own override, else its problem's
    pub fn lookup(&self, instance: &InstanceKey) -> Option<ObjectiveDirection> {
        self.instances
            .get(instance)
            .copied()
            .or_else(|| self.problem(&instance.problem))
    }

    /// True when nothing is configured
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty() && self.instances.is_empty()
    }

    /// Number of problem entries and instance overrides
    pub fn len(&self) -> usize {
        self.problems.len() + self.instances.len()
    }
}

/// Reasons a direction cannot be inferred from traces
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionInferenceError {
    /// A single run both increased and decreased its objective
    #[error("a run has a non-monotonic objective")]
    NonMonotonicRun,

    /// Runs of the same problem move in opposite directions
    #[error("{decreasing} decreasing and {increasing} increasing runs")]
    MixedRuns {
        /// Number of runs with an increasing objective
        increasing: usize,
        /// Number of runs with a decreasing objective
        decreasing: usize,
    },
}
