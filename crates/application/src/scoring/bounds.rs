//! Bound Calculator
//!
//! Derives per-configuration and global objective bounds for one instance.

use solverbench_domain::{
    ConfigurationId, InstanceBounds, ObjectiveDirection, RunBounds, ScoringError, Trace,
};

/// Extremes of one run, `None` for an empty trace
pub fn run_bounds(
    configuration: &ConfigurationId,
    trace: &Trace,
    direction: ObjectiveDirection,
) -> Option<RunBounds> {
    Some(RunBounds {
        configuration: configuration.clone(),
        upper: trace.max_objective()?,
        lower: trace.min_objective()?,
        best: trace.best_objective(direction)?,
        worst: trace.worst_objective(direction)?,
        first_time: trace.first_time()?,
        last_time: trace.last_time()?,
    })
}

/// Global bounds across runs, `None` when no run found a solution.
///
/// `time_limit`, when given, raises the end of the time window so that the
/// plateau after the last solution counts up to the end of the run.
pub fn instance_bounds(
    runs: &[RunBounds],
    direction: ObjectiveDirection,
    time_limit: Option<f64>,
) -> Option<InstanceBounds> {
    let (first, rest) = runs.split_first()?;

    let mut bounds = InstanceBounds {
        upper: first.upper,
        lower: first.lower,
        best: first.best,
        worst: first.worst,
        time_min: first.first_time,
        time_max: first.last_time,
    };

    for run in rest {
        bounds.upper = bounds.upper.max(run.upper);
        bounds.lower = bounds.lower.min(run.lower);
        bounds.best = direction.best(bounds.best, run.best);
        bounds.worst = direction.worst(bounds.worst, run.worst);
        bounds.time_min = bounds.time_min.min(run.first_time);
        bounds.time_max = bounds.time_max.max(run.last_time);
    }

    if let Some(limit) = time_limit {
        bounds.time_max = bounds.time_max.max(limit);
    }

    Some(bounds)
}

/// Check that every run's best value lies inside the global bounds
pub fn check_consistency(bounds: &InstanceBounds, runs: &[RunBounds]) -> Result<(), ScoringError> {
    if bounds.upper < bounds.lower {
        return Err(ScoringError::InvertedBounds {
            lower: bounds.lower,
            upper: bounds.upper,
        });
    }

    match runs
        .iter()
        .find(|run| run.best < bounds.lower || run.best > bounds.upper)
    {
        Some(run) => Err(ScoringError::BoundsInconsistent {
            configuration: run.configuration.clone(),
            best: run.best,
            lower: bounds.lower,
            upper: bounds.upper,
        }),
        None => Ok(()),
    }
}
