//! Solution points and solver traces.
//!
//! A [`Trace`] is the sequence of improving incumbent solutions that one
//! configuration reported on one instance. An empty trace is valid: the run
//! found no solution before its timeout.

use crate::errors::CorruptTraceError;
use crate::objective::ObjectiveDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One incumbent solution reported during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionPoint {
    /// Time (or other monotone axis value) at which the solution was reported
    pub time: f64,

    /// Objective value of the solution
    pub objective: f64,

    /// Additional solver statistics, passed through uninterpreted
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl SolutionPoint {
    /// Create a solution point without pass-through columns
    pub fn new(time: f64, objective: f64) -> Self {
        Self {
            time,
            objective,
            extra: BTreeMap::new(),
        }
    }

    /// Attach a pass-through column value
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }
}

/// Validated, time-ordered sequence of solution points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SolutionPoint>", into = "Vec<SolutionPoint>")]
pub struct Trace {
    points: Vec<SolutionPoint>,
}

impl Trace {
    /// Build a trace, validating values and time ordering.
    ///
    /// Times must be finite, non-negative and strictly increasing in the given
    /// order; objectives must be finite. Out-of-order points are rejected, not
    /// reordered.
    pub fn new(points: Vec<SolutionPoint>) -> Result<Self, CorruptTraceError> {
        for (index, point) in points.iter().enumerate() {
            if !point.time.is_finite() {
                return Err(CorruptTraceError::NonFiniteValue {
                    index,
                    column: "time".to_string(),
                });
            }
            if !point.objective.is_finite() {
                return Err(CorruptTraceError::NonFiniteValue {
                    index,
                    column: "objective".to_string(),
                });
            }
            if point.time < 0.0 {
                return Err(CorruptTraceError::NegativeTime {
                    index,
                    time: point.time,
                });
            }
        }

        if let Some(index) = points.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(CorruptTraceError::NonMonotonicTime {
                index: index + 1,
                previous: points[index].time,
                current: points[index + 1].time,
            });
        }

        Ok(Self { points })
    }

    /// Trace of a run that found no solution
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Solution points in time order
    pub fn points(&self) -> &[SolutionPoint] {
        &self.points
    }

    /// Number of solutions found
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the run found no solution
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time of the first solution
    pub fn first_time(&self) -> Option<f64> {
        self.points.first().map(|p| p.time)
    }

    /// Time of the last solution
    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time)
    }

    /// Smallest objective value in the trace
    pub fn min_objective(&self) -> Option<f64> {
        self.points.iter().map(|p| p.objective).reduce(f64::min)
    }

    /// Largest objective value in the trace
    pub fn max_objective(&self) -> Option<f64> {
        self.points.iter().map(|p| p.objective).reduce(f64::max)
    }

    /// Best objective value for the given direction
    pub fn best_objective(&self, direction: ObjectiveDirection) -> Option<f64> {
        match direction {
            ObjectiveDirection::Minimize => self.min_objective(),
            ObjectiveDirection::Maximize => self.max_objective(),
        }
    }

    /// Worst objective value for the given direction
    pub fn worst_objective(&self, direction: ObjectiveDirection) -> Option<f64> {
        match direction {
            ObjectiveDirection::Minimize => self.max_objective(),
            ObjectiveDirection::Maximize => self.min_objective(),
        }
    }

    /// Check that every step keeps or improves the objective
    pub fn check_improving(&self, direction: ObjectiveDirection) -> Result<(), CorruptTraceError> {
        match self
            .points
            .windows(2)
            .position(|w| direction.is_worsening(w[0].objective, w[1].objective))
        {
            Some(index) => Err(CorruptTraceError::NotImproving {
                index: index + 1,
                direction,
                previous: self.points[index].objective,
                current: self.points[index + 1].objective,
            }),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<SolutionPoint>> for Trace {
    type Error = CorruptTraceError;

    fn try_from(points: Vec<SolutionPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Trace> for Vec<SolutionPoint> {
    fn from(trace: Trace) -> Self {
        trace.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trace_is_valid() {
        let trace = Trace::new(vec![]).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.best_objective(ObjectiveDirection::Minimize), None);
        assert_eq!(trace.first_time(), None);
    }

    #[test]
    fn test_extremes() {
        let trace = Trace::new(vec![SolutionPoint::new(1.0, 10.0), SolutionPoint::new(3.0, 4.0)])
            .unwrap();
        assert_eq!(trace.min_objective(), Some(4.0));
        assert_eq!(trace.max_objective(), Some(10.0));
        assert_eq!(trace.best_objective(ObjectiveDirection::Maximize), Some(10.0));
        assert_eq!(trace.worst_objective(ObjectiveDirection::Minimize), Some(10.0));
        assert_eq!(trace.last_time(), Some(3.0));
    }

    #[test]
    fn test_rejects_time_going_backwards() {
        let err = Trace::new(vec![SolutionPoint::new(5.0, 3.0), SolutionPoint::new(3.0, 2.0)])
            .unwrap_err();
        assert_eq!(
            err,
            CorruptTraceError::NonMonotonicTime {
                index: 1,
                previous: 5.0,
                current: 3.0
            }
        );
    }

    #[test]
    fn test_rejects_repeated_time() {
        let result = Trace::new(vec![SolutionPoint::new(2.0, 3.0), SolutionPoint::new(2.0, 2.0)]);
        assert!(matches!(result, Err(CorruptTraceError::NonMonotonicTime { .. })));
    }

    #[test]
    fn test_rejects_negative_time_and_nan() {
        assert!(matches!(
            Trace::new(vec![SolutionPoint::new(-1.0, 3.0)]),
            Err(CorruptTraceError::NegativeTime { .. })
        ));
        assert!(matches!(
            Trace::new(vec![SolutionPoint::new(1.0, f64::NAN)]),
            Err(CorruptTraceError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_check_improving() {
        let trace = Trace::new(vec![
            SolutionPoint::new(1.0, 10.0),
            SolutionPoint::new(2.0, 12.0),
        ])
        .unwrap();
        assert!(trace.check_improving(ObjectiveDirection::Maximize).is_ok());
        assert!(matches!(
            trace.check_improving(ObjectiveDirection::Minimize),
            Err(CorruptTraceError::NotImproving { index: 1, .. })
        ));
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"[{"time": 2.0, "objective": 1.0}, {"time": 1.0, "objective": 0.0}]"#;
        assert!(serde_json::from_str::<Trace>(json).is_err());

        let json = r#"[{"time": 1.0, "objective": 1.0, "extra": {"num_decisions": "12"}}]"#;
        let trace: Trace = serde_json::from_str(json).unwrap();
        assert_eq!(trace.points()[0].extra["num_decisions"], "12");
    }
}
