//! Tests for trace validation and direction inference
//!
//! Tests Trace construction rules and ObjectiveDirection inference across runs.

use proptest::prelude::*;
use solverbench_domain::{
    CorruptTraceError, DirectionInferenceError, ObjectiveDirection, SolutionPoint, Trace,
};

fn trace(points: &[(f64, f64)]) -> Trace {
    Trace::new(points.iter().map(|&(t, o)| SolutionPoint::new(t, o)).collect()).unwrap()
}

// ============================================================================
// Trace Construction Tests
// ============================================================================

#[test]
fn test_single_point_trace() {
    let t = trace(&[(0.0, 7.0)]);
    assert_eq!(t.len(), 1);
    assert_eq!(t.first_time(), Some(0.0));
    assert_eq!(t.last_time(), Some(0.0));
    assert_eq!(t.best_objective(ObjectiveDirection::Minimize), Some(7.0));
    assert_eq!(t.worst_objective(ObjectiveDirection::Minimize), Some(7.0));
}

#[test]
fn test_out_of_order_points_are_not_reordered() {
    let result = Trace::new(vec![
        SolutionPoint::new(1.0, 10.0),
        SolutionPoint::new(4.0, 8.0),
        SolutionPoint::new(2.0, 6.0),
    ]);
    assert_eq!(
        result,
        Err(CorruptTraceError::NonMonotonicTime {
            index: 2,
            previous: 4.0,
            current: 2.0,
        })
    );
}

#[test]
fn test_infinite_time_is_rejected() {
    let result = Trace::new(vec![SolutionPoint::new(f64::INFINITY, 1.0)]);
    assert_eq!(
        result,
        Err(CorruptTraceError::NonFiniteValue {
            index: 0,
            column: "time".to_string(),
        })
    );
}

#[test]
fn test_plateau_is_improving_in_both_directions() {
    let t = trace(&[(1.0, 5.0), (2.0, 5.0)]);
    assert!(t.check_improving(ObjectiveDirection::Minimize).is_ok());
    assert!(t.check_improving(ObjectiveDirection::Maximize).is_ok());
}

#[test]
fn test_extra_columns_survive() {
    let t = Trace::new(vec![
        SolutionPoint::new(1.0, 5.0).with_extra("num_conflicts", "40"),
    ])
    .unwrap();
    assert_eq!(t.points()[0].extra.get("num_conflicts").map(String::as_str), Some("40"));
}

// ============================================================================
// Direction Inference Tests
// ============================================================================

#[test]
fn test_infer_defaults_to_minimize_without_movement() {
    let traces = [trace(&[(1.0, 3.0)]), Trace::empty()];
    assert_eq!(
        ObjectiveDirection::infer(traces.iter()),
        Ok(ObjectiveDirection::Minimize)
    );
}

#[test]
fn test_infer_with_no_traces() {
    assert_eq!(
        ObjectiveDirection::infer(std::iter::empty()),
        Ok(ObjectiveDirection::Minimize)
    );
}

#[test]
fn test_infer_counts_mixed_runs() {
    let traces = [
        trace(&[(1.0, 1.0), (2.0, 2.0)]),
        trace(&[(1.0, 1.0), (2.0, 3.0)]),
        trace(&[(1.0, 9.0), (2.0, 3.0)]),
    ];
    assert_eq!(
        ObjectiveDirection::infer(traces.iter()),
        Err(DirectionInferenceError::MixedRuns {
            increasing: 2,
            decreasing: 1,
        })
    );
}

// Property-based tests using proptest
proptest! {
    #[test]
    fn test_sorted_distinct_times_are_accepted(
        mut times in prop::collection::btree_set(0u32..10_000, 1..20),
        objective in -1000.0f64..1000.0,
    ) {
        let points: Vec<SolutionPoint> = std::mem::take(&mut times)
            .into_iter()
            .map(|t| SolutionPoint::new(t as f64, objective))
            .collect();
        let count = points.len();
        let trace = Trace::new(points).unwrap();
        prop_assert_eq!(trace.len(), count);
        prop_assert!(trace.first_time() <= trace.last_time());
    }

    #[test]
    fn test_decreasing_objectives_infer_minimize(
        start in 0.0f64..1000.0,
        steps in prop::collection::vec(0.5f64..10.0, 1..10),
    ) {
        let mut objective = start;
        let mut points = vec![SolutionPoint::new(0.0, objective)];
        for (i, step) in steps.iter().enumerate() {
            objective -= step;
            points.push(SolutionPoint::new((i + 1) as f64, objective));
        }
        let trace = Trace::new(points).unwrap();
        prop_assert!(trace.check_improving(ObjectiveDirection::Minimize).is_ok());
        prop_assert_eq!(
            ObjectiveDirection::infer([&trace]),
            Ok(ObjectiveDirection::Minimize)
        );
    }
}
