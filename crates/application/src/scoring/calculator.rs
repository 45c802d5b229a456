//! Score Calculator
//!
//! Computes the objective score and the AUC score of one configuration on one
//! instance, given the global bounds of the instance.
//!
//! Both scores lie in `[0, 1]` and `0` is ideal in both directions:
//!
//! - `objective_score = |b_c - b| / (u - l)`
//! - `auc_score = A_c / A` when minimizing, `1 - A_c / A` when maximizing
//!
//! where `A` is the bounding box `(u - l) * (T_max - T_min)` and `A_c` is the
//! area between the floor `l` and the configuration's step curve.

use solverbench_domain::{InstanceBounds, ObjectiveDirection, Trace};

/// Slack allowed for rounding before a score counts as out of range
const SCORE_TOLERANCE: f64 = 1e-9;

/// Keep a score inside `[0, 1]`.
///
/// Consistent bounds only leave rounding noise outside the interval; a
/// larger excursion is a bounds bug and trips the debug assertion.
fn unit_score(score: f64) -> f64 {
    debug_assert!(
        (-SCORE_TOLERANCE..=1.0 + SCORE_TOLERANCE).contains(&score),
        "score {} outside [0, 1]",
        score
    );
    score.clamp(0.0, 1.0)
}

/// Normalized distance between a run's best value and the instance best.
///
/// Returns `0` when the instance has a degenerate objective range, since no
/// configuration can be told apart from another.
pub fn objective_score(run_best: f64, bounds: &InstanceBounds) -> f64 {
    let range = bounds.objective_range();
    if range <= 0.0 {
        return 0.0;
    }
    unit_score((run_best - bounds.best).abs() / range)
}

/// Area between the floor `l` and the run's right-continuous step curve.
///
/// The curve holds the run's own worst value from `T_min` until its first
/// solution, then each objective until the next solution, and the last
/// objective until `T_max`. An empty trace stays at the instance worst value
/// over the whole window.
pub fn curve_area(trace: &Trace, bounds: &InstanceBounds, direction: ObjectiveDirection) -> f64 {
    let floor = bounds.lower;
    let points = trace.points();

    let Some(first) = points.first() else {
        return (bounds.worst - floor) * bounds.time_window();
    };
    let run_worst = trace.worst_objective(direction).unwrap_or(first.objective);

    let mut area = (first.time - bounds.time_min) * (run_worst - floor);
    for (index, point) in points.iter().enumerate() {
        let next_time = points
            .get(index + 1)
            .map(|next| next.time)
            .unwrap_or(bounds.time_max);
        area += (point.objective - floor) * (next_time - point.time);
    }
    area
}

/// Normalized AUC score, `None` when the bounding box is degenerate
pub fn auc_score(
    trace: &Trace,
    bounds: &InstanceBounds,
    direction: ObjectiveDirection,
) -> Option<f64> {
    let box_area = bounds.area()?;
    let ratio = curve_area(trace, bounds, direction) / box_area;
    let score = match direction {
        ObjectiveDirection::Minimize => ratio,
        ObjectiveDirection::Maximize => 1.0 - ratio,
    };
    Some(unit_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solverbench_domain::SolutionPoint;

    fn trace(points: &[(f64, f64)]) -> Trace {
        Trace::new(points.iter().map(|&(t, o)| SolutionPoint::new(t, o)).collect()).unwrap()
    }

    fn minimize_bounds() -> InstanceBounds {
        InstanceBounds {
            upper: 10.0,
            lower: 4.0,
            best: 4.0,
            worst: 10.0,
            time_min: 1.0,
            time_max: 3.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_objective_score() {
        let bounds = minimize_bounds();
        assert_eq!(objective_score(4.0, &bounds), 0.0);
        assert!(approx(objective_score(8.0, &bounds), 2.0 / 3.0));
        assert_eq!(objective_score(10.0, &bounds), 1.0);
    }

    #[test]
    fn test_objective_score_degenerate_range() {
        let mut bounds = minimize_bounds();
        bounds.upper = 4.0;
        assert_eq!(objective_score(4.0, &bounds), 0.0);
    }

    #[test]
    fn test_curve_area() {
        let bounds = minimize_bounds();
        let minimize = ObjectiveDirection::Minimize;

        // Held at 10 from 1 to 3, 4 at the very end contributes nothing
        let a = trace(&[(1.0, 10.0), (3.0, 4.0)]);
        assert!(approx(curve_area(&a, &bounds, minimize), 12.0));

        // b's own worst value 8 from 1 to 2, then 8 until 3
        let b = trace(&[(2.0, 8.0)]);
        assert!(approx(curve_area(&b, &bounds, minimize), 4.0 + 4.0));

        assert!(approx(curve_area(&Trace::empty(), &bounds, minimize), 12.0));
    }

    #[test]
    fn test_late_best_run_is_held_at_own_worst() {
        let bounds = InstanceBounds {
            upper: 10.0,
            lower: 4.0,
            best: 4.0,
            worst: 10.0,
            time_min: 0.0,
            time_max: 5.0,
        };

        // Finds the instance best at time 5 and never reports anything worse
        let late = trace(&[(5.0, 4.0)]);
        assert!(approx(
            curve_area(&late, &bounds, ObjectiveDirection::Minimize),
            0.0
        ));
        assert_eq!(
            auc_score(&late, &bounds, ObjectiveDirection::Minimize),
            Some(0.0)
        );

        // Stays at the instance worst value over the whole window
        let stuck = trace(&[(0.0, 10.0)]);
        assert_eq!(
            auc_score(&stuck, &bounds, ObjectiveDirection::Minimize),
            Some(1.0)
        );
    }

    #[test]
    fn test_auc_minimize() {
        let bounds = minimize_bounds();
        let b = trace(&[(2.0, 8.0)]);
        let score = auc_score(&b, &bounds, ObjectiveDirection::Minimize).unwrap();
        assert!(approx(score, 8.0 / 12.0));
    }

    #[test]
    fn test_auc_maximize() {
        let bounds = InstanceBounds {
            upper: 10.0,
            lower: 2.0,
            best: 10.0,
            worst: 2.0,
            time_min: 0.0,
            time_max: 4.0,
        };

        // Reaching the best value at the start of the window is ideal
        let fast = trace(&[(0.0, 10.0)]);
        assert!(approx(
            auc_score(&fast, &bounds, ObjectiveDirection::Maximize).unwrap(),
            0.0
        ));

        // Halfway to the best at half time
        let slow = trace(&[(0.0, 2.0), (2.0, 10.0)]);
        assert!(approx(
            auc_score(&slow, &bounds, ObjectiveDirection::Maximize).unwrap(),
            0.5
        ));
    }

    #[test]
    fn test_empty_trace_is_worst() {
        let bounds = minimize_bounds();
        assert!(approx(
            auc_score(&Trace::empty(), &bounds, ObjectiveDirection::Minimize).unwrap(),
            1.0
        ));

        let bounds = InstanceBounds {
            best: 10.0,
            worst: 4.0,
            ..minimize_bounds()
        };
        assert!(approx(
            auc_score(&Trace::empty(), &bounds, ObjectiveDirection::Maximize).unwrap(),
            1.0
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside [0, 1]")]
    fn test_inconsistent_bounds_are_not_clamped_away() {
        // A best value above the instance upper bound
        objective_score(16.0, &minimize_bounds());
    }

    #[test]
    fn test_degenerate_window() {
        let mut bounds = minimize_bounds();
        bounds.time_max = bounds.time_min;
        let a = trace(&[(1.0, 4.0)]);
        assert_eq!(auc_score(&a, &bounds, ObjectiveDirection::Minimize), None);
    }
}
