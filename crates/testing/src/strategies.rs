//! Property-based testing strategies.
//!
//! Generates valid traces and instances for proptest-driven scoring tests.

use crate::builders::InstanceRunsBuilder;
use proptest::prelude::*;
use solverbench_application::InstanceRuns;
use solverbench_domain::{ObjectiveDirection, SolutionPoint, Trace};

/// Strategy for an objective direction
pub fn direction() -> impl Strategy<Value = ObjectiveDirection> {
    prop_oneof![
        Just(ObjectiveDirection::Minimize),
        Just(ObjectiveDirection::Maximize),
    ]
}

/// Strategy for a trace improving in `direction` with up to `max_len` points.
///
/// Times and objectives are whole numbers so generated bounds stay exact.
pub fn improving_trace(
    direction: ObjectiveDirection,
    max_len: usize,
) -> impl Strategy<Value = Trace> {
    (
        0u32..100,
        -1000i32..1000,
        prop::collection::vec((1u32..100, 0u32..50), 0..=max_len),
    )
        .prop_map(move |(start_time, start_objective, steps)| {
            let mut time = start_time as f64;
            let mut objective = start_objective as f64;
            let mut points = Vec::with_capacity(steps.len());
            for (index, (dt, improvement)) in steps.into_iter().enumerate() {
                if index > 0 {
                    time += dt as f64;
                    objective = match direction {
                        ObjectiveDirection::Minimize => objective - improvement as f64,
                        ObjectiveDirection::Maximize => objective + improvement as f64,
                    };
                }
                points.push(SolutionPoint::new(time, objective));
            }
            Trace::new(points).unwrap_or_default()
        })
}

/// Strategy for an instance with between one and `max_configurations` runs
pub fn instance_runs(
    direction: ObjectiveDirection,
    max_configurations: usize,
) -> impl Strategy<Value = InstanceRuns> {
    prop::collection::vec(improving_trace(direction, 6), 1..=max_configurations).prop_map(
        |traces| {
            let mut builder = InstanceRunsBuilder::new("generated", "instance");
            for (index, trace) in traces.into_iter().enumerate() {
                let points: Vec<(f64, f64)> = trace
                    .points()
                    .iter()
                    .map(|p| (p.time, p.objective))
                    .collect();
                let configuration = format!("config_{}", index);
                builder = if points.is_empty() {
                    builder.empty_run(&configuration)
                } else {
                    builder.run(&configuration, &points)
                };
            }
            builder.build()
        },
    )
}
