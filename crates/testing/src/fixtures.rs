//! Test fixtures for generating scoring inputs with realistic data.
//!
//! This module provides functions to create traces, instances and results
//! directories with sensible defaults and optional randomization.

use crate::builders::{AnalysisInputBuilder, InstanceRunsBuilder, TraceBuilder};
use fake::{faker::lorem::en::Word, Fake};
use solverbench_application::{AnalysisInput, InstanceRuns};
use solverbench_domain::{ConfigurationId, DirectionMap, ObjectiveDirection, Trace};
use std::fs;
use std::path::{Path, PathBuf};

/// Header of the per-instance CSV files written by the fixtures
pub const TRACE_HEADER: &str = "time,objective,num_decisions";

/// Create a configuration id with a random search-heuristic style name
pub fn create_test_configuration_id() -> ConfigurationId {
    let variable: String = Word().fake();
    let value: String = Word().fake();
    let restart: u32 = (1..1000).fake();
    ConfigurationId::new(format!("{}_{}_{}", variable, value, restart))
}

/// Create a random minimizing trace with `len` strictly improving points
pub fn create_random_trace(len: usize) -> Trace {
    let mut builder = TraceBuilder::new();
    let mut time = 0.0;
    let mut objective: f64 = (500..1000).fake::<u32>() as f64;
    for _ in 0..len {
        time += (1..50).fake::<u32>() as f64;
        objective -= (1..20).fake::<u32>() as f64;
        builder = builder.point(time, objective);
    }
    builder.build()
}

/// Two configurations on a minimization instance.
///
/// `a` reaches 4 at time 3 after starting at 10, `b` finds 8 at time 2. The
/// objective scores are 0 for `a` and 2/3 for `b`.
pub fn create_two_configuration_instance() -> InstanceRuns {
    InstanceRunsBuilder::new("jobshop", "ft06")
        .run("a", &[(1.0, 10.0), (3.0, 4.0)])
        .run("b", &[(2.0, 8.0)])
        .build()
}

/// Every configuration reports the same single objective value
pub fn create_degenerate_instance() -> InstanceRuns {
    InstanceRunsBuilder::new("jobshop", "trivial")
        .run("a", &[(1.0, 7.0)])
        .run("b", &[(2.0, 7.0)])
        .run("c", &[(3.0, 7.0)])
        .build()
}

/// One configuration finds nothing beside two that do
pub fn create_instance_with_empty_trace() -> InstanceRuns {
    InstanceRunsBuilder::new("jobshop", "la01")
        .run("a", &[(1.0, 10.0), (3.0, 4.0)])
        .run("b", &[(2.0, 8.0)])
        .empty_run("c")
        .build()
}

/// Two configurations on a maximization instance
pub fn create_maximize_instance() -> InstanceRuns {
    InstanceRunsBuilder::new("knapsack", "k50")
        .run("a", &[(0.0, 2.0), (2.0, 10.0)])
        .run("b", &[(1.0, 6.0)])
        .build()
}

/// Directions for the fixture problems
pub fn create_test_directions() -> DirectionMap {
    DirectionMap::new()
        .with_problem("jobshop", ObjectiveDirection::Minimize)
        .with_problem("knapsack", ObjectiveDirection::Maximize)
}

/// Three configurations over two problems
pub fn create_test_analysis_input() -> AnalysisInput {
    AnalysisInputBuilder::new()
        .instance(
            InstanceRunsBuilder::new("jobshop", "ft06")
                .run("a", &[(1.0, 10.0), (3.0, 4.0)])
                .run("b", &[(2.0, 8.0)])
                .run("c", &[(1.0, 9.0), (2.0, 5.0)]),
        )
        .instance(
            InstanceRunsBuilder::new("jobshop", "ft10")
                .run("a", &[(2.0, 30.0)])
                .run("b", &[(1.0, 40.0), (4.0, 20.0)])
                .empty_run("c"),
        )
        .instance(
            InstanceRunsBuilder::new("knapsack", "k50")
                .run("a", &[(0.0, 2.0), (2.0, 10.0)])
                .run("b", &[(1.0, 6.0)]),
        )
        .build()
}

/// Write one per-instance trace file under `<root>/<configuration>/<problem>/<instance>.csv`
pub fn write_trace_file(
    root: &Path,
    configuration: &str,
    problem: &str,
    instance: &str,
    points: &[(f64, f64)],
) -> anyhow::Result<PathBuf> {
    let dir = root.join(configuration).join(problem);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.csv", instance));

    let mut contents = String::from(TRACE_HEADER);
    contents.push('\n');
    for (index, (time, objective)) in points.iter().enumerate() {
        contents.push_str(&format!("{},{},{}\n", time, objective, (index + 1) * 100));
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write a raw file relative to the results root
pub fn write_raw_file(root: &Path, relative: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write the fixture analysis input as a per-instance results tree
pub fn write_test_results_tree(root: &Path) -> anyhow::Result<()> {
    write_trace_file(root, "a", "jobshop", "ft06", &[(1.0, 10.0), (3.0, 4.0)])?;
    write_trace_file(root, "b", "jobshop", "ft06", &[(2.0, 8.0)])?;
    write_trace_file(root, "c", "jobshop", "ft06", &[(1.0, 9.0), (2.0, 5.0)])?;
    write_trace_file(root, "a", "jobshop", "ft10", &[(2.0, 30.0)])?;
    write_trace_file(root, "b", "jobshop", "ft10", &[(1.0, 40.0), (4.0, 20.0)])?;
    write_trace_file(root, "c", "jobshop", "ft10", &[])?;
    write_trace_file(root, "a", "knapsack", "k50", &[(0.0, 2.0), (2.0, 10.0)])?;
    write_trace_file(root, "b", "knapsack", "k50", &[(1.0, 6.0)])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_trace_is_improving() {
        let trace = create_random_trace(10);
        assert_eq!(trace.len(), 10);
        assert!(trace.check_improving(ObjectiveDirection::Minimize).is_ok());
    }

    #[test]
    fn test_configuration_id() {
        let id = create_test_configuration_id();
        assert_eq!(id.as_str().matches('_').count(), 2);
    }

    #[test]
    fn test_fixture_input() {
        let input = create_test_analysis_input();
        assert_eq!(input.configurations.len(), 3);
        assert_eq!(input.instances.len(), 3);
        assert_eq!(input.run_count(), 8);
    }

    #[test]
    fn test_write_results_tree() {
        let dir = tempfile::tempdir().unwrap();
        write_test_results_tree(dir.path()).unwrap();
        let contents = fs::read_to_string(dir.path().join("c/jobshop/ft10.csv")).unwrap();
        assert_eq!(contents, format!("{}\n", TRACE_HEADER));
    }
}
