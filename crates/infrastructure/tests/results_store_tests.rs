//! Integration tests for the results directory store
//!
//! Runs the analysis service end to end over results trees written to a
//! temporary directory.

use solverbench_application::{AnalysisService, ScoringEngine, ServiceConfig};
use solverbench_common::ResultsLayout;
use solverbench_domain::{InstanceStatus, ProblemId, RunStatus};
use solverbench_infrastructure::{ReportExporter, ResultsStore, TraceSchema};
use solverbench_testing::fixtures::*;
use std::fs;
use std::sync::Arc;

fn service(root: &std::path::Path) -> AnalysisService<ResultsStore> {
    AnalysisService::new(
        Arc::new(ResultsStore::new(root, ResultsLayout::Auto, TraceSchema::default())),
        ScoringEngine::default(),
        create_test_directions(),
        ServiceConfig::default(),
    )
}

#[tokio::test]
async fn test_analyze_results_tree() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_test_results_tree(dir.path()).unwrap();

    // Act
    let report = service(dir.path()).analyze().await.unwrap();

    // Assert - matches scoring the same runs in memory
    let expected =
        ScoringEngine::default().analyze(&create_test_analysis_input(), &create_test_directions());
    assert_eq!(report.overall, expected.overall);
    assert_eq!(report.status_counts().scored, 3);
}

#[tokio::test]
async fn test_corrupt_file_is_isolated() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_test_results_tree(dir.path()).unwrap();
    write_raw_file(dir.path(), "d/jobshop/ft06.csv", "time,objective\n5,3\n3,2\n").unwrap();
    write_raw_file(dir.path(), "d/jobshop/ft10.csv", "time,cost\n1,2\n").unwrap();

    // Act
    let report = service(dir.path()).analyze().await.unwrap();

    // Assert
    let codes: Vec<&str> = report.excluded.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["CORRUPT_TRACE", "SCHEMA_ERROR"]);

    let jobshop = report.problem(&ProblemId::new("jobshop")).unwrap();
    assert!(jobshop
        .instances
        .iter()
        .all(|i| i.status == InstanceStatus::Scored));
    let d = jobshop.instances[0]
        .runs
        .iter()
        .find(|r| r.configuration.as_str() == "d")
        .unwrap();
    assert_eq!(d.status, RunStatus::Excluded);
}

#[tokio::test]
async fn test_mixed_layouts() {
    // Arrange - one configuration writes a combined results file
    let dir = tempfile::tempdir().unwrap();
    write_trace_file(dir.path(), "a", "jobshop", "ft06", &[(1.0, 10.0), (3.0, 4.0)]).unwrap();
    write_raw_file(
        dir.path(),
        "b/results.csv",
        "problem,flatzinc,type,time,objective\n\
         jobshop,ft06,start,0,\n\
         jobshop,ft06,new_solution,2,8\n",
    )
    .unwrap();

    // Act
    let report = service(dir.path()).analyze().await.unwrap();

    // Assert
    let instance = report.instances().next().unwrap();
    let b = instance
        .runs
        .iter()
        .find(|r| r.configuration.as_str() == "b")
        .unwrap();
    assert!((b.objective_score.unwrap() - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rerun_gives_identical_files() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_test_results_tree(dir.path()).unwrap();
    let out = tempfile::tempdir().unwrap();
    let first = out.path().join("first");
    let second = out.path().join("second");

    // Act
    let report = service(dir.path()).analyze().await.unwrap();
    ReportExporter::new(&first, 6).export(&report).unwrap();
    let report = service(dir.path()).analyze().await.unwrap();
    ReportExporter::new(&second, 6).export(&report).unwrap();

    // Assert
    for file in [
        "jobshop/scores.csv",
        "summary.csv",
        "status.csv",
        "report.json",
        "summary.md",
    ] {
        assert_eq!(
            fs::read(first.join(file)).unwrap(),
            fs::read(second.join(file)).unwrap(),
            "{} differs",
            file
        );
    }
}
