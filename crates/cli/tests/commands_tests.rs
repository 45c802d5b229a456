//! Integration tests for CLI commands
//!
//! Runs commands against results trees written to a temporary directory.

use solverbench_cli::commands::{analyze, config, inspect, show, validate, CommandContext};
use solverbench_cli::output::OutputFormat;
use solverbench_common::AnalysisConfig;
use solverbench_testing::fixtures::*;
use std::path::Path;

fn context(results: &Path, out: &Path, format: OutputFormat) -> CommandContext {
    let directions = results.with_extension("toml");
    std::fs::write(
        &directions,
        "[problems]\njobshop = \"minimize\"\nknapsack = \"maximize\"\n",
    )
    .unwrap();

    let mut config = AnalysisConfig::default();
    config.input.results_dir = results.to_path_buf();
    config.input.directions_file = Some(directions);
    config.output.dir = out.to_path_buf();
    CommandContext::new(config, format)
}

#[tokio::test]
async fn test_analyze_writes_report() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    let out = dir.path().join("report");
    write_test_results_tree(&results).unwrap();
    let ctx = context(&results, &out, OutputFormat::Json);

    // Act
    analyze::run(&ctx, true).await.unwrap();

    // Assert
    assert!(out.join("summary.csv").is_file());
    assert!(out.join("report.json").is_file());
    assert!(out.join("jobshop").join("scores.csv").is_file());
}

#[tokio::test]
async fn test_analyze_without_export() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    let out = dir.path().join("report");
    write_test_results_tree(&results).unwrap();
    let ctx = context(&results, &out, OutputFormat::Table);

    // Act
    analyze::run(&ctx, false).await.unwrap();

    // Assert
    assert!(!out.exists());
}

#[tokio::test]
async fn test_analyze_missing_results_dir() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(
        &dir.path().join("missing"),
        &dir.path().join("report"),
        OutputFormat::Json,
    );

    let error = analyze::run(&ctx, true).await.unwrap_err();
    assert!(format!("{:#}", error).contains("does not exist"));
}

#[tokio::test]
async fn test_validate_fails_on_rejected_trace() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    write_test_results_tree(&results).unwrap();
    write_raw_file(&results, "d/jobshop/ft06.csv", "time,objective\n5,3\n3,2\n").unwrap();
    let ctx = context(&results, &dir.path().join("report"), OutputFormat::Plain);

    // Act
    let error = validate::run(&ctx).await.unwrap_err();

    // Assert
    assert!(error.to_string().contains("1 trace(s) rejected"));
}

#[tokio::test]
async fn test_validate_clean_tree() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    write_test_results_tree(&results).unwrap();
    let ctx = context(&results, &dir.path().join("report"), OutputFormat::Table);

    assert!(validate::run(&ctx).await.is_ok());
}

#[tokio::test]
async fn test_show_and_inspect() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    write_test_results_tree(&results).unwrap();
    let ctx = context(&results, &dir.path().join("report"), OutputFormat::Table);

    // Act & Assert
    show::run(&ctx, Some("jobshop".to_string())).await.unwrap();
    assert!(show::run(&ctx, Some("tsp".to_string())).await.is_err());

    inspect::run(&ctx, "a".into(), "jobshop".into(), "ft06".into())
        .await
        .unwrap();
    assert!(inspect::run(&ctx, "z".into(), "jobshop".into(), "ft06".into())
        .await
        .is_err());
}

#[test]
fn test_config_commands() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    std::fs::create_dir_all(&results).unwrap();
    let ctx = context(&results, &dir.path().join("report"), OutputFormat::Json);

    assert!(config::show(&ctx).is_ok());
    assert!(config::check(&ctx).is_ok());
}
