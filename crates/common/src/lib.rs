//! Common utilities and shared functionality for solverbench.
//!
//! This crate provides foundational utilities used across all crates including:
//! - Layered analysis configuration
//! - Logging setup
//! - Deterministic float formatting

pub mod config;
pub mod serialization;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    AnalysisConfig, ExportFormat, InputConfig, OutputConfig, ResultsLayout, RuntimeConfig,
    ScoringConfig, TelemetryConfig,
};
pub use serialization::{format_float, format_optional_float, format_optional_float_or};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
