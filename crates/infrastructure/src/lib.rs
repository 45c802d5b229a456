//! Infrastructure layer for solverbench
//!
//! This crate provides implementations for:
//! - Reading solver trace files (per-instance and combined CSV layouts)
//! - The results directory store behind the trace repository port
//! - Direction map files (TOML or JSON)
//! - Report export (CSV tables, JSON report, Markdown summary)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solverbench_infrastructure::{ReportExporter, ResultsStore};
//!
//! let store = Arc::new(ResultsStore::from_config(&config.input));
//! let service = AnalysisService::new(store, engine, directions, service_config);
//! let report = service.analyze().await?;
//!
//! ReportExporter::from_config(&config.output).export(&report)?;
//! ```

pub mod directions;
pub mod export;
pub mod results_store;
pub mod trace_source;

// Re-export commonly used types
pub use directions::{load_directions, parse_directions, DirectionFormat};
pub use export::ReportExporter;
pub use results_store::{ResultsStore, COMBINED_FILE_NAME};
pub use trace_source::{parse_trace, split_combined, TraceSchema, INSTANCE_COLUMN_ALIAS};
