//! Solverbench Domain Types
//!
//! This crate provides the core domain model for scoring constraint-solver
//! benchmark runs. It defines identifiers, objective directions, solver traces,
//! score records and the error taxonomy shared by every other crate.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **identifiers**: Opaque string-backed keys for configurations, problems and instances
//! - **objective**: Objective direction (minimize / maximize) and direction inference
//! - **trace**: Solution points and validated traces
//! - **bounds**: Per-run and per-instance objective and time bounds
//! - **score**: Per-run scores, instance statuses, summaries and the analysis report
//! - **errors**: Trace, scoring and top-level analysis errors
//!
//! ## Usage
//!
//! ```rust
//! use solverbench_domain::{
//!     objective::ObjectiveDirection,
//!     trace::{SolutionPoint, Trace},
//! };
//!
//! let trace = Trace::new(vec![
//!     SolutionPoint::new(1.0, 10.0),
//!     SolutionPoint::new(3.0, 4.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(trace.best_objective(ObjectiveDirection::Minimize), Some(4.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bounds;
pub mod errors;
pub mod identifiers;
pub mod objective;
pub mod score;
pub mod trace;

// Re-export commonly used types
pub use bounds::{InstanceBounds, RunBounds};
pub use errors::{
    AnalysisError, AnalysisResult, CorruptTraceError, SchemaError, ScoringError, TraceError,
};
pub use identifiers::*;
pub use objective::{DirectionInferenceError, DirectionMap, ObjectiveDirection};
pub use score::{
    AnalysisReport, ExcludedTrace, InstanceReport, InstanceStatus, ProblemReport, RunScore,
    RunStatus, StatusCounts, SummaryRow, UnscoredReason,
};
pub use trace::{SolutionPoint, Trace};
