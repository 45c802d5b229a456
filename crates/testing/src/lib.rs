//! Testing utilities for the solver benchmark scoring engine
//!
//! This crate provides testing utilities including:
//! - Builders for traces, instances and analysis inputs
//! - Fixtures for common scoring scenarios and results directories
//! - An in-memory implementation of the trace repository port
//! - Property-based testing strategies
//!
//! # Examples
//!
//! ```
//! use solverbench_testing::{builders::*, fixtures::*};
//!
//! // Two configurations on one minimization instance
//! let runs = create_two_configuration_instance();
//! assert_eq!(runs.traces.len(), 2);
//!
//! // Build a custom instance
//! let runs = InstanceRunsBuilder::new("jobshop", "ft10")
//!     .run("dom_min_luby", &[(1.0, 1200.0), (5.0, 930.0)])
//!     .empty_run("first_fail")
//!     .build();
//! assert_eq!(runs.traces.len(), 2);
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;
pub mod strategies;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
