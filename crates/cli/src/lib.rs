//! solverbench CLI Library
//!
//! This library provides the core functionality of the `solverbench`
//! command-line interface: command implementations over the analysis
//! service, and output formatting.

pub mod commands;
pub mod interactive;
pub mod output;

pub use commands::{CommandContext, InputArgs};
pub use output::{JsonFormatter, OutputFormat, PlainFormatter, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
