//! Application Services
//!
//! Orchestrates trace loading through the [`TraceRepository`] port and hands
//! the loaded runs to the scoring engine.

mod analysis;

pub use analysis::*;

use async_trait::async_trait;
use solverbench_common::AnalysisConfig;
use solverbench_domain::{AnalysisResult, ConfigurationId, ExcludedTrace, RunKey, Trace, TraceError};

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Maximum number of traces loaded at the same time
    pub max_concurrent_loads: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_loads: 16,
        }
    }
}

impl From<&AnalysisConfig> for ServiceConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_concurrent_loads: config.runtime.max_concurrent_loads.max(1),
        }
    }
}

/// Runs available in a results source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCatalog {
    /// Every configuration, including those without any trace
    pub configurations: Vec<ConfigurationId>,
    /// Every run with a trace source
    pub runs: Vec<RunKey>,
    /// Results files that could not be split into runs
    pub rejected: Vec<ExcludedTrace>,
}

/// Trace repository port
#[async_trait]
pub trait TraceRepository: Send + Sync {
    /// Discover configurations and runs
    async fn catalog(&self) -> AnalysisResult<RunCatalog>;

    /// Load and validate the trace of one run
    async fn load_trace(&self, run: &RunKey) -> Result<Trace, TraceError>;
}
