//! Mock implementations of the trace repository port.
//!
//! Provides an in-memory results source for testing without touching the
//! filesystem.

use async_trait::async_trait;
use parking_lot::RwLock;
use solverbench_application::{AnalysisInput, RunCatalog, TraceRepository};
use solverbench_domain::{
    AnalysisError, AnalysisResult, ConfigurationId, ExcludedTrace, RunKey, Trace, TraceError,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory trace repository
pub struct InMemoryTraceRepository {
    configurations: Arc<RwLock<BTreeSet<ConfigurationId>>>,
    runs: Arc<RwLock<BTreeMap<RunKey, Result<Trace, TraceError>>>>,
    rejected_sources: Arc<RwLock<Vec<ExcludedTrace>>>,
    catalog_error: Arc<RwLock<Option<String>>>,
    loads: AtomicUsize,
}

impl InMemoryTraceRepository {
    pub fn new() -> Self {
        Self {
            configurations: Arc::new(RwLock::new(BTreeSet::new())),
            runs: Arc::new(RwLock::new(BTreeMap::new())),
            rejected_sources: Arc::new(RwLock::new(Vec::new())),
            catalog_error: Arc::new(RwLock::new(None)),
            loads: AtomicUsize::new(0),
        }
    }

    /// Seed the repository with every run of an analysis input
    pub fn from_input(input: &AnalysisInput) -> Self {
        let repository = Self::new();
        for configuration in &input.configurations {
            repository.add_configuration(configuration.as_str());
        }
        for runs in input.instances.values() {
            for (configuration, trace) in &runs.traces {
                repository.insert(
                    RunKey::new(configuration.clone(), runs.key.clone()),
                    Ok(trace.clone()),
                );
            }
            for (configuration, error) in &runs.rejected {
                repository.insert(
                    RunKey::new(configuration.clone(), runs.key.clone()),
                    Err(error.clone()),
                );
            }
        }
        *repository.rejected_sources.write() = input.rejected_sources.clone();
        repository
    }

    /// Declare a configuration without adding runs
    pub fn add_configuration(&self, configuration: &str) {
        self.configurations
            .write()
            .insert(ConfigurationId::new(configuration));
    }

    /// Store the load result of one run
    pub fn insert(&self, run: RunKey, trace: Result<Trace, TraceError>) {
        self.configurations.write().insert(run.configuration.clone());
        self.runs.write().insert(run, trace);
    }

    /// Report a results file that could not be split into runs
    pub fn reject_source(&self, rejected: ExcludedTrace) {
        self.configurations
            .write()
            .insert(rejected.configuration.clone());
        self.rejected_sources.write().push(rejected);
    }

    /// Make every subsequent catalog call fail
    pub fn fail_catalog(&self, message: impl Into<String>) {
        *self.catalog_error.write() = Some(message.into());
    }

    /// Number of `load_trace` calls so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn run_count(&self) -> usize {
        self.runs.read().len()
    }

    pub fn clear(&self) {
        self.configurations.write().clear();
        self.runs.write().clear();
        self.rejected_sources.write().clear();
    }
}

impl Default for InMemoryTraceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TraceRepository for InMemoryTraceRepository {
    async fn catalog(&self) -> AnalysisResult<RunCatalog> {
        if let Some(message) = self.catalog_error.read().clone() {
            return Err(AnalysisError::Source(message));
        }

        Ok(RunCatalog {
            configurations: self.configurations.read().iter().cloned().collect(),
            runs: self.runs.read().keys().cloned().collect(),
            rejected: self.rejected_sources.read().clone(),
        })
    }

    async fn load_trace(&self, run: &RunKey) -> Result<Trace, TraceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.runs.read().get(run) {
            Some(loaded) => loaded.clone(),
            None => Err(TraceError::Source {
                path: run.to_string(),
                message: "run not found".to_string(),
            }),
        }
    }
}
