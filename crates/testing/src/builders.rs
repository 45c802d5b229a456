//! Fluent builder pattern for constructing test data.
//!
//! This module provides builder structs for creating traces and whole
//! instances with a fluent API for customization.

use solverbench_application::{AnalysisInput, InstanceRuns};
use solverbench_domain::{
    ConfigurationId, CorruptTraceError, InstanceKey, RunKey, SolutionPoint, Trace, TraceError,
};

/// Builder for creating Trace test instances
#[derive(Clone, Default)]
pub struct TraceBuilder {
    points: Vec<SolutionPoint>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a solution point
    pub fn point(mut self, time: f64, objective: f64) -> Self {
        self.points.push(SolutionPoint::new(time, objective));
        self
    }

    /// Append several `(time, objective)` points
    pub fn points(mut self, points: &[(f64, f64)]) -> Self {
        self.points
            .extend(points.iter().map(|&(t, o)| SolutionPoint::new(t, o)));
        self
    }

    /// Attach a pass-through column to the last point
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(last) = self.points.pop() {
            self.points.push(last.with_extra(column, value));
        }
        self
    }

    /// Append `count` points improving by `step` every `interval` time units
    pub fn improving(
        mut self,
        start_time: f64,
        start_objective: f64,
        interval: f64,
        step: f64,
        count: usize,
    ) -> Self {
        for i in 0..count {
            self.points.push(SolutionPoint::new(
                start_time + interval * i as f64,
                start_objective + step * i as f64,
            ));
        }
        self
    }

    /// Build the trace, returning the validation error for invalid points
    pub fn try_build(self) -> Result<Trace, CorruptTraceError> {
        Trace::new(self.points)
    }

    /// Build the trace.
    ///
    /// # Panics
    ///
    /// Panics when the points do not form a valid trace.
    pub fn build(self) -> Trace {
        self.try_build().expect("TraceBuilder points must form a valid trace")
    }
}

/// Builder for creating InstanceRuns test instances
#[derive(Clone)]
pub struct InstanceRunsBuilder {
    runs: InstanceRuns,
}

impl InstanceRunsBuilder {
    pub fn new(problem: &str, instance: &str) -> Self {
        Self {
            runs: InstanceRuns::new(InstanceKey::new(problem, instance)),
        }
    }

    /// Add a configuration with the given `(time, objective)` points
    pub fn run(mut self, configuration: &str, points: &[(f64, f64)]) -> Self {
        let trace = TraceBuilder::new().points(points).build();
        self.runs = self.runs.with_trace(configuration, trace);
        self
    }

    /// Add a configuration that found no solution
    pub fn empty_run(mut self, configuration: &str) -> Self {
        self.runs = self.runs.with_trace(configuration, Trace::empty());
        self
    }

    /// Add a configuration whose trace the loader rejected
    pub fn rejected_run(mut self, configuration: &str, error: TraceError) -> Self {
        self.runs = self.runs.with_rejected(configuration, error);
        self
    }

    pub fn key(&self) -> &InstanceKey {
        &self.runs.key
    }

    pub fn build(self) -> InstanceRuns {
        self.runs
    }
}

/// Builder for creating AnalysisInput test instances
#[derive(Clone, Default)]
pub struct AnalysisInputBuilder {
    input: AnalysisInput,
}

impl AnalysisInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a configuration, even if it has no traces
    pub fn configuration(mut self, configuration: &str) -> Self {
        self.input
            .configurations
            .insert(ConfigurationId::new(configuration));
        self
    }

    /// Add every run of an instance
    pub fn instance(self, runs: InstanceRunsBuilder) -> Self {
        self.runs(runs.build())
    }

    /// Add every run of an already built instance, such as a fixture
    pub fn runs(mut self, runs: InstanceRuns) -> Self {
        for (configuration, trace) in &runs.traces {
            self.input.add(
                RunKey::new(configuration.clone(), runs.key.clone()),
                Ok(trace.clone()),
            );
        }
        for (configuration, error) in &runs.rejected {
            self.input.add(
                RunKey::new(configuration.clone(), runs.key.clone()),
                Err(error.clone()),
            );
        }
        self
    }

    pub fn build(self) -> AnalysisInput {
        self.input
    }
}
