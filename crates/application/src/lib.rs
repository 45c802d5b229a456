//! Application layer for solverbench
//!
//! This crate turns loaded solver traces into scores and reports.
//!
//! ## Architecture
//!
//! The application layer sits between the domain and infrastructure layers.
//! It owns the scoring pipeline and talks to trace storage only through the
//! [`TraceRepository`] port.
//!
//! ## Modules
//!
//! - `scoring` - Bound calculator, score calculator, aggregator and scoring engine
//! - `services` - Analysis service that loads traces and drives the engine

pub mod scoring;
pub mod services;

// Re-export commonly used types
pub use scoring::{
    AnalysisInput, InstanceOutcome, InstanceRuns, ScoringEngine, ScoringEngineBuilder,
    ScoringEngineConfig,
};
pub use services::{
    AnalysisService, InspectedTrace, RunCatalog, ServiceConfig, TraceRepository,
    ValidationSummary,
};
